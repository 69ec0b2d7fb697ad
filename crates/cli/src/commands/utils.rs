use anyhow::{anyhow, Result};
use clap::Args;
use edusoho_api::{ApiClient, Paging, Params};
use edusoho_output::OutputRenderer;
use serde_json::Value;

/// What every non-auth command runs with.
pub struct CommandContext {
    pub client: ApiClient,
    pub renderer: OutputRenderer,
}

impl CommandContext {
    /// Prints a successful body, or turns an API failure into the
    /// status code (or the full diagnostic in debug mode).
    pub fn emit(&self, result: edusoho_api::Result<String>) -> Result<()> {
        match result {
            Ok(body) => self.renderer.render_body(&body),
            Err(err) => {
                if let Some(hint) = err.suggestion() {
                    tracing::info!("{hint}");
                }
                Err(anyhow!(err.to_legacy_string(self.client.is_debug())))
            }
        }
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PagingArgs {
    /// Index of the first item to return
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    /// Maximum number of items to return
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

impl From<PagingArgs> for Paging {
    fn from(args: PagingArgs) -> Self {
        Paging::new(args.offset, args.limit)
    }
}

/// Parses `key=value` (string value) or `key:=json` (raw JSON value).
pub fn parse_param(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = match (raw.find(":="), raw.find('=')) {
        (Some(json_at), Some(eq_at)) if json_at < eq_at => {
            let value = &raw[json_at + 2..];
            let parsed = serde_json::from_str(value)
                .map_err(|err| format!("invalid JSON for '{}': {err}", &raw[..json_at]))?;
            (&raw[..json_at], parsed)
        }
        (_, Some(eq_at)) => (&raw[..eq_at], Value::String(raw[eq_at + 1..].to_string())),
        _ => return Err(format!("expected KEY=VALUE or KEY:=JSON, got '{raw}'")),
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value))
}

/// Collects parsed `--filter` / `--param` pairs; later keys win.
pub fn params_from(pairs: Vec<(String, Value)>) -> Params {
    pairs.into_iter().collect()
}

/// Default window for a list command. Explicit `--filter offset=...` or
/// `--filter limit=...` pairs override the paging flags.
pub fn list_params(paging: PagingArgs, filter: Params) -> Params {
    Params::from(Paging::from(paging)).merge(filter)
}
