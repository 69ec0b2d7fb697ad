mod commands;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::auth::{self, AuthCommand};
use commands::utils::CommandContext;
use edusoho_api::ApiClient;
use edusoho_auth::{token_key, CredentialStore};
use edusoho_config::Config;
use edusoho_output::{OutputFormat, OutputRenderer};
use tracing_subscriber::{fmt, EnvFilter};

pub const APP_NAME: &str = "edusoho";

#[derive(Parser, Debug)]
#[command(name = "edusoho", version, about = "Command line client for the EduSoho REST API", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.edusoho/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site API root, overriding the profile's base_url
    #[arg(long, env = "EDUSOHO_BASE_URL")]
    base_url: Option<String>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Raw)]
    output: OutputFormat,

    /// Enable verbose logging and full error bodies
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: EduSohoCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum EduSohoCommand {
    /// Authentication commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Send an arbitrary request to the API
    Request(commands::request::RequestArgs),
    /// Show the authenticated user
    Me,
    /// Course set commands
    CourseSet(commands::courses::CourseSetArgs),
    /// Course commands
    Course(commands::courses::CourseArgs),
    /// Classroom commands
    Classroom(commands::classrooms::ClassroomArgs),
    /// Order and payment commands
    Order(commands::orders::OrderArgs),
    /// Site-wide settings and notices
    Site(commands::site::SiteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.debug)?;

    let config_path = cli.config.clone();
    let mut config = Config::load(config_path.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);
    let credential_store = CredentialStore::new(APP_NAME);
    let selection = ProfileSelection {
        requested: cli.profile.as_deref(),
        base_url: cli.base_url.as_deref(),
        debug: cli.debug,
    };

    let session = || -> Result<CommandContext> {
        let profile = resolve_active_profile(&config, selection, &credential_store)?;
        Ok(CommandContext {
            client: build_client(&profile)?,
            renderer: OutputRenderer::new(cli.output),
        })
    };

    match cli.command {
        EduSohoCommand::Auth(command) => {
            auth::handle(
                command,
                auth::AuthContext {
                    config: &mut config,
                    config_path: config_path.as_deref(),
                    store: &credential_store,
                    renderer: &renderer,
                    selection,
                },
            )
            .await
        }
        EduSohoCommand::Request(args) => commands::request::execute(args, &session()?).await,
        EduSohoCommand::Me => {
            let ctx = session()?;
            ctx.emit(ctx.client.me().await)
        }
        EduSohoCommand::CourseSet(args) => {
            commands::courses::execute_course_set(args, &session()?).await
        }
        EduSohoCommand::Course(args) => commands::courses::execute_course(args, &session()?).await,
        EduSohoCommand::Classroom(args) => commands::classrooms::execute(args, &session()?).await,
        EduSohoCommand::Order(args) => commands::orders::execute(args, &session()?).await,
        EduSohoCommand::Site(args) => commands::site::execute(args, &session()?).await,
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,edusoho=debug,edusoho_api=debug,edusoho_config=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

/// Global flags that decide which site and identity a command runs against.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSelection<'a> {
    pub requested: Option<&'a str>,
    pub base_url: Option<&'a str>,
    pub debug: bool,
}

#[derive(Debug)]
pub struct ActiveProfile {
    pub name: Option<String>,
    pub base_url: String,
    pub token: Option<String>,
    pub debug: bool,
}

pub fn resolve_active_profile(
    config: &Config,
    selection: ProfileSelection<'_>,
    store: &CredentialStore,
) -> Result<ActiveProfile> {
    let resolved = config.resolve_profile(selection.requested);
    if let (Some(requested), None) = (selection.requested, resolved) {
        bail!("Profile '{requested}' does not exist. Run `edusoho auth login --profile {requested}` first.");
    }

    let name = resolved.map(|(name, _)| name.to_string());
    let base_url = match (selection.base_url, resolved) {
        (Some(url), _) => url.to_string(),
        (None, Some((name, profile))) => profile
            .base_url
            .clone()
            .ok_or_else(|| anyhow!("Profile '{name}' is missing a base_url."))?,
        (None, None) => bail!("No profile configured. Run `edusoho auth login` first."),
    };
    let debug = selection.debug || resolved.map(|(_, p)| p.debug).unwrap_or(false);
    let token = lookup_token(name.as_deref(), store);

    if token.is_none() {
        tracing::debug!(profile = ?name, "No token found, sending anonymous requests");
    }

    Ok(ActiveProfile {
        name,
        base_url,
        token,
        debug,
    })
}

/// Token lookup: `EDUSOHO_TOKEN_<PROFILE>`, then `EDUSOHO_TOKEN`, then the credential store.
fn lookup_token(profile: Option<&str>, store: &CredentialStore) -> Option<String> {
    let from_env = |var: &str| std::env::var(var).ok().filter(|t| !t.trim().is_empty());

    profile
        .and_then(|name| from_env(&profile_env_var(name)))
        .or_else(|| from_env("EDUSOHO_TOKEN"))
        .or_else(|| {
            let name = profile?;
            store.get_secret(&token_key(name)).ok().flatten()
        })
}

fn profile_env_var(profile: &str) -> String {
    let suffix: String = profile
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("EDUSOHO_TOKEN_{suffix}")
}

pub fn build_client(profile: &ActiveProfile) -> Result<ApiClient> {
    let client = ApiClient::new(&profile.base_url, profile.debug)?;
    Ok(match &profile.token {
        Some(token) => client.with_token(token),
        None => client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edusoho_config::Profile;
    use tempfile::TempDir;

    fn config_with(name: &str, url: &str) -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            name.to_string(),
            Profile {
                base_url: Some(url.to_string()),
                ..Default::default()
            },
        );
        config
    }

    fn selection(requested: Option<&str>) -> ProfileSelection<'_> {
        ProfileSelection {
            requested,
            base_url: None,
            debug: false,
        }
    }

    #[test]
    fn test_profile_env_var_name() {
        assert_eq!(profile_env_var("school"), "EDUSOHO_TOKEN_SCHOOL");
        assert_eq!(profile_env_var("my-site.2"), "EDUSOHO_TOKEN_MY_SITE_2");
    }

    #[test]
    fn test_resolve_uses_store_token() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials"));
        store.set_secret(&token_key("zz-store-only"), "stored").unwrap();

        let config = config_with("zz-store-only", "https://school.example.com/api/");
        let profile = resolve_active_profile(&config, selection(None), &store).unwrap();

        assert_eq!(profile.name.as_deref(), Some("zz-store-only"));
        assert_eq!(profile.base_url, "https://school.example.com/api/");
        if std::env::var("EDUSOHO_TOKEN").is_err() {
            assert_eq!(profile.token.as_deref(), Some("stored"));
        }
    }

    #[test]
    fn test_resolve_missing_requested_profile() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials"));
        let config = config_with("school", "https://school.example.com/api/");

        let err = resolve_active_profile(&config, selection(Some("other")), &store).unwrap_err();
        assert!(err.to_string().contains("'other' does not exist"));
    }

    #[test]
    fn test_resolve_without_any_profile() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials"));

        let err = resolve_active_profile(&Config::default(), selection(None), &store).unwrap_err();
        assert!(err.to_string().contains("edusoho auth login"));
    }

    #[test]
    fn test_base_url_override_needs_no_profile() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials"));
        let selection = ProfileSelection {
            requested: None,
            base_url: Some("http://localhost:8000/api/"),
            debug: true,
        };

        let profile = resolve_active_profile(&Config::default(), selection, &store).unwrap();
        assert!(profile.name.is_none());
        assert_eq!(profile.base_url, "http://localhost:8000/api/");
        assert!(profile.debug);

        let client = build_client(&profile).unwrap();
        assert!(client.is_debug());
    }

    #[test]
    fn test_profile_debug_flag_is_honoured() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_path(dir.path().join("credentials"));
        let mut config = config_with("school", "https://school.example.com/api/");
        if let Some(profile) = config.profiles.get_mut("school") {
            profile.debug = true;
        }

        let profile = resolve_active_profile(&config, selection(None), &store).unwrap();
        assert!(profile.debug);
    }
}
