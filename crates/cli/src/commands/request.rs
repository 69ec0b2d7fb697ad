use anyhow::Result;
use clap::Args;
use edusoho_api::{parse_method, Credential};
use serde_json::Value;

use super::utils::{params_from, parse_param, CommandContext};

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// HTTP verb: GET, POST, PATCH or DELETE (any case)
    pub method: String,
    /// Path relative to the site API root, e.g. `course_sets/42`
    pub path: String,
    /// Request parameter as KEY=VALUE, or KEY:=JSON for numbers, arrays and objects
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,
    /// Send the request without any credential
    #[arg(long)]
    pub anonymous: bool,
}

pub async fn execute(args: RequestArgs, ctx: &CommandContext) -> Result<()> {
    let method = parse_method(&args.method)?;
    let params = params_from(args.params);

    let result = if args.anonymous {
        ctx.client
            .send(&Credential::Anonymous, method, &args.path, &params)
            .await
    } else {
        ctx.client.request(method, &args.path, &params).await
    };

    ctx.emit(result)
}
