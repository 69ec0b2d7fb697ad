use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use edusoho_api::{extract_token, ApiClient};
use edusoho_auth::{token_key, CredentialStore};
use edusoho_config::Config;
use edusoho_output::OutputRenderer;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{build_client, resolve_active_profile, ProfileSelection};

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Add or update a profile and store its token
    Login(LoginArgs),
    /// Remove the stored token (and optionally the profile)
    Logout(LogoutArgs),
    /// List configured profiles
    List,
    /// Show the user behind the active profile's token
    Whoami,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Profile name to create or update.
    #[arg(long, default_value = "default")]
    pub profile: String,
    /// Site API root (e.g. https://school.example.com/api/).
    #[arg(long)]
    pub base_url: String,
    /// Account to exchange for a token; prompts for the password when not given.
    #[arg(long)]
    pub username: Option<String>,
    /// Password for --username.
    #[arg(long, env = "EDUSOHO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Existing token to store instead of logging in with a password.
    #[arg(long, conflicts_with = "username")]
    pub token: Option<String>,
    /// Mark this profile as the default one.
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LogoutArgs {
    /// Profile to remove credentials for.
    #[arg(long, default_value = "default")]
    pub profile: String,
    /// Remove the profile from config entirely (not just the stored token).
    #[arg(long)]
    pub remove_profile: bool,
}

pub struct AuthContext<'a> {
    pub config: &'a mut Config,
    pub config_path: Option<&'a Path>,
    pub store: &'a CredentialStore,
    pub renderer: &'a OutputRenderer,
    pub selection: ProfileSelection<'a>,
}

pub async fn handle(command: AuthCommand, ctx: AuthContext<'_>) -> Result<()> {
    match command {
        AuthCommand::Login(args) => login(args, ctx).await,
        AuthCommand::Logout(args) => logout(args, ctx),
        AuthCommand::List => list_profiles(ctx.config, ctx.store, ctx.renderer),
        AuthCommand::Whoami => whoami(ctx).await,
    }
}

async fn login(args: LoginArgs, ctx: AuthContext<'_>) -> Result<()> {
    if args.profile.trim().is_empty() {
        bail!("Profile name cannot be empty");
    }

    let base_url = Url::parse(&args.base_url)
        .with_context(|| format!("Invalid EduSoho site URL: {}", args.base_url))?;

    let token = match (args.token, args.username.as_deref()) {
        (Some(token), _) if !token.trim().is_empty() => token.trim().to_owned(),
        (_, Some(username)) => {
            let password = match args.password {
                Some(password) if !password.is_empty() => password,
                _ => rpassword::prompt_password(format!("Password for {username}: "))
                    .context("Failed to read password from prompt")?,
            };
            exchange_token(base_url.as_str(), username, &password, ctx.selection.debug).await?
        }
        _ => rpassword::prompt_password("Enter API token: ")
            .context("Failed to read token from prompt")?
            .trim()
            .to_owned(),
    };
    if token.is_empty() {
        bail!("API token cannot be empty");
    }

    let profile_entry = ctx.config.profiles.entry(args.profile.clone()).or_default();
    profile_entry.base_url = Some(base_url.to_string());
    if args.username.is_some() {
        profile_entry.username = args.username.clone();
    }

    if args.default || ctx.config.default_profile.is_none() {
        ctx.config.default_profile = Some(args.profile.clone());
    }

    ctx.store
        .set_secret(&token_key(&args.profile), &token)
        .context("Failed to store token")?;

    ctx.config
        .save(ctx.config_path)
        .context("Unable to persist configuration file")?;

    tracing::info!(
        profile = %args.profile,
        base_url = %base_url,
        "Profile saved and token stored"
    );
    Ok(())
}

/// Trades a username and password for a token via `POST tokens`.
async fn exchange_token(base_url: &str, username: &str, password: &str, debug: bool) -> Result<String> {
    let client = ApiClient::new(base_url, debug)?.with_basic_auth(username, password);
    let body = client
        .access_token()
        .await
        .map_err(|err| anyhow!("Login failed: {}", err.to_legacy_string(debug)))?;

    extract_token(&body).context("Login response did not contain a token")
}

fn logout(args: LogoutArgs, ctx: AuthContext<'_>) -> Result<()> {
    if !ctx.config.profiles.contains_key(&args.profile) {
        bail!("Profile '{}' does not exist", args.profile);
    }

    ctx.store
        .delete_secret(&token_key(&args.profile))
        .context("Failed to delete stored token")?;

    if args.remove_profile {
        ctx.config.remove_profile(&args.profile);
    }

    ctx.config
        .save(ctx.config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %args.profile, "Credentials removed");
    Ok(())
}

fn list_profiles(
    config: &Config,
    store: &CredentialStore,
    renderer: &OutputRenderer,
) -> Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        base_url: &'a str,
        username: &'a str,
        has_token: bool,
        is_default: bool,
    }

    let mut rows = Vec::new();
    for (name, profile) in &config.profiles {
        let has_token = store.get_secret(&token_key(name))?.is_some();
        rows.push(Row {
            name,
            base_url: profile.base_url.as_deref().unwrap_or(""),
            username: profile.username.as_deref().unwrap_or(""),
            has_token,
            is_default: config.default_profile.as_deref() == Some(name.as_str()),
        });
    }

    if rows.is_empty() {
        tracing::info!("No profiles configured yet. Use `edusoho auth login` to add one.");
    }

    renderer.render(&rows)
}

async fn whoami(ctx: AuthContext<'_>) -> Result<()> {
    let profile = resolve_active_profile(ctx.config, ctx.selection, ctx.store)?;
    if profile.token.is_none() {
        bail!("No token found. Use `edusoho auth login` to authenticate.");
    }

    let client = build_client(&profile)?;
    let body = client
        .me()
        .await
        .map_err(|err| anyhow!(err.to_legacy_string(client.is_debug())))?;
    let user: Value =
        serde_json::from_str(&body).context("Failed to parse user information")?;

    println!("Profile: {}", profile.name.as_deref().unwrap_or("(none)"));
    println!("Base URL: {}", profile.base_url);
    println!("User ID: {}", user["id"]);
    println!(
        "Nickname: {}",
        user["nickname"].as_str().unwrap_or("Unknown")
    );
    if let Some(email) = user["email"].as_str() {
        println!("Email: {email}");
    }

    Ok(())
}
