use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use edusoho_api::{Params, SmsType};

use super::utils::{CommandContext, PagingArgs};

#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    #[command(subcommand)]
    command: SiteCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum SiteCommands {
    /// Show a settings group such as site, course or user.
    Settings { name: String },
    /// List the mobile app home channels.
    Channels,
    /// List notifications of the current user.
    Notifications {
        /// Notification type, e.g. course
        #[arg(long = "type")]
        kind: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List announcements.
    Announcements {
        /// Only announcements after this unix timestamp
        #[arg(long, default_value_t = 0)]
        start_time: i64,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Issue an image captcha, or verify one with --token and --phrase.
    Captcha {
        #[arg(long, requires = "phrase")]
        token: Option<String>,
        #[arg(long)]
        phrase: Option<String>,
    },
    /// Send an SMS verification code.
    Sms {
        /// sms_registration, sms_forget_password, sms_login or sms_bind
        sms_type: SmsType,
        mobile: String,
        /// Captcha token from `site captcha`
        #[arg(long)]
        captcha_token: String,
        #[arg(long)]
        phrase: String,
    },
}

pub async fn execute(args: SiteArgs, ctx: &CommandContext) -> Result<()> {
    let client = &ctx.client;
    let result = match args.command {
        SiteCommands::Settings { name } => client.settings(&name).await,
        SiteCommands::Channels => client.app_channels().await,
        SiteCommands::Notifications { kind, paging } => {
            let filter = Params::from(edusoho_api::Paging::from(paging)).set_opt("type", kind);
            client.notifications(&filter).await
        }
        SiteCommands::Announcements { start_time, paging } => {
            client.announcements(start_time, paging.into()).await
        }
        SiteCommands::Captcha { token, phrase } => match (token, phrase) {
            (Some(token), Some(phrase)) => client.verify_captcha(&token, &phrase).await,
            (None, None) => client.create_captcha().await,
            _ => bail!("--token and --phrase must be given together"),
        },
        SiteCommands::Sms {
            sms_type,
            mobile,
            captcha_token,
            phrase,
        } => {
            client
                .send_sms(sms_type, &mobile, &captcha_token, &phrase)
                .await
        }
    };
    ctx.emit(result)
}
