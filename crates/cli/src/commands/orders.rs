use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use edusoho_api::{NewOrder, NewTrade, PaymentGateway, TargetType};

use super::utils::CommandContext;

#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    #[command(subcommand)]
    command: OrderCommands,
}

/// Coins paid towards an order or trade.
#[derive(Args, Debug, Clone)]
struct CoinArgs {
    /// Amount of virtual coins to spend
    #[arg(long)]
    coins: Option<f64>,
    /// Pay password authorizing the coin payment
    #[arg(long, env = "EDUSOHO_PAY_PASSWORD", hide_env_values = true)]
    pay_password: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum OrderCommands {
    /// Show price and payment options for a target.
    Info {
        /// classroom, course or vip
        target_type: TargetType,
        target_id: u64,
        /// Check this coupon code against the target as well
        #[arg(long)]
        coupon: Option<String>,
    },
    /// Place an order.
    Create {
        /// classroom, course or vip
        target_type: TargetType,
        target_id: u64,
        #[arg(long)]
        coupon: Option<String>,
        #[command(flatten)]
        coins: CoinArgs,
    },
    /// Show an order by serial number.
    Get { sn: String },
    /// Start a payment for an order.
    Trade {
        /// Gateway name, e.g. WechatPay_Native or Alipay_LegacyWap
        gateway: PaymentGateway,
        order_sn: String,
        /// WeChat openid, required by WechatPay_Js
        #[arg(long)]
        openid: Option<String>,
        #[command(flatten)]
        coins: CoinArgs,
    },
    /// Show a trade by serial number.
    TradeStatus { sn: String },
}

pub async fn execute(args: OrderArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        OrderCommands::Info {
            target_type,
            target_id,
            coupon,
        } => {
            ctx.emit(ctx.client.order_info(target_type, target_id).await)?;
            if let Some(code) = coupon {
                ctx.emit(
                    ctx.client
                        .check_coupon(&code, target_type, target_id)
                        .await,
                )?;
            }
            Ok(())
        }
        OrderCommands::Create {
            target_type,
            target_id,
            coupon,
            coins,
        } => {
            let mut order = NewOrder::new(target_type, target_id);
            if let Some(code) = coupon {
                order = order.with_coupon(code);
            }
            if let Some((amount, password)) = coins.into_payment()? {
                order = order.with_coins(amount, password);
            }
            ctx.emit(ctx.client.create_order(&order).await)
        }
        OrderCommands::Get { sn } => ctx.emit(ctx.client.order(&sn).await),
        OrderCommands::Trade {
            gateway,
            order_sn,
            openid,
            coins,
        } => {
            if gateway == PaymentGateway::WechatJs && openid.is_none() {
                bail!("{gateway} requires --openid");
            }
            let mut trade = NewTrade::purchase(gateway, order_sn);
            if let Some(openid) = openid {
                trade = trade.with_openid(openid);
            }
            if let Some((amount, password)) = coins.into_payment()? {
                trade = trade.with_coins(amount, password);
            }
            ctx.emit(ctx.client.create_trade(&trade).await)
        }
        OrderCommands::TradeStatus { sn } => ctx.emit(ctx.client.trade(&sn).await),
    }
}

impl CoinArgs {
    fn into_payment(self) -> Result<Option<(f64, String)>> {
        match (self.coins, self.pay_password) {
            (Some(amount), _) if amount <= 0.0 => bail!("--coins must be positive"),
            (Some(amount), Some(password)) => Ok(Some((amount, password))),
            (Some(_), None) => bail!("--coins requires --pay-password"),
            (None, _) => Ok(None),
        }
    }
}
