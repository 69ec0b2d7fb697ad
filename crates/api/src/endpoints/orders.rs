use crate::error::Result;
use crate::params::Params;
use crate::types::{PaymentGateway, TargetType, TradeType};
use crate::{path_segment, ApiClient};

/// Body of `POST orders`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub target_type: TargetType,
    pub target_id: u64,
    pub coupon_code: Option<String>,
    pub coin_amount: Option<f64>,
    pub pay_password: Option<String>,
}

impl NewOrder {
    pub fn new(target_type: TargetType, target_id: u64) -> Self {
        Self {
            target_type,
            target_id,
            coupon_code: None,
            coin_amount: None,
            pay_password: None,
        }
    }

    /// Same as [`NewOrder::new`] with the target type given by index
    /// (0 classroom, 1 course, 2 vip).
    pub fn from_index(target_type: usize, target_id: u64) -> Result<Self> {
        Ok(Self::new(TargetType::try_from(target_type)?, target_id))
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// Pays part of the order with virtual coins; requires the pay password.
    pub fn with_coins(mut self, amount: f64, pay_password: impl Into<String>) -> Self {
        self.coin_amount = Some(amount);
        self.pay_password = Some(pay_password.into());
        self
    }

    fn to_params(&self) -> Params {
        Params::new()
            .set("targetType", self.target_type.as_str())
            .set("targetId", self.target_id)
            .set_opt("couponCode", self.coupon_code.clone())
            .set_opt("coinAmount", self.coin_amount)
            .set_opt("payPassword", self.pay_password.clone())
    }
}

/// Body of `POST trades`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub gateway: PaymentGateway,
    pub trade_type: TradeType,
    pub order_sn: String,
    pub coin_amount: Option<f64>,
    pub pay_password: Option<String>,
    pub openid: Option<String>,
}

impl NewTrade {
    pub fn purchase(gateway: PaymentGateway, order_sn: impl Into<String>) -> Self {
        Self {
            gateway,
            trade_type: TradeType::Purchase,
            order_sn: order_sn.into(),
            coin_amount: None,
            pay_password: None,
            openid: None,
        }
    }

    /// Same as [`NewTrade::purchase`] with the gateway given by index.
    pub fn purchase_with_index(gateway: usize, order_sn: impl Into<String>) -> Result<Self> {
        Ok(Self::purchase(PaymentGateway::try_from(gateway)?, order_sn))
    }

    /// Required by the in-app WeChat gateway.
    pub fn with_openid(mut self, openid: impl Into<String>) -> Self {
        self.openid = Some(openid.into());
        self
    }

    pub fn with_coins(mut self, amount: f64, pay_password: impl Into<String>) -> Self {
        self.coin_amount = Some(amount);
        self.pay_password = Some(pay_password.into());
        self
    }

    fn to_params(&self) -> Params {
        Params::new()
            .set("gateway", self.gateway.as_str())
            .set("type", self.trade_type.as_str())
            .set("orderSn", self.order_sn.as_str())
            .set_opt("coinAmount", self.coin_amount)
            .set_opt("payPassword", self.pay_password.clone())
            .set_opt("openid", self.openid.clone())
    }
}

impl ApiClient {
    /// Price and payment options for a target before an order is placed.
    pub async fn order_info(&self, target_type: TargetType, target_id: u64) -> Result<String> {
        let params = Params::new()
            .set("targetType", target_type.as_str())
            .set("targetId", target_id);
        self.post("order_infos", &params).await
    }

    pub async fn create_order(&self, order: &NewOrder) -> Result<String> {
        self.post("orders", &order.to_params()).await
    }

    pub async fn order(&self, order_sn: &str) -> Result<String> {
        self.get(&format!("orders/{}", path_segment(order_sn)?), &Params::new())
            .await
    }

    pub async fn create_trade(&self, trade: &NewTrade) -> Result<String> {
        self.post("trades", &trade.to_params()).await
    }

    pub async fn trade(&self, trade_sn: &str) -> Result<String> {
        self.get(&format!("trades/{}", path_segment(trade_sn)?), &Params::new())
            .await
    }

    /// Checks whether a coupon code applies to a target.
    pub async fn check_coupon(
        &self,
        code: &str,
        target_type: TargetType,
        target_id: u64,
    ) -> Result<String> {
        let params = Params::new()
            .set("type", "using")
            .set("targetType", target_type.as_str())
            .set("targetId", target_id);
        self.post(&format!("coupons/{}/actions", path_segment(code)?), &params)
            .await
    }
}
