//! String-token enums sent to the API.
//!
//! Each enum has a stable index (its position, starting at zero) so callers
//! that hold numeric selections can convert with `TryFrom<usize>`. Indexes
//! outside the range fail with [`ApiError::UnknownIndex`].

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ApiError;

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl TryFrom<usize> for $name {
            type Error = ApiError;

            fn try_from(index: usize) -> Result<Self, Self::Error> {
                $name::ALL
                    .get(index)
                    .copied()
                    .ok_or(ApiError::UnknownIndex { kind: $kind, index })
            }
        }

        impl std::str::FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ApiError::InvalidArgument(format!("unknown {}: {s}", $kind)))
            }
        }
    };
}

token_enum! {
    /// What an order, coupon, or information-collection event refers to.
    TargetType, "target type" {
        Classroom => "classroom",
        Course => "course",
        Vip => "vip",
    }
}

token_enum! {
    /// Payment provider used to settle a trade.
    PaymentGateway, "payment gateway" {
        WechatNative => "WechatPay_Native",
        WechatMweb => "WechatPay_MWeb",
        WechatJs => "WechatPay_Js",
        WechatApp => "WechatPay_App",
        AlipayExpress => "Alipay_LegacyExpress",
        AlipayWap => "Alipay_LegacyWap",
        AlipayApp => "Alipay_LegacyApp",
        LianlianWeb => "Lianlian_Web",
        LianlianWap => "Lianlian_Wap",
    }
}

token_enum! {
    TradeType, "trade type" {
        Purchase => "purchase",
        Recharge => "recharge",
    }
}

token_enum! {
    /// Progress event reported for a course task.
    TaskEvent, "task event" {
        Doing => "doing",
        Finish => "finish",
    }
}

token_enum! {
    /// How `users/{identify}` interprets its path segment.
    IdentifyType, "identify type" {
        Id => "id",
        Mobile => "mobile",
        Email => "email",
        Nickname => "nickname",
    }
}

token_enum! {
    SmsType, "sms type" {
        Registration => "sms_registration",
        ForgetPassword => "sms_forget_password",
        Login => "sms_login",
        BindMobile => "sms_bind",
    }
}

token_enum! {
    /// When an information-collection form is shown relative to purchase.
    CollectAction, "collect action" {
        BuyBefore => "buy_before",
        BuyAfter => "buy_after",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_indexes() {
        assert_eq!(TargetType::try_from(0).unwrap(), TargetType::Classroom);
        assert_eq!(TargetType::try_from(1).unwrap().as_str(), "course");
        assert_eq!(TargetType::try_from(2).unwrap().as_str(), "vip");
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let err = TargetType::try_from(3).unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnknownIndex {
                kind: "target type",
                index: 3
            }
        ));

        assert!(PaymentGateway::try_from(PaymentGateway::ALL.len()).is_err());
    }

    #[test]
    fn test_gateway_tokens() {
        assert_eq!(PaymentGateway::try_from(0).unwrap().as_str(), "WechatPay_Native");
        assert_eq!(PaymentGateway::try_from(4).unwrap().as_str(), "Alipay_LegacyExpress");
        assert_eq!(PaymentGateway::LianlianWap.to_string(), "Lianlian_Wap");
    }

    #[test]
    fn test_serializes_as_token() {
        let value = serde_json::to_value(TaskEvent::Finish).unwrap();
        assert_eq!(value, serde_json::json!("finish"));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("COURSE".parse::<TargetType>().unwrap(), TargetType::Course);
        assert_eq!(
            "alipay_legacywap".parse::<PaymentGateway>().unwrap(),
            PaymentGateway::AlipayWap
        );
        assert!("bundle".parse::<TargetType>().is_err());
    }
}
