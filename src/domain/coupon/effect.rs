//! How a coupon reduces the order total.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discount effect of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouponEffect {
    /// Removes a fixed amount from the order total.
    #[serde(rename = "remove_x_amount")]
    RemoveXAmount,
    /// Removes a percentage of the order total.
    #[serde(rename = "remove_x_percent")]
    RemoveXPercent,
}

impl CouponEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponEffect::RemoveXAmount => "remove_x_amount",
            CouponEffect::RemoveXPercent => "remove_x_percent",
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, CouponEffect::RemoveXPercent)
    }
}

impl fmt::Display for CouponEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponEffect {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "remove_x_amount" => Ok(CouponEffect::RemoveXAmount),
            "remove_x_percent" => Ok(CouponEffect::RemoveXPercent),
            "" => Err(ValidationError::empty_field("effect")),
            other => Err(ValidationError::invalid_format(
                "effect",
                format!("unknown effect '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_effects() {
        assert_eq!(
            "remove_x_amount".parse::<CouponEffect>().unwrap(),
            CouponEffect::RemoveXAmount
        );
        assert_eq!(
            " remove_x_percent ".parse::<CouponEffect>().unwrap(),
            CouponEffect::RemoveXPercent
        );
    }

    #[test]
    fn rejects_unknown_effect() {
        let err = "free_shipping".parse::<CouponEffect>().unwrap_err();
        assert_eq!(err.field(), "effect");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&CouponEffect::RemoveXPercent).unwrap();
        assert_eq!(json, r#""remove_x_percent""#);
    }

    #[test]
    fn only_percent_effect_is_percentage() {
        assert!(CouponEffect::RemoveXPercent.is_percentage());
        assert!(!CouponEffect::RemoveXAmount.is_percentage());
    }
}
