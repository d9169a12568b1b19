//! Scalar coupon payload carried by create and update commands and events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CouponCode, CouponEffect, CouponRuleCollection};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Maximum length for a coupon title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length for the short description.
pub const MAX_SHORT_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum amount of a percentage coupon.
pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places kept for an amount.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Largest amount that fits the stored precision.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MAX_AMOUNT_SCALE);

/// `max_usage` value meaning the coupon can be used without limit.
pub const UNLIMITED_USAGE: i32 = -1;

/// All editable fields of a coupon.
///
/// Built from a validated admin form and handed to the aggregate, which
/// re-checks the invariants below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponDraft {
    pub code: CouponCode,
    pub title: String,
    pub amount: Decimal,
    pub effect: CouponEffect,
    pub short_description: String,
    pub description: String,
    pub is_enabled: bool,
    pub expiration_date: Timestamp,
    pub is_available_on_special_offers: bool,
    pub is_cumulative: bool,
    pub is_removing_postage: bool,
    pub max_usage: i32,
    pub rules: CouponRuleCollection,
    pub locale: String,
}

impl CouponDraft {
    /// Returns every invariant violation, in field order.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            violations.push(ValidationError::empty_field("title"));
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            violations.push(ValidationError::too_long(
                "title",
                MAX_TITLE_LENGTH,
                title.chars().count(),
            ));
        }

        violations.extend(check_amount(self.effect, self.amount));

        let short_len = self.short_description.chars().count();
        if short_len > MAX_SHORT_DESCRIPTION_LENGTH {
            violations.push(ValidationError::too_long(
                "short_description",
                MAX_SHORT_DESCRIPTION_LENGTH,
                short_len,
            ));
        }

        if self.max_usage < UNLIMITED_USAGE {
            violations.push(ValidationError::out_of_range(
                "max_usage",
                UNLIMITED_USAGE,
                i32::MAX,
                self.max_usage,
            ));
        }

        violations.extend(check_locale("locale", &self.locale));

        violations
    }

    /// Checks the invariants, failing on the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.violations().into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// Checks a discount amount against its effect.
pub(crate) fn check_amount(effect: CouponEffect, amount: Decimal) -> Option<ValidationError> {
    if amount <= Decimal::ZERO {
        return Some(ValidationError::invalid_format(
            "amount",
            "must be greater than zero",
        ));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Some(ValidationError::invalid_format(
            "amount",
            format!("must have at most {MAX_AMOUNT_SCALE} decimal places"),
        ));
    }
    if amount > MAX_AMOUNT {
        return Some(ValidationError::out_of_range("amount", 0, MAX_AMOUNT, amount));
    }
    if effect.is_percentage() && amount > MAX_PERCENTAGE {
        return Some(ValidationError::out_of_range(
            "amount",
            0,
            MAX_PERCENTAGE,
            amount,
        ));
    }
    None
}

/// Checks a locale has the `ll_CC` shape, e.g. `en_US`.
pub(crate) fn check_locale(field: &str, locale: &str) -> Option<ValidationError> {
    let locale = locale.trim();
    if locale.is_empty() {
        return Some(ValidationError::empty_field(field));
    }

    let bytes = locale.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[..2].iter().all(u8::is_ascii_lowercase)
        && bytes[2] == b'_'
        && bytes[3..].iter().all(u8::is_ascii_uppercase);

    if well_formed {
        None
    } else {
        Some(ValidationError::invalid_format(field, "must look like en_US"))
    }
}
