//! Coupon code value object.
//!
//! # Validation Rules
//!
//! - 1 to 45 characters after trimming
//! - ASCII letters, digits, `_` and `-` only
//! - Normalized to uppercase, so `summer-10` and `SUMMER-10` are the same code

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a coupon code.
pub const MAX_CODE_LENGTH: usize = 45;

/// A validated, uppercase coupon code typed by customers at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    /// Creates a CouponCode from user input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is empty, too long or contains
    /// characters other than letters, digits, `_` and `-`.
    pub fn try_new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        let length = trimmed.chars().count();
        if length > MAX_CODE_LENGTH {
            return Err(ValidationError::too_long("code", MAX_CODE_LENGTH, length));
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "code",
                "letters, digits, '_' and '-' only",
            ));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
