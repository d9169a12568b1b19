//! Configuration errors

use thiserror::Error;

/// Loading or checking the configuration failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configuration value is missing or unusable.
///
/// Keys are named as they are set, without the `COUPON_ADMIN__` prefix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has an unusable value '{value}'")]
    Malformed { key: &'static str, value: String },

    #[error("{key} must be between {min} and {max}")]
    OutOfRange {
        key: &'static str,
        min: u64,
        max: u64,
    },

    #[error("{0} is not allowed in production")]
    ForbiddenInProduction(&'static str),
}

impl ValidationError {
    pub(crate) fn malformed(key: &'static str, value: impl Into<String>) -> Self {
        ValidationError::Malformed {
            key,
            value: value.into(),
        }
    }

    /// Fails unless `value` lies in `min..=max`.
    pub(crate) fn check_range(
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    ) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange { key, min, max })
        }
    }
}
