//! Back-office screen defaults

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::Lang;

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Language used when a request carries no `lang` parameter
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Months ahead of today proposed as expiration date on the create screen
    #[serde(default = "default_expiration_months")]
    pub default_expiration_months: u32,

    /// Coupons per page on the list screen
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl AdminConfig {
    pub fn default_lang(&self) -> Result<Lang, ValidationError> {
        Lang::from_code(&self.default_locale)
            .ok_or_else(|| ValidationError::malformed("ADMIN__DEFAULT_LOCALE", &self.default_locale))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.default_lang()?;
        ValidationError::check_range(
            "ADMIN__DEFAULT_EXPIRATION_MONTHS",
            self.default_expiration_months.into(),
            1,
            120,
        )?;
        ValidationError::check_range("ADMIN__PAGE_SIZE", self.page_size.into(), 1, 100)
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            default_expiration_months: default_expiration_months(),
            page_size: default_page_size(),
        }
    }
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_expiration_months() -> u32 {
    2
}

fn default_page_size() -> u32 {
    20
}
