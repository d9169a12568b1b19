//! Admin router settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timeout and CORS settings applied to every admin route.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds before a pending request is answered with 408
    pub request_timeout_secs: u64,

    /// Comma-separated origins allowed to call the admin screens from a browser
    pub cors_origins: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            cors_origins: String::new(),
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured origins, blanks dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range(
            "HTTP__REQUEST_TIMEOUT_SECS",
            self.request_timeout_secs,
            1,
            300,
        )
    }
}
