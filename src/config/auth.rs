//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Back-office token validation.
///
/// Either an OIDC issuer (`authority` + `audience`) or, outside production,
/// a fixed `dev_token` that grants every permission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// OIDC issuer URL
    #[serde(default)]
    pub authority: String,

    /// Expected audience for tokens
    #[serde(default)]
    pub audience: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,

    /// Static bearer token for local development
    #[serde(default)]
    pub dev_token: Option<String>,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// The development token, when one is configured and non-empty.
    pub fn dev_token(&self) -> Option<&str> {
        self.dev_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let production = environment == Environment::Production;
        if production && self.dev_token().is_some() {
            return Err(ValidationError::ForbiddenInProduction("AUTH__DEV_TOKEN"));
        }
        if self.dev_token().is_some() {
            return Ok(());
        }

        if self.authority.is_empty() {
            return Err(ValidationError::Missing("AUTH__AUTHORITY"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::Missing("AUTH__AUDIENCE"));
        }
        if production && !self.authority.starts_with("https://") {
            return Err(ValidationError::malformed("AUTH__AUTHORITY", &self.authority));
        }

        Ok(())
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
