//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `COUPON_ADMIN` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use coupon_admin::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod admin;
mod auth;
mod database;
mod error;
mod http;
mod server;

pub use admin::AdminConfig;
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use http::HttpConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Request timeout and CORS for the admin router
    #[serde(default)]
    pub http: HttpConfig,

    /// PostgreSQL connection; coupons are kept in memory without it
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Token validation (OIDC or development token)
    #[serde(default)]
    pub auth: AuthConfig,

    /// Back-office screen defaults
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` if present, then every `COUPON_ADMIN__*` variable:
    ///
    /// - `COUPON_ADMIN__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COUPON_ADMIN__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COUPON_ADMIN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.http.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(self.server.environment)?;
        self.admin.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
