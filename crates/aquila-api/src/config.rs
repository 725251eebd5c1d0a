//! Environment-driven service configuration.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Access tokens prove an authenticated session and are short-lived.
pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Refresh tokens exist only to mint new access tokens and live longer.
pub const REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment key is not set.
    #[error("configuration key \"{0}\" does not exist")]
    MissingKey(&'static str),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub http_addr: String,
    /// Secret signing access tokens.
    pub access_token_secret: String,
    /// Secret signing refresh tokens. Must differ from the access secret.
    pub refresh_token_secret: String,
}

impl AppConfig {
    /// Loads the configuration from the environment.
    ///
    /// `HTTP_ADDR` defaults to `127.0.0.1:3000`; both token secrets are
    /// required. Identical secrets are flagged as a misconfiguration but not
    /// rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let access_token_secret = required("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = required("REFRESH_TOKEN_SECRET")?;

        if access_token_secret == refresh_token_secret {
            tracing::warn!(
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET are identical; refresh tokens would verify as access tokens"
            );
        }

        Ok(Self {
            http_addr,
            access_token_secret,
            refresh_token_secret,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingKey(key))
}
