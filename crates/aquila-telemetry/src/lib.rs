//! Structured logging for the Aquila service.
//!
//! Thin wrapper over the tracing-subscriber ecosystem: JSON output for
//! production, pretty output for development, level selection via
//! `EnvFilter` syntax.
//!
//! # Example
//!
//! ```rust,ignore
//! use aquila_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! tracing::info!(addr = "127.0.0.1:3000", "server listening");
//! ```

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging initialization failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive, or a global
    /// subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level or `EnvFilter` directive (e.g. "info", "aquila=debug").
    pub level: String,

    /// Whether to emit JSON-formatted records.
    pub json_format: bool,

    /// Whether to include the target module path.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Human-readable output at debug level, for local development.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            include_target: true,
        }
    }

    /// JSON output at info level.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] when the level directive is
/// invalid or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|err| TelemetryError::LoggingInit(format!("invalid log level: {err}")))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|err| TelemetryError::LoggingInit(err.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|err| TelemetryError::LoggingInit(err.to_string()))?;
    }

    Ok(())
}
