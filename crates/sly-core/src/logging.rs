#![forbid(unsafe_code)]

//! Logging setup.
//!
//! The sly crates emit `tracing` events under the `sly.resize` and
//! `sly.columns` targets and never install a subscriber themselves. Hosts
//! that do not already have one can enable the `subscriber` feature and call
//! [`install`] once at startup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output format for [`install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging section of the host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. `"sly=debug,warn"`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sly=info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Failures from [`install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    InvalidFilter { directive: String, reason: String },
    AlreadyInstalled,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { directive, reason } => {
                write!(f, "invalid log filter {directive:?}: {reason}")
            }
            Self::AlreadyInstalled => write!(f, "a global tracing subscriber is already installed"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a global `tracing-subscriber` formatter for `config`.
#[cfg(feature = "subscriber")]
pub fn install(config: &LoggingConfig) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.filter).map_err(|err| LoggingError::InvalidFilter {
        directive: config.filter.clone(),
        reason: err.to_string(),
    })?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|_| LoggingError::AlreadyInstalled)?;
    tracing::debug!(target: "sly.core", filter = %config.filter, "tracing subscriber installed");
    Ok(())
}
