//! Host configuration.
//!
//! [`SlyConfig`] gathers the resize, column, and logging sections. Every
//! field has a default, so a partial file only needs the values it changes:
//!
//! ```toml
//! [resize]
//! property = "--sidebar-width"
//! anchor = "left"
//! liveness_timeout_ms = 3000
//!
//! [columns]
//! template_variable = "--sly-tree-metadata-columns"
//!
//! [logging]
//! filter = "sly=debug"
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use sly_columns::ColumnsConfig;
use sly_core::logging::LoggingConfig;
use sly_layout::ResizeOptions;

/// Aggregate configuration for [`crate::LayoutServices`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlyConfig {
    pub resize: ResizeOptions,
    pub columns: ColumnsConfig,
    pub logging: LoggingConfig,
}

impl SlyConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check values the layout host would otherwise misread.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let resize = &self.resize;
        if !resize.property.starts_with("--") {
            errors.push(format!(
                "resize.property {:?} must be a custom property starting with \"--\"",
                resize.property
            ));
        }
        if resize.container_selector.trim().is_empty() {
            errors.push("resize.container_selector must not be empty".to_string());
        }
        if resize.liveness_timeout_ms == 0 {
            errors.push("resize.liveness_timeout_ms must be > 0".to_string());
        }
        if let (Some(min), Some(max)) = (resize.fallback_min, resize.fallback_max) {
            if min > max {
                errors.push(format!(
                    "resize.fallback_min ({min}) must not exceed resize.fallback_max ({max})"
                ));
            }
        }

        let columns = &self.columns;
        for (name, value) in [
            ("columns.template_variable", &columns.template_variable),
            ("columns.cell_variable_prefix", &columns.cell_variable_prefix),
            ("columns.scrollbar_variable", &columns.scrollbar_variable),
        ] {
            if !value.starts_with("--") {
                errors.push(format!("{name} {value:?} must start with \"--\""));
            }
        }
        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".to_string());
        }
        errors
    }
}

/// Errors from loading or validating a [`SlyConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Output of [`SlyConfig::validate`].
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
