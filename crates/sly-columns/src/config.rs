//! Variable names used when publishing column layout.

use serde::{Deserialize, Serialize};

/// Names of the layout variables written for column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Variable holding the full track list (`minmax(80px, auto) ...`).
    pub template_variable: String,
    /// Per-column size variable is `<prefix><key><suffix>`.
    pub cell_variable_prefix: String,
    pub cell_variable_suffix: String,
    /// Grid property pointed at the template variable by
    /// [`crate::bind_column_grid`].
    pub grid_property: String,
    pub scrollbar_variable: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            template_variable: "--sly-tree-metadata-columns".to_string(),
            cell_variable_prefix: "--sly-tree-cell-".to_string(),
            cell_variable_suffix: "-size".to_string(),
            grid_property: "grid-template-columns".to_string(),
            scrollbar_variable: "--sly-scrollbar-width".to_string(),
        }
    }
}

impl ColumnsConfig {
    /// Size variable for column `key`.
    #[must_use]
    pub fn cell_variable(&self, key: &str) -> String {
        format!(
            "{}{key}{}",
            self.cell_variable_prefix, self.cell_variable_suffix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_variable_wraps_key() {
        let config = ColumnsConfig::default();
        assert_eq!(config.cell_variable("size"), "--sly-tree-cell-size-size");
        assert_eq!(config.cell_variable("modified"), "--sly-tree-cell-modified-size");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ColumnsConfig =
            serde_json::from_str(r#"{"cell_variable_prefix":"--col-"}"#).expect("valid config");
        assert_eq!(config.cell_variable("a"), "--col-a-size");
        assert_eq!(config.template_variable, "--sly-tree-metadata-columns");
    }
}
