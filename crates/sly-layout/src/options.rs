//! Resize handle configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sly_core::Length;

use crate::drag::DragAnchor;
use crate::host::CursorIcon;

/// Default window without pointer activity before a drag is abandoned.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for one resize handle.
///
/// The pane size lives in the layout variable `property`; its bounds are read
/// from `<property>-min` and `<property>-max`, and the in-flight drag formula
/// is written to `<property>_calc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub property: String,
    pub anchor: DragAnchor,
    /// Class selector of the grid container that owns `property`.
    pub container_selector: String,
    pub liveness_timeout_ms: u64,
    /// Treat the pointer leaving the window as the end of the drag.
    pub end_on_pointer_leave: bool,
    /// Used when `<property>-min` is not defined.
    pub fallback_min: Option<Length>,
    /// Used when `<property>-max` is not defined.
    pub fallback_max: Option<Length>,
    /// Cursor forced during the drag. Defaults to the anchor axis cursor.
    pub cursor: Option<CursorIcon>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            property: "--sidebar-width".to_string(),
            anchor: DragAnchor::default(),
            container_selector: ".sly-pane-grid".to_string(),
            liveness_timeout_ms: DEFAULT_LIVENESS_TIMEOUT.as_millis() as u64,
            end_on_pointer_leave: false,
            fallback_min: None,
            fallback_max: None,
            cursor: None,
        }
    }
}

impl ResizeOptions {
    #[must_use]
    pub fn new(property: impl Into<String>, anchor: DragAnchor) -> Self {
        Self {
            property: property.into(),
            anchor,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout_ms = timeout.as_millis().min(u128::from(u64::MAX)) as u64;
        self
    }

    #[must_use]
    pub fn with_end_on_pointer_leave(mut self, enabled: bool) -> Self {
        self.end_on_pointer_leave = enabled;
        self
    }

    #[must_use]
    pub fn with_fallback_bounds(mut self, min: Option<Length>, max: Option<Length>) -> Self {
        self.fallback_min = min;
        self.fallback_max = max;
        self
    }

    #[must_use]
    pub const fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.liveness_timeout_ms)
    }

    #[must_use]
    pub fn min_variable(&self) -> String {
        format!("{}-min", self.property)
    }

    #[must_use]
    pub fn max_variable(&self) -> String {
        format!("{}-max", self.property)
    }

    /// Scratch variable holding the drag formula.
    #[must_use]
    pub fn calc_variable(&self) -> String {
        format!("{}_calc", self.property)
    }

    #[must_use]
    pub fn cursor_icon(&self) -> CursorIcon {
        self.cursor
            .unwrap_or_else(|| CursorIcon::for_axis(self.anchor.axis()))
    }
}
