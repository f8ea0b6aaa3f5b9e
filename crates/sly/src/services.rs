//! Per-tree layout services.
//!
//! A host creates one [`LayoutServices`] when it mounts a pane layout with a
//! file tree and drops (or [`LayoutServices::unmount`]s) it on unmount. The
//! column registry lives exactly as long as the services object, so column
//! widths never leak between independently mounted trees.

use std::cell::RefCell;
use std::rc::Rc;

use sly_columns::{
    ColumnProbe, ColumnRegistry, MeasureWidth, ScrollGutter, TemplateSubscription, bind_column_grid,
    publish_to,
};
use sly_core::MonotonicClock;
use sly_layout::{NodeId, ResizeController, ResizeOptions, VariableStore};

use crate::config::{ConfigError, SlyConfig};

/// Shared services for one mounted layout.
#[derive(Debug)]
pub struct LayoutServices {
    config: SlyConfig,
    registry: ColumnRegistry,
}

impl LayoutServices {
    /// Validate `config` and create an empty registry.
    pub fn mount(config: SlyConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        tracing::debug!(
            target: "sly.services",
            property = %config.resize.property,
            "layout services mounted"
        );
        Ok(Self {
            config,
            registry: ColumnRegistry::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SlyConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// Register a metadata cell under `key`.
    pub fn probe<N: MeasureWidth + ?Sized>(&self, key: impl Into<String>, node: &N) -> ColumnProbe {
        ColumnProbe::attach(&self.registry, key, node)
    }

    /// Controller for a resize handle using the configured resize options.
    #[must_use]
    pub fn resize_controller<C: MonotonicClock>(
        &self,
        handle: NodeId,
        clock: C,
    ) -> ResizeController<C> {
        ResizeController::new(handle, self.config.resize.clone(), clock)
    }

    /// Controller for a handle that needs its own options (a second pane
    /// edge, say).
    #[must_use]
    pub fn resize_controller_with<C: MonotonicClock>(
        &self,
        handle: NodeId,
        options: ResizeOptions,
        clock: C,
    ) -> ResizeController<C> {
        ResizeController::new(handle, options, clock)
    }

    /// Keep `container` in sync with the column template.
    pub fn publish_columns<S: VariableStore + 'static>(
        &self,
        container: NodeId,
        store: Rc<RefCell<S>>,
    ) -> TemplateSubscription {
        publish_to(&self.registry, container, store, self.config.columns.clone())
    }

    /// Point a metadata list's grid at the column template.
    pub fn bind_list<S: VariableStore + ?Sized>(&self, store: &mut S, list: NodeId) {
        bind_column_grid(store, list, &self.config.columns);
    }

    #[must_use]
    pub fn scroll_gutter(&self, container: NodeId) -> ScrollGutter {
        ScrollGutter::new(container, &self.config.columns)
    }

    /// Tear down explicitly. Equivalent to dropping.
    pub fn unmount(self) {}
}

impl Drop for LayoutServices {
    fn drop(&mut self) {
        self.registry.clear();
        tracing::debug!(target: "sly.services", "layout services unmounted");
    }
}
