#![forbid(unsafe_code)]

//! Pane drag-resize and shared file-tree column layout.
//!
//! `sly` bundles the workspace crates behind one dependency:
//! - [`sly_layout`]: drag constraint, resize controller, host traits, and
//!   the in-memory layout host.
//! - [`sly_columns`]: the column width registry, probes, and template
//!   publishing.
//! - [`sly_core`]: clocks, deadlines, lengths, and logging setup.
//!
//! [`LayoutServices`] is the per-mount entry point; [`SlyConfig`] configures
//! it.
//!
//! # Example
//!
//! ```
//! use sly::prelude::*;
//!
//! let services = LayoutServices::mount(SlyConfig::default()).expect("default config is valid");
//!
//! let mut layout = MemoryLayout::new();
//! let grid = layout.add_root(&["sly-pane-grid"]);
//! let sidebar = layout.add_child(grid, &["sidebar"]).expect("grid exists");
//! let handle = layout.add_child(sidebar, &["edge"]).expect("sidebar exists");
//! layout.set_grid(
//!     grid,
//!     GridSpec::columns(
//!         Length::px(1000.0),
//!         vec![TrackSize::Variable("--sidebar-width".into()), TrackSize::Fraction(1.0)],
//!     ),
//! );
//! layout.set_variable(grid, "--sidebar-width", Length::px(200.0).into());
//! layout.set_variable(grid, "--sidebar-width-min", Length::px(100.0).into());
//! layout.set_variable(grid, "--sidebar-width-max", Length::px(500.0).into());
//!
//! let mut resize = services.resize_controller(handle, ManualClock::new());
//! resize.pointer_down(&mut layout, 1, PointerPosition::new(300.0, 0.0))?;
//! resize.pointer_move(&mut layout, 1, PointerPosition::new(350.0, 0.0))?;
//! let end = resize.pointer_up(&mut layout, 1)?;
//! assert_eq!(end.snapped, Some(Length::px(250.0)));
//! # Ok::<(), ResizeError>(())
//! ```

pub mod config;
pub mod services;

pub use config::{ConfigError, SlyConfig};
pub use services::LayoutServices;

pub use sly_columns;
pub use sly_core;
pub use sly_layout;

#[cfg(feature = "subscriber")]
pub use sly_core::logging::install as install_logging;

/// Common imports for hosts.
pub mod prelude {
    pub use crate::{ConfigError, LayoutServices, SlyConfig};
    pub use sly_columns::{
        ColumnProbe, ColumnRegistry, ColumnTemplate, ColumnsConfig, ScrollGutter,
    };
    pub use sly_core::logging::{LogFormat, LoggingConfig};
    pub use sly_core::{Length, ManualClock, MonotonicClock, SystemClock};
    pub use sly_layout::{
        CursorIcon, DragAnchor, GridSpec, LayoutInspector, MemoryLayout, NodeId, PointerPosition,
        PointerSurface, ResizeController, ResizeDispatch, ResizeError, ResizeOptions,
        ResizeOutcome, SessionEndReason, SizeExpr, TrackSize, VariableStore, VariableValue,
    };
}
