#![forbid(unsafe_code)]

//! Shared column widths for file-tree metadata cells.
//!
//! # Role in sly
//! Metadata cells (size, modified date, ...) are mounted and unmounted as the
//! tree scrolls and expands. Cells with the same column key must line up, so
//! every cell reports its rendered width to a [`ColumnRegistry`], which keeps
//! the widest width seen per key while any cell of that key is mounted and
//! publishes a [`ColumnTemplate`] whenever the derived grid changes.
//!
//! # Pieces
//! - [`ColumnRegistry`]: reference-counted, ratcheting width aggregator with
//!   change subscriptions.
//! - [`ColumnProbe`]: the per-cell handle; dropping it is the only way a
//!   cell's contribution goes away.
//! - [`publish_to`] / [`ColumnTemplate::apply`]: write the template and the
//!   per-column size variables to a layout host.
//! - [`ScrollGutter`]: scrollbar gutter width for aligning headers.

pub mod config;
pub mod gutter;
pub mod probe;
pub mod publish;
pub mod registry;
pub mod template;

pub use config::ColumnsConfig;
pub use gutter::{ScrollGutter, scrollbar_width};
pub use probe::{ColumnProbe, MeasureWidth};
pub use publish::{bind_column_grid, publish_to};
pub use registry::{ColumnEntry, ColumnRegistry, ReleaseOutcome, TemplateSubscription};
pub use template::{ColumnTemplate, ColumnTrack};
