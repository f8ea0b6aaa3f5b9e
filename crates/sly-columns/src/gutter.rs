//! Scrollbar gutter measurement.
//!
//! Column headers sit outside the scrolling body, so they need to know how
//! much of the body's width the vertical scrollbar takes.

use sly_core::Length;
use sly_layout::{NodeId, VariableStore};

use crate::config::ColumnsConfig;

/// `outer - content`, in whole pixels and never negative. A missing content
/// element means no scrollbar.
#[must_use]
pub fn scrollbar_width(outer: Length, content: Option<Length>) -> Length {
    let content = content.unwrap_or(outer);
    Length::px((outer.get() - content.get()).max(0.0)).round()
}

/// Publishes the scrollbar width of one scroll container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollGutter {
    container: NodeId,
    variable: String,
}

impl ScrollGutter {
    #[must_use]
    pub fn new(container: NodeId, config: &ColumnsConfig) -> Self {
        Self {
            container,
            variable: config.scrollbar_variable.clone(),
        }
    }

    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Measure and write the gutter width to the container.
    pub fn measure<S: VariableStore + ?Sized>(
        &self,
        store: &mut S,
        outer: Length,
        content: Option<Length>,
    ) -> Length {
        let width = scrollbar_width(outer, content);
        store.set_variable(self.container, &self.variable, width.into());
        tracing::trace!(
            target: "sly.columns",
            container = %self.container,
            %width,
            "scrollbar gutter measured"
        );
        width
    }
}
