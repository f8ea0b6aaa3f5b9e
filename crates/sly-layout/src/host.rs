//! Host boundary.
//!
//! The resize engine never walks a real UI tree. It asks a host for resolved
//! layout facts ([`LayoutInspector`]), writes layout variables through
//! [`VariableStore`], and requests global pointer side effects through
//! [`PointerSurface`]. A DOM binding implements these over computed styles
//! and event listeners; [`crate::MemoryLayout`] implements them in memory.

use std::fmt;

use serde::{Deserialize, Serialize};
use sly_core::Length;

use crate::drag::Axis;
use crate::expr::SizeExpr;

/// Opaque host node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Value written to a layout variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    /// A size the host can resolve to a length.
    Size(SizeExpr),
    /// Opaque text (track lists and the like).
    Text(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(expr) => write!(f, "{expr}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<SizeExpr> for VariableValue {
    fn from(expr: SizeExpr) -> Self {
        Self::Size(expr)
    }
}

impl From<Length> for VariableValue {
    fn from(length: Length) -> Self {
        Self::Size(SizeExpr::Length(length))
    }
}

impl From<String> for VariableValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Cursor shown globally while a drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorIcon {
    EwResize,
    NsResize,
}

impl CursorIcon {
    /// Resize cursor for `axis`.
    #[must_use]
    pub const fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::EwResize,
            Axis::Vertical => Self::NsResize,
        }
    }
}

/// Read-only resolved-layout queries.
pub trait LayoutInspector {
    /// Nearest ancestor-or-self of `node` matching `selector`.
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId>;

    /// Resolved value of the layout variable `name` as seen by `container`.
    fn resolved_variable(&self, container: NodeId, name: &str) -> Option<Length>;

    /// Resolved track sizes of `container` along `axis`, in track order.
    fn resolved_tracks(&self, container: NodeId, axis: Axis) -> Vec<Length>;

    /// Index of the direct layout child of `container` that contains
    /// `descendant` (or is it).
    fn child_index(&self, container: NodeId, descendant: NodeId) -> Option<usize>;
}

/// Layout variable writes.
pub trait VariableStore {
    fn set_variable(&mut self, node: NodeId, name: &str, value: VariableValue);

    /// Remove `name` from `node`. Removing an absent variable is a no-op.
    fn remove_variable(&mut self, node: NodeId, name: &str);
}

/// Global pointer side effects for a drag. Every method must be idempotent:
/// unbinding unbound listeners or restoring an unmodified cursor does nothing.
pub trait PointerSurface {
    /// Route window-level move/up/cancel/lost-capture events to `handle`.
    fn bind_pointer_listeners(&mut self, handle: NodeId);
    fn unbind_pointer_listeners(&mut self, handle: NodeId);

    /// Force `cursor` everywhere and suppress text selection.
    fn override_global_cursor(&mut self, cursor: CursorIcon);
    fn restore_global_cursor(&mut self);

    fn set_pointer_capture(&mut self, handle: NodeId, pointer_id: u32);
    fn release_pointer_capture(&mut self, handle: NodeId, pointer_id: u32);
}

/// Everything a [`crate::ResizeController`] needs from its host.
pub trait LayoutHost: LayoutInspector + VariableStore + PointerSurface {}

impl<T: LayoutInspector + VariableStore + PointerSurface + ?Sized> LayoutHost for T {}
