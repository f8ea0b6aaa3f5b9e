#![forbid(unsafe_code)]

//! Drag-resize constraint engine.
//!
//! # Role in sly
//! `sly-layout` turns a stream of pointer positions into a clamped size for
//! one pane, expressed as a live [`SizeExpr`] bound to a layout variable on
//! the pane's governing container, and snaps that variable to a concrete
//! track length when the drag ends.
//!
//! # Pieces
//! - [`constrain`]: the pure clamp/delta computation.
//! - [`ResizeController`]: per-handle `Idle -> Dragging -> Idle` machine with
//!   a liveness deadline and a single cleanup path.
//! - [`LayoutInspector`] / [`VariableStore`] / [`PointerSurface`]: the host
//!   boundary. [`MemoryLayout`] implements all three in memory.

pub mod drag;
pub mod error;
pub mod expr;
pub mod host;
pub mod memory;
pub mod options;
pub mod resize;

pub use drag::{
    Axis, DragAnchor, DragDirection, DragInput, PointerPosition, constrain, constrain_live,
};
pub use error::ResizeError;
pub use expr::{ExprError, SizeExpr};
pub use host::{
    CursorIcon, LayoutHost, LayoutInspector, NodeId, PointerSurface, VariableStore, VariableValue,
};
pub use memory::{GridSpec, MemoryLayout, PointerEffect, TrackSize};
pub use options::{DEFAULT_LIVENESS_TIMEOUT, ResizeOptions};
pub use resize::{
    DragSession, ResizeController, ResizeDispatch, ResizeIgnoredReason, ResizeOutcome,
    ResizePhase, SessionEndReason,
};
pub use sly_core::Length;
