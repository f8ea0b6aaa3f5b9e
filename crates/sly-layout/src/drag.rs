//! Anchors, axes, and the pure drag constraint.

use serde::{Deserialize, Serialize};
use sly_core::Length;

use crate::expr::SizeExpr;

/// Layout axis a drag operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// Edge of its pane that a resize handle is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAnchor {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl DragAnchor {
    /// Axis along which pointer movement is measured.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Sign applied to pointer deltas. `Left` and `Bottom` invert, so that
    /// dragging toward the anchor shrinks the pane.
    #[must_use]
    pub const fn direction(self) -> DragDirection {
        match self {
            Self::Left | Self::Bottom => DragDirection::Reverse,
            Self::Right | Self::Top => DragDirection::Forward,
        }
    }
}

/// Sign of the delta-to-size mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragDirection {
    Forward,
    Reverse,
}

impl DragDirection {
    /// `+1` or `-1`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// Pointer position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along `axis`.
    #[must_use]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// Inputs to [`constrain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInput {
    pub start: f64,
    pub current: f64,
    pub base: Length,
    pub min: Length,
    pub max: Length,
    pub direction: DragDirection,
}

/// Compute the next size for a drag:
/// `clamp(min, base + (current - start) * direction, max)`.
///
/// The result is an unresolved [`SizeExpr`]; resolving it gives the clamped
/// length. Non-finite coordinates are treated as no movement.
#[must_use]
pub fn constrain(input: &DragInput) -> SizeExpr {
    constrain_live(
        input,
        SizeExpr::Length(input.min),
        SizeExpr::Length(input.max),
    )
}

/// [`constrain`] with the bounds taken from `min` and `max` instead of
/// `input`, typically `var()` references the host re-resolves on every
/// layout pass.
#[must_use]
pub fn constrain_live(input: &DragInput, min: SizeExpr, max: SizeExpr) -> SizeExpr {
    let delta = input.current - input.start;
    let delta = if delta.is_finite() { delta } else { 0.0 };
    SizeExpr::clamp(
        min,
        SizeExpr::delta(
            SizeExpr::Length(input.base),
            Length::px(delta),
            input.direction.sign(),
        ),
        max,
    )
}
