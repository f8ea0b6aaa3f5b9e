//! In-memory layout host.
//!
//! [`MemoryLayout`] is a small node tree with class selectors, inherited
//! layout variables, and grid containers whose tracks resolve to whole
//! pixels. It implements every host trait, records pointer side effects, and
//! backs the tests of this workspace as well as hosts without a DOM.
//!
//! Track resolution is deliberately simple: fixed and variable tracks take
//! their (rounded) length, fractional tracks share what is left of the
//! container extent after fixed tracks and gaps.

use rustc_hash::FxHashMap;
use sly_core::Length;

use crate::drag::Axis;
use crate::expr::SizeExpr;
use crate::host::{
    CursorIcon, LayoutInspector, NodeId, PointerSurface, VariableStore, VariableValue,
};

/// One grid track definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSize {
    Fixed(Length),
    /// Size read from a layout variable visible to the container.
    Variable(String),
    /// Share of the free space (`fr`).
    Fraction(f64),
}

/// Grid container definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridSpec {
    pub columns: Vec<TrackSize>,
    pub rows: Vec<TrackSize>,
    pub width: Length,
    pub height: Length,
    pub gap: Length,
}

impl GridSpec {
    /// Single-row grid with the given column tracks.
    #[must_use]
    pub fn columns(width: Length, columns: Vec<TrackSize>) -> Self {
        Self {
            columns,
            width,
            ..Self::default()
        }
    }

    /// Single-column grid with the given row tracks.
    #[must_use]
    pub fn rows(height: Length, rows: Vec<TrackSize>) -> Self {
        Self {
            rows,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_gap(mut self, gap: Length) -> Self {
        self.gap = gap;
        self
    }
}

/// Recorded [`PointerSurface`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEffect {
    Bind(NodeId),
    Unbind(NodeId),
    OverrideCursor(CursorIcon),
    RestoreCursor,
    Capture { handle: NodeId, pointer_id: u32 },
    ReleaseCapture { handle: NodeId, pointer_id: u32 },
}

#[derive(Debug, Clone, Default)]
struct MemoryNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    variables: FxHashMap<String, VariableValue>,
    grid: Option<GridSpec>,
}

/// In-memory implementation of the layout host traits.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayout {
    nodes: FxHashMap<NodeId, MemoryNode>,
    next_id: u64,
    bound_listeners: Vec<NodeId>,
    cursor: Option<CursorIcon>,
    captures: Vec<(NodeId, u32)>,
    effects: Vec<PointerEffect>,
}

impl MemoryLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parentless node.
    pub fn add_root(&mut self, classes: &[&str]) -> NodeId {
        self.insert(None, classes)
    }

    /// Add a node as the last child of `parent`. `None` if `parent` is unknown.
    pub fn add_child(&mut self, parent: NodeId, classes: &[&str]) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.insert(Some(parent), classes);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Some(id)
    }

    fn insert(&mut self, parent: Option<NodeId>, classes: &[&str]) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        self.nodes.insert(
            id,
            MemoryNode {
                parent,
                classes: classes.iter().map(|class| (*class).to_string()).collect(),
                ..MemoryNode::default()
            },
        );
        id
    }

    /// Detach `node` (and its subtree) from its parent. Returns whether it
    /// had one.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|child| *child != node);
        }
        true
    }

    /// Make `node` a grid container. Returns `false` for unknown nodes.
    pub fn set_grid(&mut self, node: NodeId, grid: GridSpec) -> bool {
        match self.nodes.get_mut(&node) {
            Some(entry) => {
                entry.grid = Some(grid);
                true
            }
            None => false,
        }
    }

    /// Raw variable declared directly on `node`.
    #[must_use]
    pub fn variable(&self, node: NodeId, name: &str) -> Option<&VariableValue> {
        self.nodes.get(&node)?.variables.get(name)
    }

    /// Handles whose pointer listeners are currently bound.
    #[must_use]
    pub fn bound_listeners(&self) -> &[NodeId] {
        &self.bound_listeners
    }

    /// Active global cursor override.
    #[must_use]
    pub const fn cursor_override(&self) -> Option<CursorIcon> {
        self.cursor
    }

    /// Active pointer captures.
    #[must_use]
    pub fn captures(&self) -> &[(NodeId, u32)] {
        &self.captures
    }

    /// Every pointer side-effect call, in order.
    #[must_use]
    pub fn effects(&self) -> &[PointerEffect] {
        &self.effects
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    fn ancestors_or_self(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |id| {
            self.nodes.get(id).and_then(|entry| entry.parent)
        })
        .filter(move |id| self.nodes.contains_key(id))
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let class = selector.trim();
        let class = class.strip_prefix('.').unwrap_or(class);
        self.nodes
            .get(&node)
            .is_some_and(|entry| entry.classes.iter().any(|c| c == class))
    }

    fn lookup_at(&self, node: NodeId, name: &str) -> Option<SizeExpr> {
        let value = self
            .ancestors_or_self(node)
            .find_map(|id| self.nodes.get(&id)?.variables.get(name))?;
        match value {
            VariableValue::Size(expr) => Some(expr.clone()),
            VariableValue::Text(text) => Length::parse(text).ok().map(SizeExpr::Length),
        }
    }
}

impl LayoutInspector for MemoryLayout {
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        self.ancestors_or_self(node)
            .find(|id| self.matches(*id, selector))
    }

    fn resolved_variable(&self, container: NodeId, name: &str) -> Option<Length> {
        let expr = self.lookup_at(container, name)?;
        let lookup = |name: &str| self.lookup_at(container, name);
        expr.resolve_with(&lookup).ok()
    }

    fn resolved_tracks(&self, container: NodeId, axis: Axis) -> Vec<Length> {
        let Some(grid) = self.nodes.get(&container).and_then(|n| n.grid.as_ref()) else {
            return Vec::new();
        };
        let (tracks, extent) = match axis {
            Axis::Horizontal => (&grid.columns, grid.width),
            Axis::Vertical => (&grid.rows, grid.height),
        };

        let mut sizes: Vec<Option<Length>> = Vec::with_capacity(tracks.len());
        let mut used = 0.0;
        let mut fractions = 0.0;
        for track in tracks {
            let size = match track {
                TrackSize::Fixed(length) => Some(*length),
                TrackSize::Variable(name) => Some(
                    self.resolved_variable(container, name)
                        .unwrap_or(Length::ZERO),
                ),
                TrackSize::Fraction(fr) => {
                    fractions += fr.max(0.0);
                    None
                }
            };
            let size = size.map(|length| Length::px(length.get().max(0.0)).round());
            if let Some(length) = size {
                used += length.get();
            }
            sizes.push(size);
        }

        let gaps = grid.gap.get().max(0.0) * tracks.len().saturating_sub(1) as f64;
        let free = (extent.get() - used - gaps).max(0.0);
        tracks
            .iter()
            .zip(sizes)
            .map(|(track, size)| match (track, size) {
                (_, Some(length)) => length,
                (TrackSize::Fraction(fr), None) if fractions > 0.0 => {
                    Length::px(free * fr.max(0.0) / fractions).round()
                }
                _ => Length::ZERO,
            })
            .collect()
    }

    fn child_index(&self, container: NodeId, descendant: NodeId) -> Option<usize> {
        let child = self
            .ancestors_or_self(descendant)
            .find(|id| self.nodes.get(id).and_then(|n| n.parent) == Some(container))?;
        self.nodes
            .get(&container)?
            .children
            .iter()
            .position(|id| *id == child)
    }
}

impl VariableStore for MemoryLayout {
    fn set_variable(&mut self, node: NodeId, name: &str, value: VariableValue) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.variables.insert(name.to_string(), value);
        }
    }

    fn remove_variable(&mut self, node: NodeId, name: &str) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.variables.remove(name);
        }
    }
}

impl PointerSurface for MemoryLayout {
    fn bind_pointer_listeners(&mut self, handle: NodeId) {
        self.effects.push(PointerEffect::Bind(handle));
        if !self.bound_listeners.contains(&handle) {
            self.bound_listeners.push(handle);
        }
    }

    fn unbind_pointer_listeners(&mut self, handle: NodeId) {
        self.effects.push(PointerEffect::Unbind(handle));
        self.bound_listeners.retain(|id| *id != handle);
    }

    fn override_global_cursor(&mut self, cursor: CursorIcon) {
        self.effects.push(PointerEffect::OverrideCursor(cursor));
        self.cursor = Some(cursor);
    }

    fn restore_global_cursor(&mut self) {
        self.effects.push(PointerEffect::RestoreCursor);
        self.cursor = None;
    }

    fn set_pointer_capture(&mut self, handle: NodeId, pointer_id: u32) {
        self.effects.push(PointerEffect::Capture { handle, pointer_id });
        if !self.captures.contains(&(handle, pointer_id)) {
            self.captures.push((handle, pointer_id));
        }
    }

    fn release_pointer_capture(&mut self, handle: NodeId, pointer_id: u32) {
        self.effects
            .push(PointerEffect::ReleaseCapture { handle, pointer_id });
        self.captures
            .retain(|capture| *capture != (handle, pointer_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: f64) -> Length {
        Length::px(value)
    }

    fn sidebar_layout() -> (MemoryLayout, NodeId, NodeId, NodeId) {
        let mut layout = MemoryLayout::new();
        let root = layout.add_root(&["app"]);
        let grid = layout.add_child(root, &["split-grid"]).expect("root exists");
        let sidebar = layout.add_child(grid, &["sidebar"]).expect("grid exists");
        let handle = layout.add_child(sidebar, &["edge"]).expect("sidebar exists");
        layout.add_child(grid, &["main"]).expect("grid exists");
        layout.set_grid(
            grid,
            GridSpec::columns(
                px(1000.0),
                vec![
                    TrackSize::Variable("--sidebar-width".to_string()),
                    TrackSize::Fraction(1.0),
                ],
            ),
        );
        (layout, root, grid, handle)
    }

    #[test]
    fn closest_matches_self_and_ancestors() {
        let (layout, root, grid, handle) = sidebar_layout();
        assert_eq!(layout.closest(handle, ".split-grid"), Some(grid));
        assert_eq!(layout.closest(handle, "app"), Some(root));
        assert_eq!(layout.closest(grid, "split-grid"), Some(grid));
        assert_eq!(layout.closest(handle, ".missing"), None);
    }

    #[test]
    fn variables_inherit_and_resolve() {
        let (mut layout, root, grid, _) = sidebar_layout();
        layout.set_variable(root, "--base", Length::px(120.0).into());
        layout.set_variable(
            grid,
            "--sidebar-width",
            SizeExpr::delta(SizeExpr::var("--base"), px(30.0), 1).into(),
        );
        assert_eq!(layout.resolved_variable(grid, "--sidebar-width"), Some(px(150.0)));
        assert_eq!(layout.resolved_variable(grid, "--base"), Some(px(120.0)));
        assert_eq!(layout.resolved_variable(root, "--sidebar-width"), None);
    }

    #[test]
    fn text_variables_resolve_when_they_are_lengths() {
        let (mut layout, _, grid, _) = sidebar_layout();
        layout.set_variable(grid, "--a", "64px".to_string().into());
        layout.set_variable(grid, "--b", "minmax(10px, auto)".to_string().into());
        assert_eq!(layout.resolved_variable(grid, "--a"), Some(px(64.0)));
        assert_eq!(layout.resolved_variable(grid, "--b"), None);
    }

    #[test]
    fn tracks_round_variables_and_share_fractions() {
        let (mut layout, _, grid, _) = sidebar_layout();
        layout.set_variable(grid, "--sidebar-width", Length::px(250.4).into());
        assert_eq!(
            layout.resolved_tracks(grid, Axis::Horizontal),
            vec![px(250.0), px(750.0)]
        );
        assert!(layout.resolved_tracks(grid, Axis::Vertical).is_empty());
    }

    #[test]
    fn gaps_reduce_free_space() {
        let mut layout = MemoryLayout::new();
        let grid = layout.add_root(&["grid"]);
        layout.set_grid(
            grid,
            GridSpec::rows(
                px(300.0),
                vec![
                    TrackSize::Fixed(px(100.0)),
                    TrackSize::Fraction(1.0),
                    TrackSize::Fraction(1.0),
                ],
            )
            .with_gap(px(10.0)),
        );
        assert_eq!(
            layout.resolved_tracks(grid, Axis::Vertical),
            vec![px(100.0), px(90.0), px(90.0)]
        );
    }

    #[test]
    fn child_index_finds_direct_child_containing_descendant() {
        let (mut layout, root, grid, handle) = sidebar_layout();
        assert_eq!(layout.child_index(grid, handle), Some(0));
        assert_eq!(layout.child_index(root, handle), Some(0));
        let stray = layout.add_root(&["stray"]);
        assert_eq!(layout.child_index(grid, stray), None);
    }

    #[test]
    fn detach_removes_from_parent() {
        let (mut layout, _, grid, handle) = sidebar_layout();
        let sidebar = layout.closest(handle, "sidebar").expect("sidebar exists");
        assert!(layout.detach(sidebar));
        assert!(!layout.detach(sidebar));
        assert_eq!(layout.closest(handle, "split-grid"), None);
        assert_eq!(layout.child_index(grid, handle), None);
    }

    #[test]
    fn pointer_surface_is_idempotent() {
        let (mut layout, _, _, handle) = sidebar_layout();
        layout.bind_pointer_listeners(handle);
        layout.bind_pointer_listeners(handle);
        assert_eq!(layout.bound_listeners(), &[handle]);
        layout.unbind_pointer_listeners(handle);
        layout.unbind_pointer_listeners(handle);
        assert!(layout.bound_listeners().is_empty());
        layout.restore_global_cursor();
        assert_eq!(layout.cursor_override(), None);
        layout.release_pointer_capture(handle, 1);
        assert!(layout.captures().is_empty());
        assert_eq!(layout.effects().len(), 6);
    }
}
