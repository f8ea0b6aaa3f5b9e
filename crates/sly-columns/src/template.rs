//! Derived grid template.

use std::fmt;

use sly_core::Length;
use sly_layout::{NodeId, VariableStore};

use crate::config::ColumnsConfig;

/// One metadata column track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTrack {
    pub key: String,
    pub min_width_px: u32,
}

impl fmt::Display for ColumnTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "minmax({}px, auto)", self.min_width_px)
    }
}

/// Ordered column tracks derived from the registry entries.
///
/// Renders as a CSS track list: `minmax(80px, auto) minmax(40px, auto)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnTemplate {
    tracks: Vec<ColumnTrack>,
}

impl ColumnTemplate {
    #[must_use]
    pub fn new(tracks: Vec<ColumnTrack>) -> Self {
        Self { tracks }
    }

    #[must_use]
    pub fn tracks(&self) -> &[ColumnTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn track(&self, key: &str) -> Option<&ColumnTrack> {
        self.tracks.iter().find(|track| track.key == key)
    }

    /// Write the template and every per-column size variable to `container`.
    /// An empty template removes the template variable.
    pub fn apply<S: VariableStore + ?Sized>(
        &self,
        store: &mut S,
        container: NodeId,
        config: &ColumnsConfig,
    ) {
        for track in &self.tracks {
            store.set_variable(
                container,
                &config.cell_variable(&track.key),
                Length::from(track.min_width_px).into(),
            );
        }
        if self.is_empty() {
            store.remove_variable(container, &config.template_variable);
        } else {
            store.set_variable(
                container,
                &config.template_variable,
                self.to_string().into(),
            );
        }
    }

    /// Remove the size variables of columns present in `self` but not in
    /// `next`.
    pub fn retract_missing<S: VariableStore + ?Sized>(
        &self,
        next: &ColumnTemplate,
        store: &mut S,
        container: NodeId,
        config: &ColumnsConfig,
    ) {
        for track in &self.tracks {
            if next.track(&track.key).is_none() {
                store.remove_variable(container, &config.cell_variable(&track.key));
            }
        }
    }
}

impl fmt::Display for ColumnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, track) in self.tracks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{track}")?;
        }
        Ok(())
    }
}
