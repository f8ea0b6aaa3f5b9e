use std::fmt;

use crate::host::NodeId;

/// Errors returned by [`crate::ResizeController`].
///
/// None of these leave global pointer state behind: a drag that fails to
/// start never binds anything, and a failed snap runs after cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// No ancestor of the handle matches the container selector.
    MissingContainer { selector: String },
    /// The handle is no longer inside the container's layout children.
    DescendantNotFound { container: NodeId, node: NodeId },
    /// The pane's child index has no resolved track.
    TrackOutOfRange { index: usize, tracks: usize },
    /// A size or bound variable could not be resolved to a length.
    UnresolvedBound { variable: String },
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContainer { selector } => {
                write!(f, "no container matching {selector:?} encloses the resize handle")
            }
            Self::DescendantNotFound { container, node } => {
                write!(f, "{node} is not laid out inside {container}")
            }
            Self::TrackOutOfRange { index, tracks } => {
                write!(f, "track index {index} out of range ({tracks} tracks)")
            }
            Self::UnresolvedBound { variable } => {
                write!(f, "layout variable {variable} does not resolve to a length")
            }
        }
    }
}

impl std::error::Error for ResizeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            ResizeError::TrackOutOfRange { index: 3, tracks: 2 }.to_string(),
            "track index 3 out of range (2 tracks)"
        );
        assert!(
            ResizeError::UnresolvedBound {
                variable: "--w-min".to_string()
            }
            .to_string()
            .contains("--w-min")
        );
        assert_eq!(
            ResizeError::DescendantNotFound {
                container: NodeId::new(1),
                node: NodeId::new(4),
            }
            .to_string(),
            "node#4 is not laid out inside node#1"
        );
    }
}
