//! Error types for cursor and pending-region invariant checks.
use thiserror::Error;

/// Invariant violations detected by the checked accessors.
///
/// The unchecked accessors on [`crate::State`] panic on the same conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("dot {dot} is outside code of length {len}")]
    DotOutOfRange { dot: usize, len: usize },

    #[error("dot {dot} does not fall on a char boundary")]
    DotNotCharBoundary { dot: usize },

    #[error("pending region begins at {begin} after its end {end}")]
    PendingRangeInverted { begin: usize, end: usize },

    #[error("pending region ends at {end}, past code of length {len}")]
    PendingOutOfRange { end: usize, len: usize },

    #[error("pending region boundary {offset} does not fall on a char boundary")]
    PendingNotCharBoundary { offset: usize },
}
