//! Input mode abstraction stored by the shared state.
//!
//! The state never dispatches on a mode. It stores a handle, clones it into
//! snapshots, and swaps in [`FinalizedMode`] for the terminal snapshot.

use crate::constants::FINALIZED_MODE_NAME;
use std::fmt;
use std::sync::Arc;

/// An input-interpretation context such as insert, command or completion.
pub trait Mode: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and rendered frames.
    fn name(&self) -> &str;

    /// Text for a mode line drawn under the buffer, if the mode has one.
    fn mode_line(&self) -> Option<String> {
        None
    }

    /// True only for the sentinel installed by [`crate::State::finalize`].
    fn is_finalized(&self) -> bool {
        false
    }
}

/// Shared handle to a mode; cloning is a reference-count bump.
pub type ModeHandle = Arc<dyn Mode>;

/// Sentinel mode carried by finalized snapshots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FinalizedMode;

impl Mode for FinalizedMode {
    fn name(&self) -> &str {
        FINALIZED_MODE_NAME
    }

    fn is_finalized(&self) -> bool {
        true
    }
}

/// Build a fresh handle to the finalized sentinel.
pub fn finalized_mode() -> ModeHandle {
    Arc::new(FinalizedMode)
}
