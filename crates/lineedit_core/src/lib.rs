//! Core library for lineedit: the shared editor state and the values it holds.

/// Key-handler actions.
pub mod action;
/// Configuration loading and defaults.
pub mod config;
/// Shared defaults and environment variable names.
pub mod constants;
/// Invariant-violation error type.
pub mod error;
/// Key events.
pub mod key;
/// Input mode abstraction and the finalized sentinel.
pub mod mode;
/// Unsynchronized state values.
pub mod raw;
/// Lock-protected shared state container.
pub mod state;

pub use action::HandlerAction;
pub use config::Config;
pub use error::StateError;
pub use key::{Key, KeyCode, Modifiers};
pub use mode::{FinalizedMode, Mode, ModeHandle};
pub use raw::{PendingCode, RawState};
pub use state::State;
