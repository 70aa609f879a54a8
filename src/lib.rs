//! Root crate facade for lineedit: the shared editor state plus a small
//! two-thread demonstration driver.

/// Renderer-side frames built from state snapshots.
pub mod frame;
/// Key-handler and render threads driving the shared state.
pub mod session;

pub use lineedit_core::{
    action, config, constants, error, key, mode, raw, state, Config, FinalizedMode,
    HandlerAction, Key, KeyCode, Mode, ModeHandle, Modifiers, PendingCode, RawState, State,
    StateError,
};
