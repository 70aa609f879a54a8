//! Actions a key handler asks the editor loop to take.

use serde::{Deserialize, Serialize};

/// What the editor loop should do after the current key handler returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerAction {
    /// Keep reading keys.
    #[default]
    NoAction,
    /// Accept the buffer as the finished line.
    ReturnLine,
    /// End input, as on Ctrl-D over an empty buffer.
    ReturnEof,
}

impl HandlerAction {
    /// True when the action ends the current input session.
    pub fn ends_session(self) -> bool {
        !matches!(self, Self::NoAction)
    }
}
