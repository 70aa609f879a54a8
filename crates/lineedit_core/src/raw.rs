//! Plain, unsynchronized editor state values.
//!
//! [`RawState`] is only ever touched concurrently through [`crate::State`],
//! which holds it behind a lock and hands out copies.

use crate::action::HandlerAction;
use crate::error::StateError;
use crate::key::Key;
use crate::mode::{finalized_mode, ModeHandle};
use serde::{Deserialize, Serialize};

/// A proposed replacement of `code[begin..end]`, such as an active completion.
///
/// Offsets are byte indices into [`RawState::code`]. The value is immutable
/// once built; deserialization goes through [`PendingCode::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PendingCodeParts")]
pub struct PendingCode {
    begin: usize,
    end: usize,
    text: String,
}

/// Unchecked wire shape of [`PendingCode`].
#[derive(Deserialize)]
struct PendingCodeParts {
    begin: usize,
    end: usize,
    text: String,
}

impl TryFrom<PendingCodeParts> for PendingCode {
    type Error = StateError;

    fn try_from(parts: PendingCodeParts) -> Result<Self, Self::Error> {
        Self::new(parts.begin, parts.end, parts.text)
    }
}

impl PendingCode {
    /// Build a pending region.
    ///
    /// # Errors
    /// Returns [`StateError::PendingRangeInverted`] when `begin > end`. Whether
    /// `end` fits the buffer is only known where the region is applied.
    pub fn new(begin: usize, end: usize, text: impl Into<String>) -> Result<Self, StateError> {
        if begin > end {
            return Err(StateError::PendingRangeInverted { begin, end });
        }
        Ok(Self {
            begin,
            end,
            text: text.into(),
        })
    }

    /// Byte offset where the replaced region starts.
    ///
    /// # Returns
    /// An offset into the code this region was built against.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Byte offset where the replaced region ends (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Replacement text shown in place of the region.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check that the region can be applied to `code`.
    ///
    /// # Errors
    /// Returns [`StateError::PendingRangeInverted`],
    /// [`StateError::PendingOutOfRange`] or
    /// [`StateError::PendingNotCharBoundary`].
    pub fn check_region(&self, code: &str) -> Result<(), StateError> {
        if self.begin > self.end {
            return Err(StateError::PendingRangeInverted {
                begin: self.begin,
                end: self.end,
            });
        }
        if self.end > code.len() {
            return Err(StateError::PendingOutOfRange {
                end: self.end,
                len: code.len(),
            });
        }
        for offset in [self.begin, self.end] {
            if !code.is_char_boundary(offset) {
                return Err(StateError::PendingNotCharBoundary { offset });
            }
        }
        Ok(())
    }

    /// Return `code` with the pending region replaced by [`Self::text`].
    ///
    /// # Errors
    /// Returns the error from [`Self::check_region`] when the region does not
    /// fit `code`.
    pub fn splice(&self, code: &str) -> Result<String, StateError> {
        self.check_region(code)?;
        let (head, tail) = (&code[..self.begin], &code[self.end..]);
        let mut out = String::with_capacity(head.len() + self.text.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.text);
        out.push_str(tail);
        Ok(out)
    }
}

/// All state of the editor at one instant.
///
/// The default value is the empty session: no mode, empty code, dot at 0, no
/// pending region, no notes, zero key and [`HandlerAction::NoAction`].
#[derive(Debug, Clone, Default)]
pub struct RawState {
    /// The current mode.
    pub mode: Option<ModeHandle>,
    /// The current content of the input buffer.
    pub code: String,
    /// Cursor position as a byte index into `code`. Writers must keep it in
    /// `0..=code.len()` and on a char boundary.
    pub dot: usize,
    /// Pending code, if any, such as during completion.
    pub pending: Option<PendingCode>,
    /// Notes added since the last redraw.
    pub notes: Vec<String>,
    /// Last key delivered to a handler.
    pub last_key: Key,
    /// Action the current handler wants the editor loop to take.
    pub next_action: HandlerAction,
}

impl RawState {
    /// Check that `dot` is a valid split point for `code`.
    ///
    /// # Errors
    /// Returns [`StateError::DotOutOfRange`] or
    /// [`StateError::DotNotCharBoundary`].
    pub fn check_dot(&self) -> Result<(), StateError> {
        if self.dot > self.code.len() {
            return Err(StateError::DotOutOfRange {
                dot: self.dot,
                len: self.code.len(),
            });
        }
        if !self.code.is_char_boundary(self.dot) {
            return Err(StateError::DotNotCharBoundary { dot: self.dot });
        }
        Ok(())
    }

    /// Check the cursor and, when present, the pending region against `code`.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        self.check_dot()?;
        match &self.pending {
            Some(pending) => pending.check_region(&self.code),
            None => Ok(()),
        }
    }

    /// Split `code` at `dot`.
    ///
    /// # Errors
    /// Returns the cursor invariant that `dot` violates.
    pub fn try_split_at_dot(&self) -> Result<(&str, &str), StateError> {
        self.check_dot()?;
        Ok(self.code.split_at(self.dot))
    }

    /// Split `code` at `dot`.
    ///
    /// # Panics
    /// Panics when `dot` is past the end of `code` or inside a multi-byte
    /// char. That means a writer broke the cursor invariant.
    pub fn split_at_dot(&self) -> (&str, &str) {
        match self.try_split_at_dot() {
            Ok(parts) => parts,
            Err(err) => panic!("cursor invariant violated: {err}"),
        }
    }

    /// True when the mode is the finalized sentinel.
    pub fn is_finalized(&self) -> bool {
        self.mode.as_ref().is_some_and(|mode| mode.is_finalized())
    }

    /// Build the terminal snapshot used for the last render of a session.
    ///
    /// The cursor moves to the end, the pending region and transient key
    /// fields are dropped, and notes are copied.
    pub fn finalized(&self) -> RawState {
        RawState {
            mode: Some(finalized_mode()),
            code: self.code.clone(),
            dot: self.code.len(),
            pending: None,
            notes: self.notes.clone(),
            last_key: Key::default(),
            next_action: HandlerAction::default(),
        }
    }
}
