//! Concurrency-safe container for the editor state shared by key handlers and
//! the render loop.
//!
//! Every method holds one reader/writer lock for its whole body: reads take the
//! shared lock, writes and the redraw pop take the exclusive one. No method
//! calls another locking method, so holding the lock never re-enters it.

use crate::action::HandlerAction;
use crate::error::StateError;
use crate::key::Key;
use crate::mode::ModeHandle;
use crate::raw::{PendingCode, RawState};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared editor state, usually held as `Arc<State>` by the input and render
/// threads.
#[derive(Debug, Default)]
pub struct State {
    inner: RwLock<RawState>,
}

impl State {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container that owns `raw`.
    pub fn with_raw(raw: RawState) -> Self {
        Self {
            inner: RwLock::new(raw),
        }
    }

    // A panicked writer leaves plain data behind; keep serving it.
    fn read(&self) -> RwLockReadGuard<'_, RawState> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Editor state lock poisoned; continuing with last written state");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, RawState> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Editor state lock poisoned; continuing with last written state");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Copy the live state and clear its notes in one step.
    ///
    /// The returned snapshot owns the notes that were pending; notes added
    /// after this call stay in the live state for the next pop.
    pub fn pop_for_redraw(&self) -> RawState {
        let mut raw = self.write();
        let notes = std::mem::take(&mut raw.notes);
        let snapshot = RawState {
            mode: raw.mode.clone(),
            code: raw.code.clone(),
            dot: raw.dot,
            pending: raw.pending.clone(),
            notes,
            last_key: raw.last_key,
            next_action: raw.next_action,
        };
        tracing::trace!(notes = snapshot.notes.len(), "popped editor state for redraw");
        snapshot
    }

    /// Build the snapshot for the final render of a session.
    ///
    /// Does not modify the live state; see [`RawState::finalized`].
    pub fn finalize(&self) -> RawState {
        let snapshot = self.read().finalized();
        tracing::debug!(
            code_len = snapshot.code.len(),
            notes = snapshot.notes.len(),
            "finalized editor state"
        );
        snapshot
    }

    /// Replace the live state with the empty session.
    pub fn reset(&self) {
        *self.write() = RawState::default();
        tracing::debug!("editor state reset");
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Option<ModeHandle> {
        self.read().mode.clone()
    }

    /// Sets or clears the current mode.
    ///
    /// `None` is the empty-session value that [`Self::reset`] also restores.
    pub fn set_mode(&self, mode: Option<ModeHandle>) {
        self.write().mode = mode;
    }

    /// Returns a copy of the code.
    pub fn code(&self) -> String {
        self.read().code.clone()
    }

    /// Returns code and dot observed under one lock.
    pub fn code_and_dot(&self) -> (String, usize) {
        let raw = self.read();
        (raw.code.clone(), raw.dot)
    }

    /// Replace code and dot together.
    ///
    /// Neither value is validated; `dot` must be a char boundary of `code`.
    pub fn set_code_and_dot(&self, code: impl Into<String>, dot: usize) {
        let code = code.into();
        let mut raw = self.write();
        raw.code = code;
        raw.dot = dot;
    }

    /// Move the cursor without validation.
    pub fn set_dot(&self, dot: usize) {
        self.write().dot = dot;
    }

    /// Returns the part of code before the dot.
    ///
    /// # Panics
    /// Panics when dot is out of range or splits a multi-byte char.
    pub fn code_before_dot(&self) -> String {
        self.read().split_at_dot().0.to_string()
    }

    /// Returns the part of code from the dot onward.
    ///
    /// # Panics
    /// Panics when dot is out of range or splits a multi-byte char.
    pub fn code_after_dot(&self) -> String {
        self.read().split_at_dot().1.to_string()
    }

    /// Checked form of [`Self::code_before_dot`].
    ///
    /// # Errors
    /// Returns the cursor invariant that the current dot violates.
    pub fn try_code_before_dot(&self) -> Result<String, StateError> {
        let raw = self.read();
        let (before, _) = raw.try_split_at_dot()?;
        Ok(before.to_string())
    }

    /// Checked form of [`Self::code_after_dot`].
    ///
    /// # Errors
    /// Returns the cursor invariant that the current dot violates.
    pub fn try_code_after_dot(&self) -> Result<String, StateError> {
        let raw = self.read();
        let (_, after) = raw.try_split_at_dot()?;
        Ok(after.to_string())
    }

    /// Returns the pending region, if any.
    pub fn pending(&self) -> Option<PendingCode> {
        self.read().pending.clone()
    }

    /// Sets or clears the pending region.
    pub fn set_pending(&self, pending: Option<PendingCode>) {
        self.write().pending = pending;
    }

    /// Appends a note for the next redraw.
    pub fn add_note(&self, note: impl Into<String>) {
        let note = note.into();
        self.write().notes.push(note);
    }

    /// Returns a copy of the notes without clearing them.
    pub fn notes(&self) -> Vec<String> {
        self.read().notes.clone()
    }

    /// Returns the last key delivered to a handler.
    pub fn last_key(&self) -> Key {
        self.read().last_key
    }

    /// Records the key being handled.
    pub fn set_last_key(&self, key: Key) {
        self.write().last_key = key;
    }

    /// Returns the action requested by the current handler.
    pub fn next_action(&self) -> HandlerAction {
        self.read().next_action
    }

    /// Sets the action the editor loop should take next.
    pub fn set_next_action(&self, action: HandlerAction) {
        self.write().next_action = action;
    }

    /// Run `f` against the live state under the shared lock.
    ///
    /// `f` must not call back into this container.
    pub fn inspect<R>(&self, f: impl FnOnce(&RawState) -> R) -> R {
        f(&self.read())
    }

    /// Run `f` against the live state under the exclusive lock.
    ///
    /// Use for edits spanning several fields, such as inserting at dot and
    /// advancing it. `f` must not call back into this container.
    pub fn update<R>(&self, f: impl FnOnce(&mut RawState) -> R) -> R {
        f(&mut self.write())
    }
}

#[cfg(test)]
mod tests;
