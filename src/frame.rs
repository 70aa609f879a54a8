//! Renderer-side view of a state snapshot.

use lineedit_core::RawState;
use serde::Serialize;

/// Marker drawn at the cursor position in text frames.
const CURSOR_MARKER: char = '|';

/// One rendered frame, built from a popped or finalized snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub mode: Option<String>,
    pub mode_line: Option<String>,
    /// Buffer text with any pending region spliced in.
    pub display: String,
    pub dot: usize,
    pub notes: Vec<String>,
    pub finalized: bool,
}

impl Frame {
    /// Build a frame from a detached snapshot.
    ///
    /// A pending region that no longer fits the code is ignored and logged;
    /// the raw code is shown instead.
    pub fn from_snapshot(raw: &RawState) -> Self {
        let display = match &raw.pending {
            Some(pending) => pending.splice(&raw.code).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Ignoring pending code that does not fit the buffer");
                raw.code.clone()
            }),
            None => raw.code.clone(),
        };
        // The cursor follows the end of the previewed replacement.
        let dot = match &raw.pending {
            Some(pending) if display.len() != raw.code.len() && raw.dot >= pending.end() => {
                raw.dot + pending.text().len() - (pending.end() - pending.begin())
            }
            _ => raw.dot,
        };
        Self {
            mode: raw.mode.as_ref().map(|mode| mode.name().to_string()),
            mode_line: raw.mode.as_ref().and_then(|mode| mode.mode_line()),
            display,
            dot,
            notes: raw.notes.clone(),
            finalized: raw.is_finalized(),
        }
    }

    /// Render the frame as plain text lines.
    ///
    /// Notes come first, then the prompt and buffer. Live frames mark the
    /// cursor; the finalized frame shows the line as accepted.
    pub fn to_text(&self, prompt: &str) -> String {
        let mut out = String::new();
        for note in &self.notes {
            out.push_str("note: ");
            out.push_str(note);
            out.push('\n');
        }
        out.push_str(prompt);
        match self.display.get(..self.dot) {
            Some(before) if !self.finalized => {
                out.push_str(before);
                out.push(CURSOR_MARKER);
                out.push_str(&self.display[self.dot..]);
            }
            _ => out.push_str(&self.display),
        }
        if let Some(mode_line) = &self.mode_line {
            out.push('\n');
            out.push_str(mode_line);
        }
        out
    }
}
