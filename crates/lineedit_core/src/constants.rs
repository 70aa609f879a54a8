//! Shared constants used across lineedit crates.

/// Default interval between render-loop pops, in milliseconds.
pub const DEFAULT_REDRAW_INTERVAL_MS: u64 = 16;

/// Lower bound applied to configured redraw intervals.
pub const MIN_REDRAW_INTERVAL_MS: u64 = 1;

/// Default prompt drawn before the input buffer.
pub const DEFAULT_PROMPT: &str = "> ";

/// Environment variable overriding the redraw interval.
pub const ENV_REDRAW_INTERVAL_MS: &str = "LINEEDIT_REDRAW_INTERVAL_MS";
/// Environment flag switching frame output to JSON.
pub const ENV_JSON_FRAMES: &str = "LINEEDIT_JSON_FRAMES";
/// Environment variable overriding the prompt.
pub const ENV_PROMPT: &str = "LINEEDIT_PROMPT";

/// Name reported by the finalized sentinel mode.
pub const FINALIZED_MODE_NAME: &str = "finalized";
