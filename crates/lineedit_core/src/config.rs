//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_PROMPT, DEFAULT_REDRAW_INTERVAL_MS, ENV_JSON_FRAMES, ENV_PROMPT,
    ENV_REDRAW_INTERVAL_MS, MIN_REDRAW_INTERVAL_MS,
};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Runtime configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub redraw_interval_ms: u64,
    pub json_frames: bool,
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            json_frames: false,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a variable name, if set.
    ///
    /// # Returns
    /// A populated [`Config`]; unrecognized values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let redraw_interval_ms = lookup(ENV_REDRAW_INTERVAL_MS)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(|ms| ms.max(MIN_REDRAW_INTERVAL_MS))
            .unwrap_or(defaults.redraw_interval_ms);
        let json_frames = match lookup(ENV_JSON_FRAMES) {
            Some(raw) => parse_env_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = raw.as_str(),
                    "Unrecognized {} value; JSON frames stay disabled",
                    ENV_JSON_FRAMES
                );
                false
            }),
            None => defaults.json_frames,
        };
        let prompt = lookup(ENV_PROMPT).unwrap_or(defaults.prompt);

        Self {
            redraw_interval_ms,
            json_frames,
            prompt,
        }
    }

    /// Redraw interval as a [`Duration`].
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms.max(MIN_REDRAW_INTERVAL_MS))
    }
}
