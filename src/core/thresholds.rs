//! Threshold configuration parsed from an environment mapping
//!
//! Recognized keys:
//! - `LOG_ALL` — global default threshold
//! - `LOG_PREFIX_<namespace>` — threshold for all tags starting with `<namespace>`
//! - `LOG_TAG_<tag>` — threshold for exactly `<tag>`
//!
//! Values are level names (`OFF`, `ERROR`, `WARNING`, `INFO`,
//! `TRACE1`..`TRACE4`) or the numeric trace shorthand `1`..`4`. A
//! malformed value falls back to the built-in default for that key alone;
//! parsing never fails the configuration as a whole.

use super::log_level::LogLevel;
use std::collections::HashMap;

const KEY_GLOBAL: &str = "LOG_ALL";
const KEY_PREFIX: &str = "LOG_PREFIX_";
const KEY_TAG: &str = "LOG_TAG_";

/// Immutable threshold snapshot.
///
/// Resolution precedence, most specific wins: exact tag match, then
/// longest matching namespace prefix, then the global default, then the
/// built-in default (`Info`). Once built the snapshot is never mutated,
/// so it is readable from any thread without synchronization.
#[derive(Debug, Clone)]
pub struct Thresholds {
    global: LogLevel,
    /// Sorted by prefix length, longest first, so the first match wins.
    prefixes: Vec<(String, LogLevel)>,
    tags: HashMap<String, LogLevel>,
}

impl Thresholds {
    /// Snapshot with no overrides: everything at the built-in default.
    pub fn new() -> Self {
        Self {
            global: LogLevel::default(),
            prefixes: Vec::new(),
            tags: HashMap::new(),
        }
    }

    /// Parse a threshold snapshot from key/value string pairs.
    ///
    /// Unrecognized keys are ignored. Values that fail to parse as a
    /// level are skipped, leaving that key at its fallback.
    pub fn from_environment<'a, I>(environment: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut thresholds = Self::new();

        for (key, value) in environment {
            let Ok(level) = value.parse::<LogLevel>() else {
                // Misconfigured value: silently default, a bad threshold
                // must never crash configuration.
                continue;
            };

            if key == KEY_GLOBAL {
                thresholds.global = level;
            } else if let Some(namespace) = key.strip_prefix(KEY_PREFIX) {
                if !namespace.is_empty() {
                    thresholds.prefixes.push((namespace.to_string(), level));
                }
            } else if let Some(tag) = key.strip_prefix(KEY_TAG) {
                if !tag.is_empty() {
                    thresholds.tags.insert(tag.to_string(), level);
                }
            }
        }

        // Longest prefix first; ties keep insertion order.
        thresholds
            .prefixes
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        thresholds
    }

    /// Resolve the effective threshold for a tag.
    pub fn resolve(&self, tag: &str) -> LogLevel {
        if let Some(&level) = self.tags.get(tag) {
            return level;
        }

        for (prefix, level) in &self.prefixes {
            if tag.starts_with(prefix.as_str()) {
                return *level;
            }
        }

        self.global
    }

    /// Whether a message at `level` for `tag` passes the filter.
    ///
    /// Pure and side-effect free. `Off` is never a valid message level,
    /// and an `Off` threshold passes nothing.
    pub fn should_log(&self, tag: &str, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        level <= self.resolve(tag)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new()
    }
}
