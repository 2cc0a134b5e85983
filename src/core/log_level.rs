//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest valid trace sublevel
pub const MIN_TRACE_SUBLEVEL: u8 = 1;
/// Highest valid trace sublevel
pub const MAX_TRACE_SUBLEVEL: u8 = 4;

/// Ordered severity domain.
///
/// The discriminant is the rank used for threshold comparisons:
/// `Off < Error < Warning < Info < Trace1 < .. < Trace4`. A message at
/// level `L` is emitted for a tag only if `L`'s rank is at or below the
/// tag's configured threshold rank. `Off` is a threshold-only value:
/// no message level compares at or below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warning = 2,
    #[default]
    Info = 3,
    Trace1 = 4,
    Trace2 = 5,
    Trace3 = 6,
    Trace4 = 7,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "OFF",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Trace1 => "TRACE1",
            LogLevel::Trace2 => "TRACE2",
            LogLevel::Trace3 => "TRACE3",
            LogLevel::Trace4 => "TRACE4",
        }
    }

    /// Map a trace sublevel in `1..=4` to the corresponding level.
    ///
    /// # Panics
    ///
    /// Panics if `sublevel` is outside `1..=4`. A sublevel outside that
    /// range is a caller contract violation, rejected at the boundary.
    pub fn trace(sublevel: u8) -> Self {
        assert!(
            (MIN_TRACE_SUBLEVEL..=MAX_TRACE_SUBLEVEL).contains(&sublevel),
            "trace sublevel must be in 1..=4, got {}",
            sublevel
        );
        match sublevel {
            1 => LogLevel::Trace1,
            2 => LogLevel::Trace2,
            3 => LogLevel::Trace3,
            _ => LogLevel::Trace4,
        }
    }

    /// The trace sublevel of this level, or `None` for non-trace levels.
    pub fn trace_sublevel(&self) -> Option<u8> {
        match self {
            LogLevel::Trace1 => Some(1),
            LogLevel::Trace2 => Some(2),
            LogLevel::Trace3 => Some(3),
            LogLevel::Trace4 => Some(4),
            _ => None,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Off => BrightBlack,
            LogLevel::Error => Red,
            LogLevel::Warning => Yellow,
            LogLevel::Info => Green,
            LogLevel::Trace1 | LogLevel::Trace2 => Blue,
            LogLevel::Trace3 | LogLevel::Trace4 => BrightBlack,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parse a level name or a numeric trace shorthand (`"1"`..`"4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" => Ok(LogLevel::Off),
            "ERROR" => Ok(LogLevel::Error),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "INFO" => Ok(LogLevel::Info),
            "TRACE" | "TRACE1" | "1" => Ok(LogLevel::Trace1),
            "TRACE2" | "2" => Ok(LogLevel::Trace2),
            "TRACE3" | "3" => Ok(LogLevel::Trace3),
            "TRACE4" | "4" => Ok(LogLevel::Trace4),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
