//! Output format configuration for log entries
//!
//! - Text: human-readable format (default)
//! - Json: machine-readable JSON
//! - Logfmt: key=value pairs for log aggregation tools

use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;

/// Output format for rendered log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO   ] [net.http] request accepted`
    #[default]
    Text,

    /// `{"timestamp":"...","level":"INFO","tag":"net.http","message":"..."}`
    Json,

    /// `timestamp=... level=INFO tag=net.http message="request accepted"`
    Logfmt,
}

impl OutputFormat {
    /// Render a log entry according to this output format.
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry, timestamp_format),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Logfmt => self.format_logfmt(entry, timestamp_format),
        }
    }

    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let timestamp_str = timestamp_format.format(&entry.timestamp);
        let thread_name = entry.thread_name.as_ref().unwrap_or(&entry.thread_id);

        format!(
            "[{}] [{:7}] [{}] {} - {} ({}:{})",
            timestamp_str,
            entry.level.to_str(),
            entry.tag,
            thread_name,
            entry.message,
            entry.file,
            entry.line
        )
    }

    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            self.format_timestamp_json(entry, timestamp_format),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "tag".to_string(),
            serde_json::Value::String(entry.tag.clone()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        json_obj.insert(
            "file".to_string(),
            serde_json::Value::String(entry.file.clone()),
        );
        json_obj.insert(
            "line".to_string(),
            serde_json::Value::Number(entry.line.into()),
        );
        if let Some(ref function) = entry.function {
            json_obj.insert(
                "function".to_string(),
                serde_json::Value::String(function.clone()),
            );
        }
        json_obj.insert(
            "thread_id".to_string(),
            serde_json::Value::String(entry.thread_id.clone()),
        );
        if let Some(ref name) = entry.thread_name {
            json_obj.insert(
                "thread_name".to_string(),
                serde_json::Value::String(name.clone()),
            );
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    fn format_timestamp_json(
        &self,
        entry: &LogEntry,
        timestamp_format: &TimestampFormat,
    ) -> serde_json::Value {
        match timestamp_format {
            TimestampFormat::Unix => {
                serde_json::Value::Number(entry.timestamp.timestamp().into())
            }
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
            }
            _ => serde_json::Value::String(timestamp_format.format(&entry.timestamp)),
        }
    }

    fn format_logfmt(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::new();

        parts.push(format!(
            "timestamp={}",
            self.escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
        ));
        parts.push(format!("level={}", entry.level.to_str()));
        parts.push(format!("tag={}", self.escape_logfmt_value(&entry.tag)));
        parts.push(format!("message={}", self.quote_logfmt_value(&entry.message)));
        parts.push(format!("file={}", self.escape_logfmt_value(&entry.file)));
        parts.push(format!("line={}", entry.line));
        if let Some(ref function) = entry.function {
            parts.push(format!("function={}", self.escape_logfmt_value(function)));
        }
        parts.push(format!(
            "thread_id={}",
            self.escape_logfmt_value(&entry.thread_id)
        ));
        if let Some(ref name) = entry.thread_name {
            parts.push(format!("thread_name={}", self.escape_logfmt_value(name)));
        }

        parts.join(" ")
    }

    /// Escape a logfmt value (quote if it contains spaces or specials)
    fn escape_logfmt_value(&self, value: &str) -> String {
        if value.contains(' ') || value.contains('"') || value.contains('=') {
            self.quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    fn quote_logfmt_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogLevel};

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new("net.http", level, message.to_string(), CallSite::here())
    }

    #[test]
    fn test_text_format() {
        let result =
            OutputFormat::Text.format(&entry(LogLevel::Info, "Test message"), &TimestampFormat::Iso8601);

        assert!(result.contains("INFO"));
        assert!(result.contains("[net.http]"));
        assert!(result.contains("Test message"));
        assert!(result.contains("output_format.rs"));
    }

    #[test]
    fn test_json_format() {
        let result = OutputFormat::Json
            .format(&entry(LogLevel::Error, "Error occurred"), &TimestampFormat::Iso8601);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["tag"], "net.http");
        assert_eq!(parsed["message"], "Error occurred");
        assert!(parsed["timestamp"].is_string());
        assert!(parsed["line"].is_number());
    }

    #[test]
    fn test_json_unix_timestamp_is_numeric() {
        let result =
            OutputFormat::Json.format(&entry(LogLevel::Info, "tick"), &TimestampFormat::Unix);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(parsed["timestamp"].is_number());
    }

    #[test]
    fn test_logfmt_format() {
        let result = OutputFormat::Logfmt
            .format(&entry(LogLevel::Warning, "Warning message"), &TimestampFormat::Iso8601);

        assert!(result.contains("level=WARNING"));
        assert!(result.contains("tag=net.http"));
        assert!(result.contains("message=\"Warning message\""));
    }

    #[test]
    fn test_logfmt_escapes_values_with_equals() {
        let result = OutputFormat::Logfmt
            .format(&entry(LogLevel::Trace1, "q=SELECT 1"), &TimestampFormat::Iso8601);
        assert!(result.contains("message=\"q=SELECT 1\""));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
