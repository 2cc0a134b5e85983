//! Console writer implementation

use crate::core::{LogEntry, LogLevel, OutputFormat, Result, TimestampFormat, Writer};
use colored::Colorize;

pub struct ConsoleWriter {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this writer
    ///
    /// # Example
    ///
    /// ```
    /// use taglog::writers::ConsoleWriter;
    /// use taglog::OutputFormat;
    ///
    /// let writer = ConsoleWriter::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this writer
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom strftime-compatible timestamp format
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, entry: &LogEntry) -> String {
        let level_str = if self.use_colors {
            format!("{:7}", entry.level.to_str())
                .color(entry.level.color_code())
                .to_string()
        } else {
            format!("{:7}", entry.level.to_str())
        };

        let timestamp_str = self.timestamp_format.format(&entry.timestamp);

        format!(
            "[{}] [{}] [{}] {} - {}",
            timestamp_str,
            level_str,
            entry.tag,
            entry.thread_name.as_ref().unwrap_or(&entry.thread_id),
            entry.message
        )
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for ConsoleWriter {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Json | OutputFormat::Logfmt => {
                self.output_format.format(entry, &self.timestamp_format)
            }
        };

        // Route Error to stderr, everything else to stdout
        match entry.level {
            LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write as _;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CallSite;

    #[test]
    fn test_text_format_contains_tag_and_message() {
        let writer = ConsoleWriter::with_colors(false);
        let entry = LogEntry::new(
            "ui",
            LogLevel::Warning,
            "slow frame".to_string(),
            CallSite::here(),
        );

        let rendered = writer.format_text(&entry);
        assert!(rendered.contains("[ui]"));
        assert!(rendered.contains("WARNING"));
        assert!(rendered.contains("slow frame"));
    }
}
