//! File writer implementation

use crate::core::{LogEntry, LoggerError, OutputFormat, Result, TimestampFormat, Writer};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

pub struct FileWriter {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_writer(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        })
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

    /// Set the output format for this writer
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

impl Writer for FileWriter {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_writer(self.path.display().to_string(), "writer not initialized")
        })?;

        let mut output = match self.output_format {
            OutputFormat::Text => {
                let timestamp_str = self.timestamp_format.format(&entry.timestamp);
                format!(
                    "[{}] [{:7}] [{}] [{}] {}",
                    timestamp_str,
                    entry.level.to_str(),
                    entry.tag,
                    entry.thread_name.as_ref().unwrap_or(&entry.thread_id),
                    entry.message
                )
            }
            OutputFormat::Json | OutputFormat::Logfmt => {
                self.output_format.format(entry, &self.timestamp_format)
            }
        };
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // Ensure all buffered data reaches disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogLevel};
    use tempfile::TempDir;

    #[test]
    fn test_write_and_flush() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_file = temp_dir.path().join("out.log");

        let mut writer = FileWriter::new(&log_file).expect("Failed to create writer");
        let entry = LogEntry::new(
            "db",
            LogLevel::Info,
            "connection opened".to_string(),
            CallSite::here(),
        );
        writer.write(&entry).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("[db]"));
        assert!(content.contains("connection opened"));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_json_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_file = temp_dir.path().join("out.jsonl");

        let mut writer = FileWriter::new(&log_file)
            .expect("Failed to create writer")
            .with_output_format(OutputFormat::Json);
        let entry = LogEntry::new(
            "db",
            LogLevel::Error,
            "connection lost".to_string(),
            CallSite::here(),
        );
        writer.write(&entry).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&log_file).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["tag"], "db");
        assert_eq!(parsed["level"], "ERROR");
    }

    #[test]
    fn test_bad_path_is_an_error() {
        let result = FileWriter::new("/nonexistent-dir-for-taglog/app.log");
        assert!(matches!(result, Err(LoggerError::FileWriterError { .. })));
    }
}
