//! Error types for the dispatch core

use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Callback invoked when a write fails after the original log call has
/// already returned (queued writers), or alongside the aggregate result
/// (direct writers). The first argument is the writer's name.
pub type ErrorCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

/// Default error channel: a stderr diagnostic line.
pub(crate) fn default_error_callback() -> ErrorCallback {
    Arc::new(|writer, err| {
        eprintln!("[TAGLOG ERROR] Writer '{}' failed: {}", writer, err);
    })
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A single writer failed to consume an entry
    #[error("Writer '{writer}' error: {message}")]
    WriteFailed { writer: String, message: String },

    /// A writer panicked while consuming an entry
    #[error("Writer '{writer}' panicked: {message}")]
    WriterPanicked { writer: String, message: String },

    /// One or more direct-mode writers failed during a single dispatch
    #[error("{failed} of {total} writers failed to accept the entry")]
    DispatchFailures { failed: usize, total: usize },

    /// A queued writer's channel disconnected before the entry was accepted
    #[error("Writer '{writer}' queue is no longer accepting entries")]
    QueueDisconnected { writer: String },

    /// A queued writer did not finish draining within the allowed time
    #[error("Writer '{writer}' did not drain within {timeout_ms}ms; remaining entries discarded")]
    DrainTimeout { writer: String, timeout_ms: u64 },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File writer error with path
    #[error("File writer error for '{path}': {message}")]
    FileWriterError { path: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a single-writer failure
    pub fn write_failed(writer: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WriteFailed {
            writer: writer.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file writer error
    pub fn file_writer(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::write_failed("console", "stream closed");
        assert!(matches!(err, LoggerError::WriteFailed { .. }));

        let err = LoggerError::config("FileWriter", "Invalid path");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_writer("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileWriterError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::DispatchFailures { failed: 1, total: 3 };
        assert_eq!(err.to_string(), "1 of 3 writers failed to accept the entry");

        let err = LoggerError::DrainTimeout {
            writer: "file".to_string(),
            timeout_ms: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Writer 'file' did not drain within 5000ms; remaining entries discarded"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
