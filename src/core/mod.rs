//! Core dispatch types and traits

pub mod concurrency;
pub mod dispatcher;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod output_format;
pub mod thresholds;
pub mod timestamp;
pub mod writer;

pub use concurrency::{ConcurrencyMode, WriterConfig, DEFAULT_DRAIN_TIMEOUT};
pub use dispatcher::{configure, dispatcher, DispatchConfig, Dispatcher};
pub use error::{ErrorCallback, LoggerError, Result};
pub use log_entry::{CallSite, LogEntry};
pub use log_level::{LogLevel, MAX_TRACE_SUBLEVEL, MIN_TRACE_SUBLEVEL};
pub use output_format::OutputFormat;
pub use thresholds::Thresholds;
pub use timestamp::TimestampFormat;
pub use writer::Writer;
