//! # Taglog
//!
//! A tag-based logging facade with per-writer concurrency dispatch.
//!
//! ## Features
//!
//! - **Per-Writer Dispatch**: each writer independently runs direct
//!   (synchronous, caller's thread) or queued (own FIFO worker)
//! - **Tagged Filtering**: thresholds by exact tag, namespace prefix, or
//!   globally, configured from environment-style key/value pairs
//! - **Lazy Messages**: message formatting only runs for entries that
//!   pass the filter
//! - **Atomic Reconfiguration**: swap writers and thresholds mid-flight
//!   without mixing old and new configurations
//!
//! ## Quick start
//!
//! ```no_run
//! use taglog::prelude::*;
//! use taglog::log_info;
//!
//! taglog::configure(
//!     DispatchConfig::new()
//!         .writer(WriterConfig::direct(ConsoleWriter::new()))
//!         .environment(std::env::vars()),
//! );
//!
//! log_info!(tag: "net", "Listening on port {}", 8080);
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        configure, dispatcher, CallSite, ConcurrencyMode, DispatchConfig, Dispatcher,
        ErrorCallback, LogEntry, LogLevel, LoggerError, OutputFormat, Result, Thresholds,
        TimestampFormat, Writer, WriterConfig, DEFAULT_DRAIN_TIMEOUT,
    };
    #[cfg(feature = "console")]
    pub use crate::writers::ConsoleWriter;
    #[cfg(feature = "file")]
    pub use crate::writers::FileWriter;
}

pub use crate::core::{
    configure, dispatcher, CallSite, ConcurrencyMode, DispatchConfig, Dispatcher, ErrorCallback,
    LogEntry, LogLevel, LoggerError, OutputFormat, Result, Thresholds, TimestampFormat, Writer,
    WriterConfig, DEFAULT_DRAIN_TIMEOUT,
};
#[cfg(feature = "console")]
pub use writers::ConsoleWriter;
#[cfg(feature = "file")]
pub use writers::FileWriter;
