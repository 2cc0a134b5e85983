//! Logging macros targeting the process-wide dispatcher.
//!
//! The message arguments are `format!`-style and are wrapped in a
//! closure, so formatting cost is only paid when the entry passes the
//! level filter. The call site (`file!`, `line!`, `module_path!`) is
//! captured automatically; the tag defaults to the source file's base
//! name when not given explicitly.
//!
//! Write failures never surface through the macros: direct-writer and
//! queued-writer failures alike are reported through the error callback
//! registered at configuration time. Use the [`Dispatcher`] methods
//! directly when the aggregate result matters.
//!
//! [`Dispatcher`]: crate::Dispatcher
//!
//! # Examples
//!
//! ```
//! use taglog::{log_error, log_info, log_trace, log_warning};
//!
//! log_info!("Server started");
//! log_info!(tag: "net", "Listening on port {}", 8080);
//! log_warning!(tag: "disk", "Only {} MB free", 42);
//! log_error!("Failed to open {}", "config.toml");
//! log_trace!(level: 2, tag: "net", "handshake state: {}", "HELLO_SENT");
//! ```

/// Log a message at an explicit level.
#[macro_export]
macro_rules! log {
    (tag: $tag:expr, $level:expr, $($arg:tt)+) => {{
        let _ = $crate::dispatcher().log_with(
            ::core::option::Option::Some($tag),
            $level,
            || ::std::format!($($arg)+),
            $crate::CallSite::new(::std::file!(), ::std::line!(), ::std::module_path!()),
        );
    }};
    ($level:expr, $($arg:tt)+) => {{
        let _ = $crate::dispatcher().log_with(
            ::core::option::Option::None,
            $level,
            || ::std::format!($($arg)+),
            $crate::CallSite::new(::std::file!(), ::std::line!(), ::std::module_path!()),
        );
    }};
}

/// Log an error-level message.
#[macro_export]
macro_rules! log_error {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(tag: $tag, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! log_warning {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(tag: $tag, $crate::LogLevel::Warning, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! log_info {
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(tag: $tag, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a trace-level message.
///
/// The optional `level:` prefix selects the trace sublevel (1..=4,
/// default 1). A sublevel outside that range panics: it is a caller
/// contract violation, not a runtime condition.
#[macro_export]
macro_rules! log_trace {
    (level: $sublevel:expr, tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(tag: $tag, $crate::LogLevel::trace($sublevel), $($arg)+)
    };
    (level: $sublevel:expr, $($arg:tt)+) => {
        $crate::log!($crate::LogLevel::trace($sublevel), $($arg)+)
    };
    (tag: $tag:expr, $($arg:tt)+) => {
        $crate::log!(tag: $tag, $crate::LogLevel::Trace1, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Trace1, $($arg)+)
    };
}
