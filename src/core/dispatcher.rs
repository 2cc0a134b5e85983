//! Dispatcher: level filtering, fan-out, and configuration swap

use super::{
    concurrency::{WriterConfig, WriterSlot},
    error::{default_error_callback, ErrorCallback, LoggerError, Result},
    log_entry::{CallSite, LogEntry},
    log_level::LogLevel,
    thresholds::Thresholds,
};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// One immutable configuration generation: thresholds, the ordered
/// writer list, and the error channel, installed and replaced as a unit.
struct ActiveConfig {
    thresholds: Thresholds,
    writers: Vec<WriterSlot>,
    on_error: ErrorCallback,
}

impl ActiveConfig {
    fn empty() -> Self {
        Self {
            thresholds: Thresholds::new(),
            writers: Vec::new(),
            on_error: default_error_callback(),
        }
    }
}

/// Builder for a dispatcher configuration.
///
/// # Example
///
/// ```no_run
/// use taglog::prelude::*;
///
/// taglog::configure(
///     DispatchConfig::new()
///         .writer(WriterConfig::direct(ConsoleWriter::new()))
///         .writer(WriterConfig::queued(FileWriter::new("/var/log/app.log").unwrap()))
///         .environment(std::env::vars()),
/// );
/// ```
#[derive(Default)]
pub struct DispatchConfig {
    writers: Vec<WriterConfig>,
    thresholds: Thresholds,
    on_error: Option<ErrorCallback>,
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self {
            writers: Vec::new(),
            thresholds: Thresholds::new(),
            on_error: None,
        }
    }

    /// Add one wrapped writer. Writers receive entries in the order
    /// they were added.
    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, writer: WriterConfig) -> Self {
        self.writers.push(writer);
        self
    }

    /// Add several writers sharing one concurrency mode.
    #[must_use = "builder methods return a new value"]
    pub fn writers_with_mode(
        mut self,
        mode: super::concurrency::ConcurrencyMode,
        writers: Vec<Box<dyn super::writer::Writer>>,
    ) -> Self {
        for writer in writers {
            self.writers.push(WriterConfig::boxed(writer, mode));
        }
        self
    }

    /// Parse thresholds from key/value pairs, e.g. `std::env::vars()`.
    #[must_use = "builder methods return a new value"]
    pub fn environment<K, V, I>(mut self, environment: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(String, String)> = environment
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        self.thresholds =
            Thresholds::from_environment(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        self
    }

    /// Register the error channel for this configuration. Failures in
    /// queued writers are only observable through this callback.
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }
}

/// The dispatch core.
///
/// The swappable `Arc<ActiveConfig>` is the only shared mutable state: a
/// log call clones the `Arc` once and works against that snapshot for
/// the rest of the call, so a concurrent `configure` can never mix old
/// writers with new thresholds or vice versa.
pub struct Dispatcher {
    active: RwLock<Arc<ActiveConfig>>,
}

impl Dispatcher {
    /// A dispatcher with no writers and default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(ActiveConfig::empty())),
        }
    }

    /// Atomically install a new configuration.
    ///
    /// The new configuration is fully built (worker threads spawned,
    /// thresholds parsed) before the swap, then published in one write.
    /// Queued writers of the outgoing configuration drain their backlog
    /// when the last in-flight reference to it drops; for the common
    /// case of no in-flight calls that happens here, before returning.
    pub fn configure(&self, config: DispatchConfig) {
        let on_error = config.on_error.unwrap_or_else(default_error_callback);
        let writers = config
            .writers
            .into_iter()
            .map(|writer| WriterSlot::install(writer, Arc::clone(&on_error)))
            .collect();

        let next = Arc::new(ActiveConfig {
            thresholds: config.thresholds,
            writers,
            on_error,
        });

        let previous = {
            let mut active = self.active.write();
            std::mem::replace(&mut *active, next)
        };
        // Dropping outside the lock: draining the old writers must not
        // block concurrent log calls against the new configuration.
        drop(previous);
    }

    /// Resolve the filter for a tag against the active thresholds.
    pub fn should_log(&self, tag: &str, level: LogLevel) -> bool {
        self.active.read().thresholds.should_log(tag, level)
    }

    /// The single entry point behind the logging surface.
    ///
    /// Evaluates the filter against the current snapshot; on failure the
    /// message closure is never invoked. On success the closure runs
    /// exactly once, one entry is built, and every writer receives it in
    /// configured order via its own mode. A failing writer never keeps
    /// the entry from the remaining writers; direct-mode failures are
    /// aggregated into the returned result, queued-mode failures reach
    /// the error callback once the worker hits them.
    pub fn log_with<F>(
        &self,
        tag: Option<&str>,
        level: LogLevel,
        message: F,
        site: CallSite,
    ) -> Result<()>
    where
        F: FnOnce() -> String,
    {
        let config = Arc::clone(&self.active.read());

        let tag = tag.unwrap_or_else(|| site.default_tag());
        if !config.thresholds.should_log(tag, level) {
            return Ok(());
        }

        let entry = LogEntry::new(tag, level, message(), site);

        let total = config.writers.len();
        let mut failed = 0;
        for slot in &config.writers {
            if let Err(err) = slot.dispatch(&entry) {
                (config.on_error)(slot.name(), &err);
                failed += 1;
            }
        }

        if failed > 0 {
            Err(LoggerError::DispatchFailures { failed, total })
        } else {
            Ok(())
        }
    }

    /// Log at `Error` level. Tag defaults to the caller's file name.
    #[track_caller]
    pub fn error<'a, T, F>(&self, tag: T, message: F) -> Result<()>
    where
        T: Into<Option<&'a str>>,
        F: FnOnce() -> String,
    {
        self.log_with(tag.into(), LogLevel::Error, message, CallSite::here())
    }

    /// Log at `Warning` level.
    #[track_caller]
    pub fn warning<'a, T, F>(&self, tag: T, message: F) -> Result<()>
    where
        T: Into<Option<&'a str>>,
        F: FnOnce() -> String,
    {
        self.log_with(tag.into(), LogLevel::Warning, message, CallSite::here())
    }

    /// Log at `Info` level.
    #[track_caller]
    pub fn info<'a, T, F>(&self, tag: T, message: F) -> Result<()>
    where
        T: Into<Option<&'a str>>,
        F: FnOnce() -> String,
    {
        self.log_with(tag.into(), LogLevel::Info, message, CallSite::here())
    }

    /// Log at trace sublevel `sublevel` (must be in `1..=4`).
    #[track_caller]
    pub fn trace<'a, T, F>(&self, sublevel: u8, tag: T, message: F) -> Result<()>
    where
        T: Into<Option<&'a str>>,
        F: FnOnce() -> String,
    {
        self.log_with(
            tag.into(),
            LogLevel::trace(sublevel),
            message,
            CallSite::here(),
        )
    }

    /// Flush direct-mode writers. Queued writers flush continuously on
    /// their own worker threads.
    pub fn flush(&self) -> Result<()> {
        let config = Arc::clone(&self.active.read());
        for slot in &config.writers {
            slot.flush()?;
        }
        Ok(())
    }

    /// Replace the active configuration with an empty one and drain the
    /// outgoing writers, bounded by `timeout` per writer.
    ///
    /// Returns `true` if every writer drained in time. If an in-flight
    /// log call still holds the outgoing snapshot, draining happens when
    /// that call completes, using [`DEFAULT_DRAIN_TIMEOUT`](super::concurrency::DEFAULT_DRAIN_TIMEOUT).
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let previous = {
            let mut active = self.active.write();
            std::mem::replace(&mut *active, Arc::new(ActiveConfig::empty()))
        };

        match Arc::try_unwrap(previous) {
            Ok(mut config) => {
                let mut all_drained = true;
                for slot in &mut config.writers {
                    all_drained &= slot.drain(timeout);
                }
                // Slots are already drained; their drop is a no-op join.
                all_drained
            }
            Err(shared) => {
                // A racing log call owns the last word on this
                // configuration; it will trigger the drop-drain.
                drop(shared);
                false
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

/// The process-wide dispatcher targeted by the logging macros.
///
/// Starts out with no writers and default thresholds; install writers
/// with [`configure`].
pub fn dispatcher() -> &'static Dispatcher {
    GLOBAL_DISPATCHER.get_or_init(Dispatcher::new)
}

/// Install a configuration on the process-wide dispatcher.
pub fn configure(config: DispatchConfig) {
    dispatcher().configure(config);
}
