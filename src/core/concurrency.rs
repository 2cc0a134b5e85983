//! Per-writer concurrency dispatch
//!
//! Every configured writer is wrapped with a concurrency mode. Direct
//! mode runs `write` on the calling thread; queued mode hands entries to
//! a dedicated worker thread over a FIFO channel, one worker per writer.
//! Workers are never shared between writers, which keeps the per-writer
//! ordering guarantee trivial: the channel order is the dispatch order.

use super::{
    error::{ErrorCallback, LoggerError, Result},
    log_entry::LogEntry,
    writer::Writer,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default time allowed for a queued writer to drain when it is torn
/// down. On expiry the remaining entries are discarded and a diagnostic
/// goes through the error callback.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Dispatch strategy for one writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Execute `write` synchronously on the caller's thread. The caller
    /// blocks for the duration of the writer's I/O.
    Direct,
    /// Execute `write` on the writer's own worker thread, preserving
    /// FIFO order. With `capacity: Some(n)` the queue is bounded and a
    /// full queue blocks the submitting thread until space frees
    /// (backpressure, never dropping). Default is unbounded.
    #[default]
    Queued,
    /// Queued with a bounded queue of the given capacity.
    QueuedBounded(usize),
}

/// One writer paired with its chosen concurrency mode, ready to be
/// installed into a configuration.
pub struct WriterConfig {
    pub(crate) writer: Box<dyn Writer>,
    pub(crate) mode: ConcurrencyMode,
}

impl WriterConfig {
    pub fn new(writer: impl Writer + 'static, mode: ConcurrencyMode) -> Self {
        Self {
            writer: Box::new(writer),
            mode,
        }
    }

    pub fn boxed(writer: Box<dyn Writer>, mode: ConcurrencyMode) -> Self {
        Self { writer, mode }
    }

    /// Synchronous, on the caller's thread.
    pub fn direct(writer: impl Writer + 'static) -> Self {
        Self::new(writer, ConcurrencyMode::Direct)
    }

    /// Asynchronous on a dedicated worker, unbounded queue.
    pub fn queued(writer: impl Writer + 'static) -> Self {
        Self::new(writer, ConcurrencyMode::Queued)
    }

    /// Asynchronous with a bounded queue; a full queue blocks enqueue.
    pub fn queued_bounded(writer: impl Writer + 'static, capacity: usize) -> Self {
        Self::new(writer, ConcurrencyMode::QueuedBounded(capacity))
    }
}

/// Installed form of a wrapped writer, owned by one configuration.
pub(crate) enum WriterSlot {
    Direct {
        name: String,
        writer: Mutex<Box<dyn Writer>>,
    },
    Queued(QueuedWriter),
}

impl WriterSlot {
    pub(crate) fn install(config: WriterConfig, on_error: ErrorCallback) -> Self {
        let name = config.writer.name().to_string();
        match config.mode {
            ConcurrencyMode::Direct => WriterSlot::Direct {
                name,
                writer: Mutex::new(config.writer),
            },
            ConcurrencyMode::Queued => {
                let (sender, receiver) = unbounded();
                WriterSlot::Queued(QueuedWriter::spawn(name, config.writer, sender, receiver, on_error))
            }
            ConcurrencyMode::QueuedBounded(capacity) => {
                let (sender, receiver) = bounded(capacity);
                WriterSlot::Queued(QueuedWriter::spawn(name, config.writer, sender, receiver, on_error))
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            WriterSlot::Direct { name, .. } => name,
            WriterSlot::Queued(queued) => &queued.name,
        }
    }

    /// Submit one entry to this writer via its mode.
    ///
    /// Direct mode returns the write outcome; queued mode returns as
    /// soon as the entry is accepted by the queue (blocking only when a
    /// bounded queue is full).
    pub(crate) fn dispatch(&self, entry: &LogEntry) -> Result<()> {
        match self {
            WriterSlot::Direct { name, writer } => {
                write_isolated(&mut writer.lock(), entry, name)
            }
            WriterSlot::Queued(queued) => queued.enqueue(entry.clone()),
        }
    }

    /// Flush a direct writer. Queued writers flush on their own thread.
    pub(crate) fn flush(&self) -> Result<()> {
        match self {
            WriterSlot::Direct { writer, .. } => writer.lock().flush(),
            WriterSlot::Queued(_) => Ok(()),
        }
    }

    /// Stop accepting entries and wait for the backlog to drain.
    ///
    /// Returns `true` if the writer finished within `timeout`. Direct
    /// writers have no backlog and only get flushed.
    pub(crate) fn drain(&mut self, timeout: Duration) -> bool {
        match self {
            WriterSlot::Direct { writer, .. } => writer.lock().flush().is_ok(),
            WriterSlot::Queued(queued) => queued.drain(timeout),
        }
    }
}

/// A writer bound one-to-one to a worker thread fed by a FIFO channel.
pub(crate) struct QueuedWriter {
    name: String,
    sender: Option<Sender<LogEntry>>,
    handle: Option<thread::JoinHandle<()>>,
    on_error: ErrorCallback,
}

impl QueuedWriter {
    fn spawn(
        name: String,
        writer: Box<dyn Writer>,
        sender: Sender<LogEntry>,
        receiver: Receiver<LogEntry>,
        on_error: ErrorCallback,
    ) -> Self {
        let worker_name = name.clone();
        let worker_on_error = Arc::clone(&on_error);
        let handle = thread::Builder::new()
            .name(format!("taglog-{}", name))
            .spawn(move || run_worker(receiver, writer, worker_name, worker_on_error))
            .expect("failed to spawn writer worker thread");

        Self {
            name,
            sender: Some(sender),
            handle: Some(handle),
            on_error,
        }
    }

    /// Enqueue an entry, blocking only when a bounded queue is full.
    fn enqueue(&self, entry: LogEntry) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| LoggerError::QueueDisconnected {
                writer: self.name.clone(),
            })?;

        sender.send(entry).map_err(|_| LoggerError::QueueDisconnected {
            writer: self.name.clone(),
        })
    }

    /// Close the queue and wait for the worker to finish the backlog.
    fn drain(&mut self, timeout: Duration) -> bool {
        // Dropping the sender disconnects the channel; the worker keeps
        // receiving already-buffered entries until it sees the disconnect.
        drop(self.sender.take());

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = std::time::Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(panic_info) = handle.join() {
                    (self.on_error)(
                        &self.name,
                        &LoggerError::WriterPanicked {
                            writer: self.name.clone(),
                            message: panic_message(&panic_info),
                        },
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                (self.on_error)(
                    &self.name,
                    &LoggerError::DrainTimeout {
                        writer: self.name.clone(),
                        timeout_ms: timeout.as_millis() as u64,
                    },
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for QueuedWriter {
    fn drop(&mut self) {
        self.drain(DEFAULT_DRAIN_TIMEOUT);
    }
}

/// Worker loop: strict FIFO consumption of one writer's queue.
///
/// Drains whatever is immediately available after each blocking receive,
/// then flushes, so bursts are written promptly without a flush per entry.
fn run_worker(
    receiver: Receiver<LogEntry>,
    mut writer: Box<dyn Writer>,
    name: String,
    on_error: ErrorCallback,
) {
    while let Ok(entry) = receiver.recv() {
        report_failure(write_isolated(&mut writer, &entry, &name), &name, &on_error);

        while let Ok(entry) = receiver.try_recv() {
            report_failure(write_isolated(&mut writer, &entry, &name), &name, &on_error);
        }

        report_failure(writer.flush(), &name, &on_error);
    }

    // Channel disconnected and backlog fully consumed.
    report_failure(writer.flush(), &name, &on_error);
}

fn report_failure(result: Result<()>, name: &str, on_error: &ErrorCallback) {
    if let Err(err) = result {
        on_error(name, &err);
    }
}

/// Invoke `write` with panic isolation: a panicking writer is turned
/// into an error so neither the caller thread nor the worker unwinds.
fn write_isolated(
    writer: &mut Box<dyn Writer>,
    entry: &LogEntry,
    name: &str,
) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| writer.write(entry))) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::WriterPanicked {
            writer: name.to_string(),
            message: panic_message(&panic_info),
        }),
    }
}

fn panic_message(panic_info: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::default_error_callback;
    use crate::core::log_entry::CallSite;
    use crate::core::log_level::LogLevel;
    use parking_lot::Mutex as PlMutex;
    use std::sync::Arc;

    struct CollectingWriter {
        messages: Arc<PlMutex<Vec<String>>>,
    }

    impl Writer for CollectingWriter {
        fn write(&mut self, entry: &LogEntry) -> Result<()> {
            self.messages.lock().push(entry.message.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    fn entry(message: &str) -> LogEntry {
        LogEntry::new("test", LogLevel::Info, message.to_string(), CallSite::here())
    }

    #[test]
    fn test_direct_slot_writes_inline() {
        let messages = Arc::new(PlMutex::new(Vec::new()));
        let mut slot = WriterSlot::install(
            WriterConfig::direct(CollectingWriter {
                messages: Arc::clone(&messages),
            }),
            default_error_callback(),
        );

        slot.dispatch(&entry("one")).unwrap();
        // Direct mode is synchronous: the entry is visible immediately.
        assert_eq!(*messages.lock(), vec!["one".to_string()]);
        assert!(slot.drain(Duration::from_secs(1)));
    }

    #[test]
    fn test_queued_slot_preserves_fifo_order() {
        let messages = Arc::new(PlMutex::new(Vec::new()));
        let mut slot = WriterSlot::install(
            WriterConfig::queued(CollectingWriter {
                messages: Arc::clone(&messages),
            }),
            default_error_callback(),
        );

        for i in 0..100 {
            slot.dispatch(&entry(&format!("msg-{}", i))).unwrap();
        }
        assert!(slot.drain(Duration::from_secs(5)));

        let collected = messages.lock();
        assert_eq!(collected.len(), 100);
        for (i, message) in collected.iter().enumerate() {
            assert_eq!(message, &format!("msg-{}", i));
        }
    }

    #[test]
    fn test_queued_failure_reported_through_callback() {
        struct FailingWriter;
        impl Writer for FailingWriter {
            fn write(&mut self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::other("disk on fire"))
            }
            fn name(&self) -> &str {
                "failing"
            }
        }

        let failures = Arc::new(PlMutex::new(Vec::new()));
        let failures_clone = Arc::clone(&failures);
        let callback: ErrorCallback = Arc::new(move |writer: &str, err: &LoggerError| {
            failures_clone.lock().push((writer.to_string(), err.to_string()));
        });

        let mut slot = WriterSlot::install(WriterConfig::queued(FailingWriter), callback);
        slot.dispatch(&entry("boom")).unwrap();
        assert!(slot.drain(Duration::from_secs(5)));

        let recorded = failures.lock();
        assert!(!recorded.is_empty());
        assert_eq!(recorded[0].0, "failing");
        assert!(recorded[0].1.contains("disk on fire"));
    }

    #[test]
    fn test_panicking_writer_is_isolated() {
        struct PanickingWriter;
        impl Writer for PanickingWriter {
            fn write(&mut self, _entry: &LogEntry) -> Result<()> {
                panic!("writer exploded");
            }
            fn name(&self) -> &str {
                "panicking"
            }
        }

        let failures = Arc::new(PlMutex::new(Vec::new()));
        let failures_clone = Arc::clone(&failures);
        let callback: ErrorCallback = Arc::new(move |_writer: &str, err: &LoggerError| {
            failures_clone.lock().push(err.to_string());
        });

        let mut slot = WriterSlot::install(WriterConfig::queued(PanickingWriter), callback);
        slot.dispatch(&entry("boom")).unwrap();
        assert!(slot.drain(Duration::from_secs(5)));

        let recorded = failures.lock();
        assert!(recorded.iter().any(|m| m.contains("writer exploded")));
    }

    #[test]
    fn test_bounded_queue_accepts_up_to_capacity() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct GatedWriter {
            release: Arc<AtomicBool>,
            messages: Arc<PlMutex<Vec<String>>>,
        }
        impl Writer for GatedWriter {
            fn write(&mut self, entry: &LogEntry) -> Result<()> {
                while !self.release.load(Ordering::Acquire) {
                    thread::sleep(Duration::from_millis(1));
                }
                self.messages.lock().push(entry.message.clone());
                Ok(())
            }
            fn name(&self) -> &str {
                "gated"
            }
        }

        let release = Arc::new(AtomicBool::new(false));
        let messages = Arc::new(PlMutex::new(Vec::new()));
        let mut slot = WriterSlot::install(
            WriterConfig::queued_bounded(
                GatedWriter {
                    release: Arc::clone(&release),
                    messages: Arc::clone(&messages),
                },
                8,
            ),
            default_error_callback(),
        );

        // The worker is blocked on the first entry; the rest sit in the
        // bounded queue. Capacity 8 plus the in-flight entry fit without
        // blocking the submitter.
        for i in 0..9 {
            slot.dispatch(&entry(&format!("m{}", i))).unwrap();
        }

        release.store(true, Ordering::Release);
        assert!(slot.drain(Duration::from_secs(5)));
        assert_eq!(messages.lock().len(), 9);
    }
}
