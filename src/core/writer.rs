//! Writer capability for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A sink that consumes log entries.
///
/// A writer must be `Send`: when wrapped in queued mode, ownership moves
/// to the writer's dedicated worker thread. It does not need to be `Sync`;
/// the dispatch layer guarantees `write` is never invoked concurrently
/// with itself. In queued mode all calls happen on the writer's own
/// thread, in direct mode the dispatcher serializes callers.
pub trait Writer: Send {
    fn write(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
