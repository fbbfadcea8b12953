//! Status log and progress reporter traits - controller output interfaces

use crate::{Progress, StatusEntry};

/// Sink for ordered per-item outcome events
///
/// Called synchronously from the dispatch loop; implementations must not block
/// for long and must not fail the batch, so write errors are handled inside.
pub trait StatusLog: Send + Sync {
    /// Sink name (used for logging)
    fn name(&self) -> &str;

    /// Record one entry
    fn record(&self, entry: StatusEntry);
}

/// Sink for `(current, total)` updates
pub trait ProgressReporter: Send + Sync {
    /// Reporter name (used for logging)
    fn name(&self) -> &str;

    /// Called after every processed item
    fn report(&self, progress: Progress);
}
