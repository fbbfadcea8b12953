//! TracingStatusLog / TracingProgress - forward controller output to tracing

use contracts::{Progress, ProgressReporter, StatusEntry, StatusLevel, StatusLog};
use tracing::{error, info};

/// Status log that emits every entry as a tracing event
pub struct TracingStatusLog {
    name: String,
}

impl TracingStatusLog {
    /// Create a new TracingStatusLog with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StatusLog for TracingStatusLog {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, entry: StatusEntry) {
        match entry.level {
            StatusLevel::Error => {
                error!(sink = %self.name, level = %entry.level, "{}", entry.message)
            }
            _ => info!(sink = %self.name, level = %entry.level, "{}", entry.message),
        }
    }
}

/// Progress reporter that logs `current/total (pct%)`
pub struct TracingProgress {
    name: String,
}

impl TracingProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProgressReporter for TracingProgress {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&self, progress: Progress) {
        info!(
            sink = %self.name,
            current = progress.current,
            total = progress.total,
            percentage = progress.percentage().unwrap_or(0),
            "Progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_status_log_accepts_all_levels() {
        let log = TracingStatusLog::new("test_log");
        log.record(StatusEntry::info("starting"));
        log.record(StatusEntry::success("sent"));
        log.record(StatusEntry::error("failed"));
        assert_eq!(log.name(), "test_log");
    }

    #[test]
    fn test_tracing_progress_handles_empty_total() {
        let reporter = TracingProgress::new("progress");
        reporter.report(Progress::new(0, 0));
        reporter.report(Progress::new(1, 2));
        assert_eq!(reporter.name(), "progress");
    }
}
