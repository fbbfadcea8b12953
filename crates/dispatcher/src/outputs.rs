//! Fan-out of status entries and progress to every attached sink

use std::sync::Arc;

use contracts::{Progress, ProgressReporter, StatusEntry, StatusLog};

/// Status logs and progress reporters of one controller
#[derive(Clone, Default)]
pub struct Outputs {
    status_logs: Vec<Arc<dyn StatusLog>>,
    reporters: Vec<Arc<dyn ProgressReporter>>,
}

impl Outputs {
    pub fn new(
        status_logs: Vec<Arc<dyn StatusLog>>,
        reporters: Vec<Arc<dyn ProgressReporter>>,
    ) -> Self {
        Self {
            status_logs,
            reporters,
        }
    }

    /// Record one entry in every status log
    pub fn status(&self, entry: StatusEntry) {
        if let Some((last, rest)) = self.status_logs.split_last() {
            for log in rest {
                log.record(entry.clone());
            }
            last.record(entry);
        }
    }

    /// Report progress to every reporter
    pub fn progress(&self, progress: Progress) {
        observability::record_progress(progress.current, progress.total);
        for reporter in &self.reporters {
            reporter.report(progress);
        }
    }

    pub fn status_log_names(&self) -> Vec<&str> {
        self.status_logs.iter().map(|l| l.name()).collect()
    }

    pub fn reporter_names(&self) -> Vec<&str> {
        self.reporters.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for Outputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outputs")
            .field("status_logs", &self.status_log_names())
            .field("reporters", &self.reporter_names())
            .finish()
    }
}
