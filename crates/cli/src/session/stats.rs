//! End-of-batch summary.

use dispatcher::{BatchReport, MetricsSnapshot};

/// Everything known once a batch has finished
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub report: BatchReport,
    pub metrics: MetricsSnapshot,
    /// Ctrl-C was received while the batch ran
    pub interrupted: bool,
}

impl SessionStats {
    /// Messages per second over the whole batch
    pub fn throughput(&self) -> f64 {
        let secs = self.report.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.report.processed as f64 / secs
        } else {
            0.0
        }
    }

    /// Recipients never attempted
    pub fn skipped(&self) -> usize {
        self.report.total.saturating_sub(self.report.processed)
    }

    pub fn print_summary(&self) {
        let report = &self.report;

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                        Batch Summary                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Final state: {}", report.final_state);
        println!("   ├─ Processed: {} of {}", report.processed, report.total);
        println!("   ├─ Sent: {}", report.succeeded);
        println!("   ├─ Failed: {}", report.failed);
        if self.skipped() > 0 {
            println!("   ├─ Not attempted: {}", self.skipped());
        }
        println!("   ├─ Duration: {:.2}s", report.elapsed.as_secs_f64());
        println!("   └─ Throughput: {:.2} msg/s", self.throughput());

        println!("\n📈 Transport");
        println!("   ├─ Raised errors: {}", self.metrics.raised_count);
        println!("   └─ Send latency (ms): {}", report.stats.latency_ms);

        if self.interrupted {
            println!("\n⚠️  Interrupted by Ctrl-C");
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::RunState;
    use observability::BatchSummary;
    use std::time::Duration;

    #[test]
    fn test_derived_figures() {
        let stats = SessionStats {
            report: BatchReport {
                total: 10,
                processed: 4,
                succeeded: 3,
                failed: 1,
                final_state: RunState::Cancelled,
                elapsed: Duration::from_secs(2),
                stats: BatchSummary::default(),
            },
            metrics: MetricsSnapshot::default(),
            interrupted: true,
        };

        assert_eq!(stats.skipped(), 6);
        assert!((stats.throughput() - 2.0).abs() < 1e-9);
    }
}
