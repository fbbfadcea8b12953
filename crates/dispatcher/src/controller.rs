//! DispatchController - sequential send loop with pause / resume / cancel

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{
    BatchState, DispatchSettings, MessageTemplate, ProgressReporter, RecipientQueue, RunState,
    SendOutcome, SendTransport, StatusEntry, StatusLog,
};
use observability::BatchStatsAggregator;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::DispatchError;
use crate::handle::{BatchReport, BatchTask, DispatchControl};
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::outputs::Outputs;

/// Controller configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Wait between two sends
    pub delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
        }
    }
}

impl From<&DispatchSettings> for DispatchConfig {
    fn from(settings: &DispatchSettings) -> Self {
        Self {
            delay: settings.delay(),
        }
    }
}

/// Builder for creating a DispatchController
pub struct DispatchControllerBuilder<T> {
    transport: T,
    template: MessageTemplate,
    config: DispatchConfig,
    status_logs: Vec<Arc<dyn StatusLog>>,
    reporters: Vec<Arc<dyn ProgressReporter>>,
}

impl<T> DispatchControllerBuilder<T>
where
    T: SendTransport + Sync + 'static,
{
    /// Create a new DispatchControllerBuilder
    pub fn new(transport: T, template: MessageTemplate) -> Self {
        Self {
            transport,
            template,
            config: DispatchConfig::default(),
            status_logs: Vec::new(),
            reporters: Vec::new(),
        }
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Attach a status log (every entry goes to every log)
    pub fn status_log(mut self, log: Arc<dyn StatusLog>) -> Self {
        self.status_logs.push(log);
        self
    }

    /// Attach a progress reporter
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Build the controller in Idle state
    #[instrument(
        name = "dispatch_controller_build",
        skip(self),
        fields(
            transport = self.transport.name(),
            status_logs = self.status_logs.len(),
            reporters = self.reporters.len()
        )
    )]
    pub fn build(self) -> DispatchController<T> {
        let outputs = Arc::new(Outputs::new(self.status_logs, self.reporters));
        debug!(?outputs, delay_ms = self.config.delay.as_millis() as u64, "Controller built");

        DispatchController {
            transport: Arc::new(self.transport),
            template: Arc::new(self.template),
            config: self.config,
            control: DispatchControl::new(outputs),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }
}

/// Owner of the batch state and the send loop
pub struct DispatchController<T> {
    transport: Arc<T>,
    template: Arc<MessageTemplate>,
    config: DispatchConfig,
    control: DispatchControl,
    metrics: Arc<DispatchMetrics>,
}

impl<T> DispatchController<T>
where
    T: SendTransport + Sync + 'static,
{
    /// Operator handle usable from other tasks
    pub fn control(&self) -> DispatchControl {
        self.control.clone()
    }

    pub fn state(&self) -> BatchState {
        self.control.state()
    }

    pub fn pause(&self) -> bool {
        self.control.pause()
    }

    pub fn resume(&self) -> bool {
        self.control.resume()
    }

    pub fn cancel(&self) -> bool {
        self.control.cancel()
    }

    /// Cumulative counters over all batches of this controller
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `queue`, reset the state and spawn the drive loop
    ///
    /// # Errors
    /// - `BatchInProgress` when a batch is still active
    /// - validation errors (empty queue, malformed address, bad template);
    ///   exactly one error status entry is emitted and nothing is sent
    #[instrument(name = "dispatch_start", skip(self, queue), fields(total = queue.len()))]
    pub fn start(&self, queue: RecipientQueue) -> Result<BatchTask, DispatchError> {
        let current = self.control.run_state();
        if current.is_active() {
            return Err(self.busy(current));
        }

        if let Err(e) = self.validate(&queue) {
            warn!(error = %e, "Batch rejected");
            self.control.outputs().status(StatusEntry::error(rejection_message(&e)));
            return Err(e);
        }

        let total = queue.len();
        self.control.begin(total).map_err(|state| self.busy(state))?;

        info!(total, transport = self.transport.name(), "Batch started");
        self.control
            .outputs()
            .status(StatusEntry::info(format!("Starting to send {total} email(s)...")));

        let worker = BatchWorker {
            transport: Arc::clone(&self.transport),
            template: Arc::clone(&self.template),
            queue,
            delay: self.config.delay,
            control: self.control.clone(),
            metrics: Arc::clone(&self.metrics),
            stats: BatchStatsAggregator::new(),
            finished: false,
        };

        let handle = tokio::spawn(worker.run());
        Ok(BatchTask::new(handle, self.control.clone()))
    }

    fn validate(&self, queue: &RecipientQueue) -> Result<(), DispatchError> {
        if queue.is_empty() {
            return Err(DispatchError::EmptyQueue);
        }

        let invalid = recipients::invalid_recipients(queue);
        if !invalid.is_empty() {
            return Err(DispatchError::InvalidRecipients { invalid });
        }

        if let Some(message) = self.template.validation_message() {
            return Err(DispatchError::InvalidTemplate { message });
        }

        Ok(())
    }

    fn busy(&self, state: RunState) -> DispatchError {
        warn!(state = %state, "Start refused, batch in progress");
        DispatchError::BatchInProgress { state }
    }
}

fn rejection_message(err: &DispatchError) -> String {
    match err {
        DispatchError::EmptyQueue => "Please enter at least one recipient email".to_string(),
        DispatchError::InvalidRecipients { invalid } => {
            format!("Invalid email addresses found: {}", invalid.join(", "))
        }
        DispatchError::InvalidTemplate { message } => format!("Invalid message: {message}"),
        other => other.to_string(),
    }
}

/// State owned by the spawned drive loop of one batch
struct BatchWorker<T> {
    transport: Arc<T>,
    template: Arc<MessageTemplate>,
    queue: RecipientQueue,
    delay: Duration,
    control: DispatchControl,
    metrics: Arc<DispatchMetrics>,
    stats: BatchStatsAggregator,
    /// Set by finalize; a worker dropped without it panicked or was aborted
    finished: bool,
}

impl<T> Drop for BatchWorker<T> {
    fn drop(&mut self) {
        if !self.finished {
            let state = self.control.state();
            warn!(
                cursor = state.cursor,
                total = state.total,
                panicking = std::thread::panicking(),
                "Batch loop stopped without finalizing, resetting to idle"
            );
            self.control.reset();
        }
    }
}

impl<T> BatchWorker<T>
where
    T: SendTransport + Sync + 'static,
{
    #[instrument(name = "dispatch_loop", skip(self), fields(total = self.queue.len()))]
    async fn run(mut self) -> BatchReport {
        let started = Instant::now();
        let mut rx = self.control.subscribe();

        loop {
            let state = *rx.borrow_and_update();
            let actions = self.control.actions();

            match state.run_state {
                RunState::Running => {}
                RunState::Paused => {
                    debug!(cursor = state.cursor, "Loop suspended while paused");
                    // the worker's control keeps the sender alive
                    let _ = rx.changed().await;
                    continue;
                }
                RunState::Cancelled => {
                    return self.finalize(RunState::Cancelled, state, started);
                }
                RunState::Idle | RunState::Completed => {
                    warn!(state = %state.run_state, "Unexpected state inside batch loop");
                    return self.finalize(RunState::Cancelled, state, started);
                }
            }

            if state.is_exhausted() {
                if self.control.complete() {
                    return self.finalize(RunState::Completed, state, started);
                }
                // paused or cancelled at the last boundary
                continue;
            }

            self.step(state.cursor).await;

            let next = self.control.state();
            if next.run_state == RunState::Running && !next.is_exhausted() {
                self.throttle(&mut rx, actions).await;
            }
        }
    }

    /// One send: request → transport → outcome → status → cursor → progress
    #[instrument(name = "dispatch_step", skip(self), fields(total = self.queue.len()))]
    async fn step(&mut self, cursor: usize) {
        let Some(recipient) = self.queue.get(cursor) else {
            return;
        };

        let request = self.template.request_for(recipient);
        let sent_at = Instant::now();
        let result = self.transport.send(&request).await;
        let latency = sent_at.elapsed();

        let outcome = SendOutcome::from_result(recipient.clone(), result);
        self.record(&outcome, latency);

        let progress = self.control.advance();
        self.control.outputs().progress(progress);
    }

    fn record(&mut self, outcome: &SendOutcome, latency: Duration) {
        let detail = outcome.error_detail.as_deref().unwrap_or("unknown error");
        self.stats.update(outcome.success, latency);
        let entry = if outcome.success {
            self.metrics.inc_sent_count();
            debug!(recipient = %outcome.recipient, latency_ms = latency.as_millis() as u64, "Sent");
            StatusEntry::success(format!("Email sent to {}", outcome.recipient))
        } else if outcome.raised {
            self.metrics.inc_failure_count();
            self.metrics.inc_raised_count();
            warn!(recipient = %outcome.recipient, error = %detail, "Transport raised");
            StatusEntry::error(format!("Error sending to {}: {}", outcome.recipient, detail))
        } else {
            self.metrics.inc_failure_count();
            warn!(recipient = %outcome.recipient, reason = %detail, "Send failed");
            StatusEntry::error(format!(
                "Failed to send to {}: {}",
                outcome.recipient, detail
            ))
        };

        observability::record_send_outcome(self.transport.name(), outcome.success, latency);
        self.control.outputs().status(entry);
    }

    /// Inter-send delay, cut short by any operator action since `actions`
    ///
    /// Returning early sends the loop back to the top, which re-reads the
    /// state: a pause waits there, a resume steps immediately.
    async fn throttle(&self, rx: &mut watch::Receiver<BatchState>, actions: u64) {
        if self.delay.is_zero() {
            return;
        }

        let sleep = tokio::time::sleep(self.delay);
        tokio::pin!(sleep);

        loop {
            if self.control.actions() != actions {
                debug!("Pending step preempted");
                return;
            }
            tokio::select! {
                _ = &mut sleep => return,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }

    fn finalize(
        &mut self,
        final_state: RunState,
        state: BatchState,
        started: Instant,
    ) -> BatchReport {
        let stats = self.stats.summary();
        let report = BatchReport {
            total: state.total,
            processed: state.cursor,
            succeeded: stats.sent as usize,
            failed: stats.failed as usize,
            final_state,
            elapsed: started.elapsed(),
            stats,
        };

        let entry = if final_state == RunState::Completed {
            self.metrics.inc_completed_batches();
            StatusEntry::success(format!(
                "All {} email(s) processed: {} sent, {} failed",
                report.total, report.succeeded, report.failed
            ))
        } else {
            self.metrics.inc_cancelled_batches();
            StatusEntry::error(format!(
                "Email sending cancelled after {} of {} email(s)",
                report.processed, report.total
            ))
        };

        info!(
            final_state = %final_state,
            processed = report.processed,
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Batch finished"
        );
        observability::record_batch_finished(final_state.as_str(), report.processed);

        self.control.outputs().status(entry);
        self.finished = true;
        self.control.reset();
        report
    }
}
