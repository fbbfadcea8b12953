//! Handles to a controller's state cell and to a running batch
//!
//! `BatchState` lives in one `watch` channel. Every transition is a single
//! conditional update on that cell, so operator actions from other tasks and
//! the drive loop's cursor updates never tear.
//!
//! Operator transitions also bump an action counter inside the same update,
//! so the loop can tell "something happened" even when a pause and a resume
//! land back to back between two of its polls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{BatchState, Progress, RunState, StatusEntry};
use observability::BatchSummary;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::DispatchError;
use crate::outputs::Outputs;

/// Cloneable operator handle: pause / resume / cancel / observe
#[derive(Debug, Clone)]
pub struct DispatchControl {
    state: Arc<watch::Sender<BatchState>>,
    actions: Arc<AtomicU64>,
    outputs: Arc<Outputs>,
}

impl DispatchControl {
    pub(crate) fn new(outputs: Arc<Outputs>) -> Self {
        let (state, _) = watch::channel(BatchState::idle());
        Self {
            state: Arc::new(state),
            actions: Arc::new(AtomicU64::new(0)),
            outputs,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    pub fn run_state(&self) -> RunState {
        self.state.borrow().run_state
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    /// Running → Paused
    ///
    /// An in-flight send still completes; only the next step is held back.
    /// Returns false (and does nothing) in any other state.
    pub fn pause(&self) -> bool {
        let paused = self.transition(RunState::Running, RunState::Paused);
        if paused {
            let state = self.state();
            info!(cursor = state.cursor, total = state.total, "Batch paused");
            self.outputs.status(StatusEntry::info("Email sending paused"));
        }
        paused
    }

    /// Paused → Running; the loop continues from the current cursor
    pub fn resume(&self) -> bool {
        let resumed = self.transition(RunState::Paused, RunState::Running);
        if resumed {
            let state = self.state();
            info!(cursor = state.cursor, total = state.total, "Batch resumed");
            self.outputs.status(StatusEntry::info("Email sending resumed"));
        }
        resumed
    }

    /// Running | Paused → Cancelled, effective at the next step boundary
    ///
    /// Confirmation is the caller's business. The cancellation status entry is
    /// emitted once, by the loop, when it finalizes.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.send_if_modified(|s| match s.run_state {
            RunState::Running | RunState::Paused => {
                s.run_state = RunState::Cancelled;
                self.actions.fetch_add(1, Ordering::SeqCst);
                true
            }
            _ => false,
        });
        if cancelled {
            info!("Batch cancellation requested");
        }
        cancelled
    }

    /// Wait until `run_state` is reached or `timeout` elapses
    pub async fn wait_for_state(&self, run_state: RunState, timeout: Duration) -> bool {
        let mut rx = self.subscribe();
        tokio::time::timeout(timeout, rx.wait_for(|s| s.run_state == run_state))
            .await
            .is_ok_and(|r| r.is_ok())
    }

    /// Number of accepted pause / resume / cancel calls so far
    pub(crate) fn actions(&self) -> u64 {
        self.actions.load(Ordering::SeqCst)
    }

    pub(crate) fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Idle → Running with a fresh cursor
    pub(crate) fn begin(&self, total: usize) -> Result<(), RunState> {
        let mut current = RunState::Idle;
        let started = self.state.send_if_modified(|s| {
            if s.run_state == RunState::Idle {
                *s = BatchState::running(total);
                true
            } else {
                current = s.run_state;
                false
            }
        });
        if started {
            Ok(())
        } else {
            Err(current)
        }
    }

    /// Advance the cursor by one; never past `total`
    pub(crate) fn advance(&self) -> Progress {
        let mut progress = Progress::new(0, 0);
        self.state.send_modify(|s| {
            if s.cursor < s.total {
                s.cursor += 1;
            }
            progress = s.progress();
        });
        progress
    }

    /// Running → Completed; false if an operator action got there first
    pub(crate) fn complete(&self) -> bool {
        self.state.send_if_modified(|s| {
            if s.run_state == RunState::Running {
                s.run_state = RunState::Completed;
                true
            } else {
                false
            }
        })
    }

    /// Back to Idle after finalization
    pub(crate) fn reset(&self) {
        self.state.send_replace(BatchState::idle());
        debug!("Batch state reset to idle");
    }

    // operator transitions only
    fn transition(&self, from: RunState, to: RunState) -> bool {
        self.state.send_if_modified(|s| {
            if s.run_state == from {
                s.run_state = to;
                self.actions.fetch_add(1, Ordering::SeqCst);
                true
            } else {
                false
            }
        })
    }
}

/// Summary of a finished batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total: usize,
    /// Cursor at finalization
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// `Completed` or `Cancelled`
    pub final_state: RunState,
    pub elapsed: Duration,
    /// Outcome counts and send latency
    pub stats: BatchSummary,
}

impl BatchReport {
    pub fn is_completed(&self) -> bool {
        self.final_state == RunState::Completed
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.processed, self.total)
    }
}

/// Handle to a started batch
#[derive(Debug)]
pub struct BatchTask {
    handle: JoinHandle<BatchReport>,
    control: DispatchControl,
}

impl BatchTask {
    pub(crate) fn new(handle: JoinHandle<BatchReport>, control: DispatchControl) -> Self {
        Self { handle, control }
    }

    /// Operator handle of the owning controller
    pub fn control(&self) -> DispatchControl {
        self.control.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the batch to finish
    ///
    /// # Errors
    /// Returns `DispatchError::Join` if the drive loop panicked or was
    /// aborted. The loop resets the state to Idle itself while unwinding.
    pub async fn join(self) -> Result<BatchReport, DispatchError> {
        self.handle
            .await
            .map_err(|e| DispatchError::Join(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> DispatchControl {
        DispatchControl::new(Arc::new(Outputs::default()))
    }

    #[test]
    fn test_controls_are_noops_when_idle() {
        let control = control();
        assert!(!control.pause());
        assert!(!control.resume());
        assert!(!control.cancel());
        assert_eq!(control.run_state(), RunState::Idle);
    }

    #[test]
    fn test_begin_only_from_idle() {
        let control = control();
        assert!(control.begin(3).is_ok());
        assert_eq!(control.state(), BatchState::running(3));
        assert_eq!(control.begin(5), Err(RunState::Running));
    }

    #[test]
    fn test_pause_resume_cycle() {
        let control = control();
        control.begin(2).unwrap();

        assert!(control.pause());
        assert!(!control.pause());
        assert_eq!(control.run_state(), RunState::Paused);

        assert!(control.resume());
        assert!(!control.resume());
        assert_eq!(control.run_state(), RunState::Running);
    }

    #[test]
    fn test_cancel_from_paused() {
        let control = control();
        control.begin(2).unwrap();
        control.pause();
        assert!(control.cancel());
        assert_eq!(control.run_state(), RunState::Cancelled);
        assert!(!control.resume());
        assert!(!control.complete());
    }

    #[test]
    fn test_only_accepted_actions_are_counted() {
        let control = control();
        control.pause();
        assert_eq!(control.actions(), 0);

        control.begin(2).unwrap();
        control.pause();
        control.resume();
        control.resume();
        control.advance();
        assert_eq!(control.actions(), 2);

        control.cancel();
        assert_eq!(control.actions(), 3);
    }

    #[test]
    fn test_advance_never_exceeds_total() {
        let control = control();
        control.begin(1).unwrap();
        assert_eq!(control.advance(), Progress::new(1, 1));
        assert_eq!(control.advance(), Progress::new(1, 1));
    }

    #[test]
    fn test_advance_keeps_run_state() {
        let control = control();
        control.begin(3).unwrap();
        control.pause();
        control.advance();
        let state = control.state();
        assert_eq!(state.cursor, 1);
        assert_eq!(state.run_state, RunState::Paused);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let control = control();
        control.begin(2).unwrap();
        control.advance();
        control.reset();
        assert_eq!(control.state(), BatchState::idle());
    }
}
