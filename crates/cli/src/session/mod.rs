//! Batch session - wires a controller to the terminal.
//!
//! Owns the sinks, the operator input and the Ctrl-C handler for one batch.

mod campaign;
mod console;
mod operator;
mod stats;

pub use campaign::LoadedCampaign;
pub use stats::SessionStats;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use contracts::{MessageTemplate, SendTransport};
use dispatcher::{
    DispatchControllerBuilder, JsonLinesStatusLog, StatusBoard, TracingProgress,
    TracingStatusLog,
};
use recipients::RecipientQueue;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{CliError, Result};
use console::{ConsoleProgress, ConsoleStatus};
use operator::Operator;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wait between two sends
    pub delay: Duration,

    /// JSON-lines status file (None = disabled)
    pub status_file: Option<PathBuf>,

    /// Read operator commands from stdin
    pub read_input: bool,

    /// Ask before cancelling
    pub confirm_cancel: bool,

    /// Print entries and progress to stdout; otherwise emit them as tracing events
    pub console: bool,
}

/// One batch run from start to summary
pub struct BatchSession<T> {
    transport: T,
    template: MessageTemplate,
    config: SessionConfig,
}

impl<T> BatchSession<T>
where
    T: SendTransport + Sync + 'static,
{
    pub fn new(transport: T, template: MessageTemplate, config: SessionConfig) -> Self {
        Self {
            transport,
            template,
            config,
        }
    }

    /// Run the batch to completion or cancellation
    pub async fn run(self, queue: RecipientQueue) -> Result<SessionStats> {
        let board = StatusBoard::new("board");
        let mut builder = DispatchControllerBuilder::new(self.transport, self.template)
            .delay(self.config.delay)
            .status_log(Arc::new(board.clone()));

        builder = if self.config.console {
            builder
                .status_log(Arc::new(ConsoleStatus::new("console")))
                .progress_reporter(Arc::new(ConsoleProgress::new("console")))
        } else {
            builder
                .status_log(Arc::new(TracingStatusLog::new("tracing")))
                .progress_reporter(Arc::new(TracingProgress::new("tracing")))
        };

        if let Some(path) = &self.config.status_file {
            let log = JsonLinesStatusLog::open("status_file", path)
                .with_context(|| format!("Failed to open status file {}", path.display()))?;
            builder = builder.status_log(Arc::new(log));
        }

        let controller = builder.build();
        let control = controller.control();

        let task = controller
            .start(queue)
            .map_err(|e| CliError::batch_rejected(e.to_string()))?;

        let mut input = if self.config.read_input {
            println!("{}", operator::HELP);
            Some(operator::spawn_stdin_reader())
        } else {
            None
        };
        let mut operator = Operator::new(control.clone(), board, self.config.confirm_cancel);

        let join = task.join();
        tokio::pin!(join);
        let mut interrupted = false;

        let result = loop {
            tokio::select! {
                result = &mut join => break result,
                line = next_line(&mut input) => match line {
                    Some(line) => {
                        let reply = operator.handle(&line);
                        if !reply.is_empty() {
                            println!("{reply}");
                        }
                    }
                    None => {
                        info!("Operator input closed");
                        input = None;
                    }
                },
                signal = tokio::signal::ctrl_c(), if !interrupted => {
                    interrupted = true;
                    match signal {
                        Ok(()) => {
                            warn!("Interrupted, cancelling after the current email");
                            control.cancel();
                        }
                        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
                    }
                }
            }
        };

        let report = result.context("Batch task failed")?;
        Ok(SessionStats {
            report,
            metrics: controller.metrics(),
            interrupted,
        })
    }
}

async fn next_line(input: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match input {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{BodyEncoding, RunState, StatusEntry};
    use transport::MockTransport;

    fn template() -> MessageTemplate {
        MessageTemplate {
            from_name: "Ops".to_string(),
            from_email: "ops@example.com".to_string(),
            reply_to: "reply@example.com".to_string(),
            subject: "Hello".to_string(),
            body_encoding: BodyEncoding::Html,
            base64: true,
            body: "<p>Hi</p>".to_string(),
            body_file: None,
        }
    }

    fn config(status_file: Option<PathBuf>) -> SessionConfig {
        SessionConfig {
            delay: Duration::ZERO,
            status_file,
            read_input: false,
            confirm_cancel: true,
            console: false,
        }
    }

    #[tokio::test]
    async fn test_session_runs_batch_and_writes_status_file() {
        let dir = tempfile::tempdir().unwrap();
        let status_path = dir.path().join("status.jsonl");
        let mock = MockTransport::new().reject("b@x.com", "Mailbox full");

        let session = BatchSession::new(mock.clone(), template(), config(Some(status_path.clone())));
        let queue: RecipientQueue = ["a@x.com", "b@x.com"].into_iter().collect();
        let stats = session.run(queue).await.unwrap();

        assert_eq!(stats.report.final_state, RunState::Completed);
        assert_eq!((stats.report.succeeded, stats.report.failed), (1, 1));
        assert_eq!(stats.metrics.failure_count, 1);
        assert!(!stats.interrupted);

        let entries: Vec<StatusEntry> = std::fs::read_to_string(&status_path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].message, "Failed to send to b@x.com: Mailbox full");
    }

    #[tokio::test]
    async fn test_rejected_batch_is_cli_error() {
        let mock = MockTransport::new();
        let session = BatchSession::new(mock.clone(), template(), config(None));
        let queue: RecipientQueue = ["a@x.com", "nope"].into_iter().collect();

        let err = session.run(queue).await.unwrap_err();
        assert!(matches!(err, CliError::BatchRejected { .. }));
        assert!(err.to_string().contains("nope"));
        assert_eq!(mock.call_count(), 0);
    }
}
