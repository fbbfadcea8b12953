//! Operator commands typed on stdin while a batch runs.

use std::io::BufRead;

use dispatcher::{DispatchControl, StatusBoard};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const HELP: &str = "Commands: p(ause), r(esume), c(ancel), s(tatus), h(elp)";

/// Entries shown by the `status` command
const STATUS_TAIL: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Pause,
    Resume,
    Cancel,
    Status,
    Help,
}

impl OperatorCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "c" | "cancel" => Some(Self::Cancel),
            "s" | "status" => Some(Self::Status),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Turns typed lines into controller actions
///
/// Cancel asks for a `y/N` confirmation first unless disabled; the answer is
/// the next line typed.
pub struct Operator {
    control: DispatchControl,
    board: StatusBoard,
    confirm_cancel: bool,
    awaiting_confirmation: bool,
}

impl Operator {
    pub fn new(control: DispatchControl, board: StatusBoard, confirm_cancel: bool) -> Self {
        Self {
            control,
            board,
            confirm_cancel,
            awaiting_confirmation: false,
        }
    }

    /// Apply one input line; returns the text to show (may be empty)
    pub fn handle(&mut self, line: &str) -> String {
        if self.awaiting_confirmation {
            self.awaiting_confirmation = false;
            return if is_yes(line) {
                self.cancel()
            } else {
                "Cancel aborted, sending continues".to_string()
            };
        }

        match OperatorCommand::parse(line) {
            Some(OperatorCommand::Pause) => {
                if self.control.pause() {
                    "Paused. Type 'r' to resume.".to_string()
                } else {
                    format!("Cannot pause while {}", self.control.run_state())
                }
            }
            Some(OperatorCommand::Resume) => {
                if self.control.resume() {
                    String::new()
                } else {
                    format!("Cannot resume while {}", self.control.run_state())
                }
            }
            Some(OperatorCommand::Cancel) => {
                if !self.control.run_state().is_active() {
                    "No batch is running".to_string()
                } else if self.confirm_cancel {
                    self.awaiting_confirmation = true;
                    "Are you sure you want to cancel sending? [y/N]".to_string()
                } else {
                    self.cancel()
                }
            }
            Some(OperatorCommand::Status) => self.status(),
            Some(OperatorCommand::Help) => HELP.to_string(),
            None if line.trim().is_empty() => String::new(),
            None => format!("Unknown command '{}'. {HELP}", line.trim()),
        }
    }

    fn cancel(&self) -> String {
        if self.control.cancel() {
            "Cancelling after the current email...".to_string()
        } else {
            "No batch is running".to_string()
        }
    }

    fn status(&self) -> String {
        let state = self.control.state();
        let mut lines = vec![format!("{}: {}", state.run_state, state.progress())];
        lines.extend(
            self.board
                .entries()
                .iter()
                .take(STATUS_TAIL)
                .map(|e| format!("  {e}")),
        );
        lines.join("\n")
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Forward stdin lines from a plain thread
///
/// A blocking read on a runtime thread would hold up shutdown; the reader
/// thread is left detached and ends with the process.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("stdin-operator".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!("Operator input closed");
        });
    if let Err(e) = spawned {
        warn!(error = %e, "Failed to start stdin reader");
    }
    rx
}
