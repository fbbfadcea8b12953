//! BatchState - the single mutable value of a dispatch controller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller run-state
///
/// `Idle → Running → {Running ⇄ Paused} → {Completed | Cancelled} → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Cancelled,
    Completed,
}

impl RunState {
    /// A batch exists (started and not yet reset)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor, total and run-state of the current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchState {
    /// Index of the next recipient to process
    pub cursor: usize,
    pub total: usize,
    pub run_state: RunState,
}

impl BatchState {
    /// Idle state with no batch
    pub fn idle() -> Self {
        Self::default()
    }

    /// Fresh running state for a queue of `total` recipients
    pub fn running(total: usize) -> Self {
        Self {
            cursor: 0,
            total,
            run_state: RunState::Running,
        }
    }

    /// Every recipient has been processed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.total
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.cursor, self.total)
    }
}

/// `(current, total)` progress pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// `round(current / total * 100)`; `None` when total is zero
    pub fn percentage(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let ratio = self.current.min(self.total) as f64 / self.total as f64;
        Some((ratio * 100.0).round() as u8)
    }

    /// Fraction in `[0, 1]`, zero when total is zero
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current.min(self.total) as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            Some(pct) => write!(f, "{}% ({} of {})", pct, self.current, self.total),
            None => write!(f, "- (0 of 0)"),
        }
    }
}
