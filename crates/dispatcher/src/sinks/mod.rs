//! Status log and progress reporter implementations
//!
//! Contains TracingStatusLog, TracingProgress, StatusBoard, ProgressHistory
//! and JsonLinesStatusLog.

mod file;
mod log;
mod memory;

pub use self::file::JsonLinesStatusLog;
pub use self::log::{TracingProgress, TracingStatusLog};
pub use self::memory::{ProgressHistory, StatusBoard, DEFAULT_BOARD_CAPACITY};
