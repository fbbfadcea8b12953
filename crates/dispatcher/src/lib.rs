//! # Dispatcher
//!
//! 批量发送控制模块。
//!
//! 负责：
//! - 校验收件人队列与消息模板
//! - 逐个调用 transport，同一时刻最多一个请求在途
//! - 暂停 / 恢复 / 取消，只在步骤边界生效
//! - 状态条目与进度 fan-out 到多个 sinks

pub mod controller;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod outputs;
pub mod sinks;

pub use contracts::{BatchState, Progress, ProgressReporter, RunState, StatusEntry, StatusLog};
pub use controller::{DispatchConfig, DispatchController, DispatchControllerBuilder};
pub use error::DispatchError;
pub use handle::{BatchReport, BatchTask, DispatchControl};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use outputs::Outputs;
pub use sinks::{
    JsonLinesStatusLog, ProgressHistory, StatusBoard, TracingProgress, TracingStatusLog,
    DEFAULT_BOARD_CAPACITY,
};
