//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - 日志初始化 (JSON 写 stdout；Pretty/Compact 写 stderr，不干扰控制台输出)
//! - Prometheus 指标导出（可选）
//! - 发送结果、进度与批次指标，发送延迟统计
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_logging, LogFormat, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_verbosity(1, false).with_format(LogFormat::Pretty))?;
//!
//! // 记录一次发送
//! observability::record_send_outcome("http", reply.success, started.elapsed());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_batch_finished, record_progress, record_send_outcome, BatchStatsAggregator,
    BatchSummary, RunningStats, StatsSummary,
};

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    #[default]
    Compact,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// RUST_LOG 未设置时的过滤器
    pub default_filter: String,
    /// 是否读取 RUST_LOG；静默模式下忽略
    pub use_env: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbosity(0, false)
    }
}

impl LoggingConfig {
    /// `-v` 次数与 `--quiet` 映射为过滤级别
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let default_filter = if quiet {
            "warn"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };
        Self {
            format: LogFormat::default(),
            default_filter: default_filter.to_string(),
            use_env: !quiet,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn filter(&self) -> EnvFilter {
        if self.use_env {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
        } else {
            EnvFilter::new(&self.default_filter)
        }
    }
}

/// 初始化全局 tracing subscriber
///
/// 重复初始化返回错误。
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.format,
        filter = %config.default_filter,
        "Logging initialized"
    );
    Ok(())
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingConfig::from_verbosity(0, false).default_filter, "info");
        assert_eq!(LoggingConfig::from_verbosity(1, false).default_filter, "debug");
        assert_eq!(LoggingConfig::from_verbosity(3, false).default_filter, "trace");
    }

    #[test]
    fn test_quiet_ignores_env_and_verbosity() {
        let config = LoggingConfig::from_verbosity(2, true);
        assert_eq!(config.default_filter, "warn");
        assert!(!config.use_env);
    }

    #[test]
    fn test_default_is_compact_info() {
        let config = LoggingConfig::default().with_format(LogFormat::Json);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(LoggingConfig::default().format, LogFormat::Compact);
        assert!(LoggingConfig::default().use_env);
    }
}
