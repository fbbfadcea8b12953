//! 发送指标收集模块
//!
//! 通过 `metrics` facade 上报每次发送、进度与批次结果，
//! 并在内存中聚合发送延迟，供 CLI 输出摘要。

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// 记录单次发送结果
///
/// 每个收件人处理完成后调用一次（显式失败与 transport 错误都算 failure）。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_send_outcome;
///
/// let started = Instant::now();
/// let result = transport.send(&request).await;
/// record_send_outcome(transport.name(), result.is_ok(), started.elapsed());
/// ```
pub fn record_send_outcome(transport: &str, success: bool, latency: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "mailer_sends_total",
        "transport" => transport.to_string(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "mailer_send_latency_ms",
        "transport" => transport.to_string()
    )
    .record(latency.as_secs_f64() * 1000.0);
}

/// 记录批次进度 (0.0 ~ 1.0)
pub fn record_progress(current: usize, total: usize) {
    let ratio = if total == 0 {
        0.0
    } else {
        current.min(total) as f64 / total as f64
    };
    gauge!("mailer_batch_progress_ratio").set(ratio);
    gauge!("mailer_batch_cursor").set(current as f64);
}

/// 记录批次结束（completed / cancelled）
pub fn record_batch_finished(final_state: &str, processed: usize) {
    counter!(
        "mailer_batches_total",
        "final_state" => final_state.to_string()
    )
    .increment(1);
    histogram!("mailer_batch_processed").record(processed as f64);
}

/// 批次统计聚合器
///
/// 在内存中聚合发送结果与延迟，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct BatchStatsAggregator {
    /// 成功数
    pub sent: u64,

    /// 失败数
    pub failed: u64,

    /// 发送延迟统计 (毫秒)
    pub latency_stats: RunningStats,
}

impl BatchStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, success: bool, latency: Duration) {
        if success {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
        self.latency_stats.push(latency.as_secs_f64() * 1000.0);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> BatchSummary {
        let total = self.sent + self.failed;
        BatchSummary {
            sent: self.sent,
            failed: self.failed,
            failure_rate: if total > 0 {
                self.failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 批次摘要
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub sent: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Batch Summary ===")?;
        writeln!(f, "Sent: {}", self.sent)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Send latency (ms): {}", self.latency_ms)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
