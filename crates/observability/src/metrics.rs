//! 分发指标收集模块
//!
//! 每次冒泡分发结束后记录 Prometheus 指标，并可在内存中聚合出摘要。

use std::collections::HashMap;
use std::fmt;

use contracts::Outcome;
use metrics::{counter, gauge, histogram};

/// One finished dispatch, as seen by metrics
#[derive(Debug, Clone, Copy)]
pub struct DispatchSample<'a> {
    /// Event kind (metric label)
    pub kind: &'a str,
    pub outcome: Outcome,
    /// Nodes visited by the walk
    pub depth: usize,
    pub handlers_invoked: usize,
    pub cycle_detected: bool,
}

/// 记录一次分发
///
/// # Example
///
/// ```ignore
/// let report = dispatcher.dispatch_traced(&event, start);
/// record_dispatch(&DispatchSample {
///     kind: &event.kind,
///     outcome: report.outcome,
///     depth: report.depth(),
///     handlers_invoked: report.invoked.len(),
///     cycle_detected: report.cycle_detected,
/// });
/// ```
pub fn record_dispatch(sample: &DispatchSample<'_>) {
    counter!(
        "bubbler_dispatch_total",
        "kind" => sample.kind.to_string(),
        "outcome" => sample.outcome.as_str()
    )
    .increment(1);

    histogram!("bubbler_dispatch_depth").record(sample.depth as f64);
    histogram!("bubbler_dispatch_handlers_invoked").record(sample.handlers_invoked as f64);

    if sample.cycle_detected {
        record_cycle_detected();
    }
}

/// 记录父链成环
pub fn record_cycle_detected() {
    counter!("bubbler_parent_cycles_total").increment(1);
}

/// 记录当前已登记 handler 数量
pub fn record_registered_handlers(count: usize) {
    gauge!("bubbler_registered_handlers").set(count as f64);
}

/// 分发指标聚合器
#[derive(Debug, Clone, Default)]
pub struct DispatchAggregator {
    pub total: u64,
    pub handled: u64,
    pub unhandled: u64,
    pub cycles: u64,
    /// 遍历深度统计
    pub depth_stats: RunningStats,
    /// 各事件类型未处理次数
    pub unhandled_by_kind: HashMap<String, u64>,
}

impl DispatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, sample: &DispatchSample<'_>) {
        self.total += 1;
        match sample.outcome {
            Outcome::Handled => self.handled += 1,
            Outcome::Unhandled => {
                self.unhandled += 1;
                *self
                    .unhandled_by_kind
                    .entry(sample.kind.to_string())
                    .or_insert(0) += 1;
            }
        }
        if sample.cycle_detected {
            self.cycles += 1;
        }
        self.depth_stats.push(sample.depth as f64);
    }

    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            total: self.total,
            handled: self.handled,
            unhandled: self.unhandled,
            cycles: self.cycles,
            handled_rate: if self.total > 0 {
                self.handled as f64 / self.total as f64 * 100.0
            } else {
                0.0
            },
            depth: StatsSummary::from(&self.depth_stats),
            unhandled_by_kind: self.unhandled_by_kind.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub total: u64,
    pub handled: u64,
    pub unhandled: u64,
    pub cycles: u64,
    pub handled_rate: f64,
    pub depth: StatsSummary,
    pub unhandled_by_kind: HashMap<String, u64>,
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Events dispatched: {}", self.total)?;
        writeln!(
            f,
            "Handled: {} ({:.2}%)",
            self.handled, self.handled_rate
        )?;
        writeln!(f, "Unhandled: {}", self.unhandled)?;
        if self.cycles > 0 {
            writeln!(f, "Parent cycles: {}", self.cycles)?;
        }
        writeln!(f, "Walk depth: {}", self.depth)?;

        if !self.unhandled_by_kind.is_empty() {
            writeln!(f, "Unhandled by kind:")?;
            let mut kinds: Vec<_> = self.unhandled_by_kind.iter().collect();
            kinds.sort();
            for (kind, count) in kinds {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

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
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.2} (n={})",
                self.min, self.max, self.mean, self.count
            )
        }
    }
}

/// 在线统计 (增量均值)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.mean += (value - self.mean) / self.count as f64;
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

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
