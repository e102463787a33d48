//! 回放统计

use std::time::{Duration, Instant};

use observability::{DispatchAggregator, DispatchSample, DispatchSummary};

use crate::replay::EventReport;

/// Accumulates replayed events for the closing summary
#[derive(Debug)]
pub struct ReplayStats {
    aggregator: DispatchAggregator,
    handlers_invoked: u64,
    started_at: Instant,
}

impl Default for ReplayStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayStats {
    pub fn new() -> Self {
        Self {
            aggregator: DispatchAggregator::new(),
            handlers_invoked: 0,
            started_at: Instant::now(),
        }
    }

    /// 记录一次回放：更新摘要并上报 Prometheus 指标
    pub fn record(&mut self, report: &EventReport) {
        let sample = DispatchSample {
            kind: &report.kind,
            outcome: report.outcome,
            depth: report.visited.len(),
            handlers_invoked: report.invoked.len(),
            cycle_detected: report.cycle_detected,
        };
        observability::record_dispatch(&sample);
        self.aggregator.update(&sample);
        self.handlers_invoked += report.invoked.len() as u64;
    }

    pub fn summary(&self) -> DispatchSummary {
        self.aggregator.summary()
    }

    pub fn handlers_invoked(&self) -> u64 {
        self.handlers_invoked
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn print_summary(&self) {
        print!("\n{}", self.summary());
        println!("Handlers invoked: {}", self.handlers_invoked);
        println!("Elapsed: {:.2?}", self.elapsed());
    }
}
