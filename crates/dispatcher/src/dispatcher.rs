//! Dispatcher - bubbles an event from a start node towards the root

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{instrument, trace};

use contracts::{HandlerLookup, Hierarchy, Outcome, UnhandledPolicy};

use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::trigger::EventTrigger;

/// Diagnostic record of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport<N> {
    pub outcome: Outcome,
    /// Every node visited, start first, in walk order
    pub visited: Vec<N>,
    /// Nodes whose handler was invoked, in invocation order
    pub invoked: Vec<N>,
    /// Node whose handler consumed the event
    pub handled_by: Option<N>,
    /// Walk stopped because the parent chain came back to a visited node
    pub cycle_detected: bool,
}

impl<N> DispatchReport<N> {
    fn new() -> Self {
        Self {
            outcome: Outcome::Unhandled,
            visited: Vec::new(),
            invoked: Vec::new(),
            handled_by: None,
            cycle_detected: false,
        }
    }

    /// Number of nodes visited
    pub fn depth(&self) -> usize {
        self.visited.len()
    }
}

/// Bubbling dispatcher over a host hierarchy and a handler source.
///
/// Holds no per-call state: every `dispatch` is an independent walk. The
/// hierarchy and registry may be owned values, references or `Arc`s.
pub struct Dispatcher<H, R> {
    hierarchy: H,
    registry: R,
    metrics: Arc<DispatchMetrics>,
}

impl<H, R> Dispatcher<H, R>
where
    H: Hierarchy,
    R: HandlerLookup<H::Node>,
{
    pub fn new(hierarchy: H, registry: R) -> Self {
        Self::with_metrics(hierarchy, registry, Arc::new(DispatchMetrics::new()))
    }

    /// Create a dispatcher that reports into existing counters
    pub fn with_metrics(hierarchy: H, registry: R, metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            hierarchy,
            registry,
            metrics,
        }
    }

    pub fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Bubble `event` from `start` towards the root.
    ///
    /// Each node's handler, if any, is invoked once in child-to-root order
    /// until one returns `true`. Reaching the root, or a node already
    /// visited in this walk, ends with `Unhandled`.
    #[instrument(name = "dispatch", level = "debug", skip_all, fields(start = ?start))]
    pub fn dispatch(&self, event: &R::Event, start: H::Node) -> Outcome {
        self.walk(event, start, None)
    }

    /// Same walk as [`dispatch`](Self::dispatch), recording every step.
    #[instrument(name = "dispatch_traced", level = "debug", skip_all, fields(start = ?start))]
    pub fn dispatch_traced(&self, event: &R::Event, start: H::Node) -> DispatchReport<H::Node> {
        let mut report = DispatchReport::new();
        let outcome = self.walk(event, start, Some(&mut report));
        report.outcome = outcome;
        report
    }

    /// Bind `node` as a fixed start point with an unhandled-event policy.
    pub fn trigger_for(&self, node: H::Node, policy: UnhandledPolicy) -> EventTrigger<'_, H, R> {
        EventTrigger::new(self, node, policy)
    }

    fn walk(
        &self,
        event: &R::Event,
        start: H::Node,
        mut report: Option<&mut DispatchReport<H::Node>>,
    ) -> Outcome {
        let mut visited: HashSet<H::Node> = HashSet::new();
        let mut current = Some(start);
        let mut outcome = Outcome::Unhandled;

        while let Some(node) = current {
            if !visited.insert(node.clone()) {
                trace!(node = ?node, "Parent chain revisited a node, stopping");
                self.metrics.inc_cycle_detected();
                if let Some(report) = report.as_deref_mut() {
                    report.cycle_detected = true;
                }
                break;
            }
            if let Some(report) = report.as_deref_mut() {
                report.visited.push(node.clone());
            }

            if let Some(handler) = self.registry.handler_for(&node) {
                self.metrics.inc_handler_invoked();
                if let Some(report) = report.as_deref_mut() {
                    report.invoked.push(node.clone());
                }

                let consumed = handler(event);
                trace!(node = ?node, consumed, "Handler invoked");

                if consumed {
                    if let Some(report) = report.as_deref_mut() {
                        report.handled_by = Some(node);
                    }
                    outcome = Outcome::Handled;
                    break;
                }
            }

            current = self.hierarchy.parent_of(&node);
        }

        self.metrics.record(outcome, visited.len());
        outcome
    }
}
