//! ReplaySession - a dispatcher wired from a blueprint

use serde::Serialize;
use tracing::{debug, info};

use contracts::{
    handler, EventConfig, EventEnvelope, HandlerRule, HierarchyBlueprint, NodeId, Outcome,
    ParentMap, UnhandledPolicy,
};
use dispatcher::{apply_policy, Dispatcher, HandlerRegistry, MetricsSnapshot};

use crate::error::{CliError, Result};
use crate::replay::ReplayStats;

/// Result of replaying one blueprint event
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub index: usize,
    pub kind: String,
    pub start: NodeId,
    pub outcome: Outcome,
    pub visited: Vec<NodeId>,
    pub invoked: Vec<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handled_by: Option<NodeId>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cycle_detected: bool,
}

/// Dispatcher over the blueprint's hierarchy with its scripted handlers registered
pub struct ReplaySession {
    dispatcher: Dispatcher<ParentMap<NodeId>, HandlerRegistry<NodeId, EventEnvelope>>,
    policy: UnhandledPolicy,
}

impl ReplaySession {
    /// Build a session; `policy` overrides the blueprint's own when given
    pub fn from_blueprint(blueprint: &HierarchyBlueprint, policy: Option<UnhandledPolicy>) -> Self {
        let mut registry = HandlerRegistry::new();
        for (node, rule) in blueprint.handler_nodes() {
            registry.register(node.clone(), scripted_handler(rule.clone()));
        }

        let policy = policy.unwrap_or(blueprint.dispatch.unhandled);
        info!(
            nodes = blueprint.nodes.len(),
            handlers = registry.len(),
            policy = policy.as_str(),
            "Replay session ready"
        );
        observability::record_registered_handlers(registry.len());

        Self {
            dispatcher: Dispatcher::new(blueprint.to_parent_map(), registry),
            policy,
        }
    }

    pub fn policy(&self) -> UnhandledPolicy {
        self.policy
    }

    pub fn handler_count(&self) -> usize {
        self.dispatcher.registry().len()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.dispatcher.metrics_snapshot()
    }

    /// Dispatch one event and apply the unhandled policy to its outcome.
    ///
    /// Under the `fail` policy an unhandled event becomes
    /// [`CliError::UnhandledEvent`]; the event is still counted in `stats`.
    pub fn replay_event(
        &self,
        index: usize,
        event: &EventConfig,
        stats: &mut ReplayStats,
    ) -> Result<EventReport> {
        let envelope = event.to_envelope();
        let report = self
            .dispatcher
            .dispatch_traced(&envelope, event.start.clone());

        debug!(
            index,
            kind = %event.kind,
            start = %event.start,
            outcome = %report.outcome,
            depth = report.depth(),
            "Event replayed"
        );

        let report = EventReport {
            index,
            kind: event.kind.clone(),
            start: event.start.clone(),
            outcome: report.outcome,
            visited: report.visited,
            invoked: report.invoked,
            handled_by: report.handled_by,
            cycle_detected: report.cycle_detected,
        };
        stats.record(&report);

        apply_policy(self.policy, report.outcome, &event.start).map_err(|source| {
            CliError::unhandled_event(index, event.kind.clone(), event.start.clone(), source)
        })?;

        Ok(report)
    }
}

/// Handler returning `consume` for the rule's kinds and `false` for anything else
fn scripted_handler(rule: HandlerRule) -> contracts::Handler<EventEnvelope> {
    handler(move |event: &EventEnvelope| rule.consumes(&event.kind))
}
