//! EventTrigger - a start node bound to a dispatcher and an unhandled policy
//!
//! Nested code that cannot handle an event itself raises it through a
//! trigger and lets it bubble to whichever ancestor registered a handler.
//! What happens when nobody does is decided here, by the caller's policy,
//! never inside the walk.

use std::fmt::Debug;

use tracing::warn;

use contracts::{HandlerLookup, Hierarchy, Outcome, UnhandledPolicy};

use crate::dispatcher::Dispatcher;
use crate::error::DispatcherError;

/// Apply `policy` to the outcome of a dispatch started at `node`.
///
/// `Handled` always passes through. For `Unhandled`:
/// - `Ignore` returns it unchanged
/// - `Warn` logs a warning and returns it
/// - `Fail` converts it into [`DispatcherError::Unhandled`]
/// - `Assert` panics when debug assertions are enabled, otherwise behaves as `Warn`
pub fn apply_policy<N: Debug>(
    policy: UnhandledPolicy,
    outcome: Outcome,
    node: &N,
) -> Result<Outcome, DispatcherError> {
    if outcome.is_handled() {
        return Ok(outcome);
    }

    match policy {
        UnhandledPolicy::Ignore => Ok(outcome),
        UnhandledPolicy::Warn => {
            warn!(node = ?node, "Event was not handled by any ancestor");
            Ok(outcome)
        }
        UnhandledPolicy::Fail => Err(DispatcherError::unhandled(node)),
        UnhandledPolicy::Assert => {
            if cfg!(debug_assertions) {
                panic!("event raised at {node:?} was not handled by any ancestor");
            }
            warn!(node = ?node, "Event was not handled by any ancestor");
            Ok(outcome)
        }
    }
}

/// Raises events at a fixed node
pub struct EventTrigger<'a, H, R>
where
    H: Hierarchy,
{
    dispatcher: &'a Dispatcher<H, R>,
    node: H::Node,
    policy: UnhandledPolicy,
}

impl<'a, H, R> EventTrigger<'a, H, R>
where
    H: Hierarchy,
    R: HandlerLookup<H::Node>,
{
    pub(crate) fn new(
        dispatcher: &'a Dispatcher<H, R>,
        node: H::Node,
        policy: UnhandledPolicy,
    ) -> Self {
        Self {
            dispatcher,
            node,
            policy,
        }
    }

    pub fn node(&self) -> &H::Node {
        &self.node
    }

    pub fn policy(&self) -> UnhandledPolicy {
        self.policy
    }

    /// Same start node, different policy
    pub fn with_policy(mut self, policy: UnhandledPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bubble `event` from the bound node and apply the policy to the result.
    pub fn trigger(&self, event: &R::Event) -> Result<Outcome, DispatcherError> {
        let outcome = self.dispatcher.dispatch(event, self.node.clone());
        apply_policy(self.policy, outcome, &self.node)
    }
}
