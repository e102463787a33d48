//! HandlerRegistry - at most one handler per node
//!
//! Registration follows the host's node lifecycle: register when a node
//! becomes active, unregister when it goes away. The last registration wins.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use contracts::{Handler, HandlerLookup};

/// Single-threaded per-node handler slots
pub struct HandlerRegistry<N, E> {
    slots: HashMap<N, Handler<E>>,
}

impl<N, E> Default for HandlerRegistry<N, E> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<N, E> HandlerRegistry<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` for `node`, returning the one it replaced.
    pub fn register(&mut self, node: N, handler: Handler<E>) -> Option<Handler<E>> {
        let replaced = self.slots.insert(node.clone(), handler);
        debug!(node = ?node, replaced = replaced.is_some(), "Handler registered");
        replaced
    }

    /// Remove the handler for `node`; no-op if none is registered.
    pub fn unregister(&mut self, node: &N) -> Option<Handler<E>> {
        let removed = self.slots.remove(node);
        if removed.is_some() {
            debug!(node = ?node, "Handler unregistered");
        }
        removed
    }

    /// Register `Some(handler)` or unregister on `None`.
    pub fn set(&mut self, node: N, handler: Option<Handler<E>>) -> Option<Handler<E>> {
        match handler {
            Some(handler) => self.register(node, handler),
            None => self.unregister(&node),
        }
    }

    pub fn handler_for(&self, node: &N) -> Option<Handler<E>> {
        self.slots.get(node).cloned()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.slots.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Nodes that currently hold a handler, in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.slots.keys()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<N, E> HandlerLookup<N> for HandlerRegistry<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    type Event = E;

    fn handler_for(&self, node: &N) -> Option<Handler<E>> {
        HandlerRegistry::handler_for(self, node)
    }
}

impl<N: Debug, E> Debug for HandlerRegistry<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.slots.keys()).finish()
    }
}

/// Thread-safe registry for hosts that register and dispatch from several threads.
///
/// One mutex guards every read-modify-write of a slot. Lookups clone the
/// handler out before returning, so the lock is never held while a handler
/// runs and handlers may register, unregister or dispatch re-entrantly.
pub struct SharedHandlerRegistry<N, E> {
    inner: Arc<Mutex<HandlerRegistry<N, E>>>,
}

impl<N, E> Clone for SharedHandlerRegistry<N, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N, E> Default for SharedHandlerRegistry<N, E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HandlerRegistry::default())),
        }
    }
}

impl<N, E> SharedHandlerRegistry<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a panic elsewhere while holding it; the
    // slot map itself is never left half-updated.
    fn lock(&self) -> MutexGuard<'_, HandlerRegistry<N, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, node: N, handler: Handler<E>) -> Option<Handler<E>> {
        self.lock().register(node, handler)
    }

    pub fn unregister(&self, node: &N) -> Option<Handler<E>> {
        self.lock().unregister(node)
    }

    pub fn set(&self, node: N, handler: Option<Handler<E>>) -> Option<Handler<E>> {
        self.lock().set(node, handler)
    }

    pub fn handler_for(&self, node: &N) -> Option<Handler<E>> {
        self.lock().handler_for(node)
    }

    pub fn contains(&self, node: &N) -> bool {
        self.lock().contains(node)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Register `handler` for as long as the returned guard lives.
    ///
    /// Dropping the guard removes the handler only if it is still the one
    /// registered; a later registration on the same node is left alone.
    #[must_use = "dropping the Registration immediately unregisters the handler"]
    pub fn scoped(&self, node: N, handler: Handler<E>) -> Registration<N, E> {
        self.register(node.clone(), Arc::clone(&handler));
        Registration {
            registry: self.clone(),
            node: Some(node),
            handler,
        }
    }
}

impl<N, E> HandlerLookup<N> for SharedHandlerRegistry<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    type Event = E;

    fn handler_for(&self, node: &N) -> Option<Handler<E>> {
        SharedHandlerRegistry::handler_for(self, node)
    }
}

impl<N: Debug, E> Debug for SharedHandlerRegistry<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Ok(registry) => f
                .debug_tuple("SharedHandlerRegistry")
                .field(&*registry)
                .finish(),
            Err(_) => f.write_str("SharedHandlerRegistry(<locked>)"),
        }
    }
}

/// Guard returned by [`SharedHandlerRegistry::scoped`]
pub struct Registration<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    registry: SharedHandlerRegistry<N, E>,
    node: Option<N>,
    handler: Handler<E>,
}

impl<N, E> Registration<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    /// Keep the handler registered after the guard is dropped.
    pub fn forget(mut self) {
        self.node = None;
    }
}

impl<N, E> Drop for Registration<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    fn drop(&mut self) {
        let Some(node) = self.node.take() else {
            return;
        };
        let mut registry = self.registry.lock();
        let still_ours = registry
            .handler_for(&node)
            .is_some_and(|current| Arc::ptr_eq(&current, &self.handler));
        if still_ours {
            registry.unregister(&node);
        }
    }
}
