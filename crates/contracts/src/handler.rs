//! Handler types - the per-node event callback and how dispatch finds it

use std::sync::Arc;

/// Event handler callback.
///
/// Returns `true` when the event is consumed and bubbling must stop, `false`
/// to let it continue to the parent. Uses `Arc` so a registry can hand out
/// the handler without holding its own lock during the call.
pub type Handler<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<E, F>(f: F) -> Handler<E>
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Source of per-node handlers consulted by the dispatcher.
///
/// Implemented by the registries in the `dispatcher` crate; hosts with their
/// own node storage can implement it directly.
pub trait HandlerLookup<N> {
    type Event;

    /// Currently registered handler for `node`, if any.
    fn handler_for(&self, node: &N) -> Option<Handler<Self::Event>>;
}

impl<N, T: HandlerLookup<N> + ?Sized> HandlerLookup<N> for &T {
    type Event = T::Event;

    fn handler_for(&self, node: &N) -> Option<Handler<Self::Event>> {
        (**self).handler_for(node)
    }
}

impl<N, T: HandlerLookup<N> + ?Sized> HandlerLookup<N> for Arc<T> {
    type Event = T::Event;

    fn handler_for(&self, node: &N) -> Option<Handler<Self::Event>> {
        (**self).handler_for(node)
    }
}
