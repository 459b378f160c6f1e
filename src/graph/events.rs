//! Listener registry for graph mutation events
//!
//! Every [`UnionGraph`] owns one registry. Notification is synchronous and
//! runs in registration order; each handler completes before the next one is
//! invoked, and no internal lock is held during dispatch, so a handler may
//! call back into the graph that notified it.

use crate::graph::union::UnionGraph;
use crate::model::Triple;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

/// Observer of structural and content mutations on a composite graph
///
/// Structural handlers are mandatory; content handlers default to no-ops for
/// listeners that only track the import hierarchy.
pub trait GraphListener: Send + Sync {
    /// A sub-graph was inserted into `source`
    fn on_sub_graph_added(&self, source: &UnionGraph, added: &UnionGraph);

    /// A sub-graph was removed from `source`
    fn on_sub_graph_removed(&self, source: &UnionGraph, removed: &UnionGraph);

    /// A triple was inserted into `source`'s base store
    fn on_triple_added(&self, _source: &UnionGraph, _triple: &Triple) {}

    /// A triple was removed from `source`'s base store
    fn on_triple_removed(&self, _source: &UnionGraph, _triple: &Triple) {}

    /// The graph this listener forwards structural edits to, if any
    ///
    /// Mutation guards consult this before committing, so an edit that a
    /// forwarding listener could never apply on its peer is rejected at the
    /// source instead of leaving the pair divergent.
    fn linked_peer(&self) -> Option<UnionGraph> {
        None
    }

    /// Downcast support for kind-filtered listener lookups
    fn as_any(&self) -> &dyn Any;
}

/// Ordered listener list; registration order is notification order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn GraphListener>>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        ListenerRegistry {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Append a listener; no de-duplication at this layer
    pub(crate) fn register(&self, listener: Arc<dyn GraphListener>) {
        self.listeners.write().push(listener);
    }

    /// Remove a listener by pointer identity
    pub(crate) fn unregister(&self, listener: &Arc<dyn GraphListener>) {
        self.listeners
            .write()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Listeners whose concrete type is `T`, in registration order
    pub(crate) fn of_kind<T: 'static>(&self) -> Vec<Arc<dyn GraphListener>> {
        self.listeners
            .read()
            .iter()
            .filter(|l| l.as_any().is::<T>())
            .cloned()
            .collect()
    }

    /// All registered listeners, in registration order
    pub(crate) fn all(&self) -> Vec<Arc<dyn GraphListener>> {
        self.listeners.read().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Snapshot the list and dispatch outside the lock
    pub(crate) fn notify(&self, invoke: impl Fn(&dyn GraphListener)) {
        let snapshot = self.all();
        for listener in snapshot {
            invoke(listener.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BaseStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tagged {
        tag: usize,
        log: Arc<RwLock<Vec<usize>>>,
    }

    impl GraphListener for Tagged {
        fn on_sub_graph_added(&self, _source: &UnionGraph, _added: &UnionGraph) {
            self.log.write().push(self.tag);
        }

        fn on_sub_graph_removed(&self, _source: &UnionGraph, _removed: &UnionGraph) {}

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Counter(AtomicUsize);

    impl GraphListener for Counter {
        fn on_sub_graph_added(&self, _source: &UnionGraph, _added: &UnionGraph) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn on_sub_graph_removed(&self, _source: &UnionGraph, _removed: &UnionGraph) {}

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_notification_in_registration_order() {
        let log = Arc::new(RwLock::new(Vec::new()));
        let registry = ListenerRegistry::new();
        for tag in [1, 2, 3] {
            registry.register(Arc::new(Tagged {
                tag,
                log: log.clone(),
            }));
        }

        let graph = UnionGraph::new(BaseStore::new());
        registry.notify(|l| l.on_sub_graph_added(&graph, &graph));
        assert_eq!(*log.read(), vec![1, 2, 3]);
    }

    #[test]
    fn test_of_kind_filters_by_concrete_type() {
        let registry = ListenerRegistry::new();
        registry.register(Arc::new(Counter(AtomicUsize::new(0))));
        registry.register(Arc::new(Tagged {
            tag: 7,
            log: Arc::new(RwLock::new(Vec::new())),
        }));
        registry.register(Arc::new(Counter(AtomicUsize::new(0))));

        assert_eq!(registry.of_kind::<Counter>().len(), 2);
        assert_eq!(registry.of_kind::<Tagged>().len(), 1);
    }

    #[test]
    fn test_unregister_by_identity() {
        let registry = ListenerRegistry::new();
        let listener: Arc<dyn GraphListener> = Arc::new(Counter(AtomicUsize::new(0)));
        registry.register(listener.clone());
        // A second registration of the identical listener is kept; this
        // layer does not de-duplicate.
        registry.register(listener.clone());
        assert_eq!(registry.len(), 2);

        registry.unregister(&listener);
        assert_eq!(registry.len(), 0);
    }
}
