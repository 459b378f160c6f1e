//! Invalidation-gated cache for derived graph projections
//!
//! Building the derived representation of an ontology graph is expensive, so
//! it is computed lazily and kept until a mutation the owner can observe
//! lands. The [`CacheInvalidator`] listener clears the cache on every
//! structural or content event; mutations made through an independent view
//! over the same base store are invisible here, and callers are expected to
//! call [`OntologyView::clear_cache`] themselves in that case.

use crate::graph::events::GraphListener;
use crate::graph::union::UnionGraph;
use crate::model::Triple;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Builder of the derived representation
///
/// Must be a pure function of the content handed to it. Content arrives as a
/// sorted, deduplicated snapshot, so the result is independent of the order
/// in which mutations produced it.
pub trait DerivedView: Send + Sync {
    type Value: Clone + Send + Sync;

    fn derive(&self, content: &[Triple]) -> Self::Value;
}

/// Anything that can be told its held value is stale
pub trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

/// A derived value gated by a validity flag
///
/// `clear` drops the value; the next read recomputes. Repeated clears
/// without an intervening read are idempotent and trigger no work.
pub struct InvalidationCache<V> {
    slot: Mutex<Option<V>>,
}

impl<V: Clone> InvalidationCache<V> {
    pub fn new() -> Self {
        InvalidationCache {
            slot: Mutex::new(None),
        }
    }

    /// Force the validity flag off
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    pub fn is_valid(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Return the held value, computing it first if the cache is invalid
    pub fn get_or_compute(&self, compute: impl FnOnce() -> V) -> V {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(value) => value.clone(),
            None => {
                trace!("cache miss, recomputing derived value");
                let value = compute();
                *slot = Some(value.clone());
                value
            }
        }
    }
}

impl<V: Clone> Default for InvalidationCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> Invalidate for InvalidationCache<V> {
    fn invalidate(&self) {
        self.clear();
    }
}

/// Listener that clears a cache on any observed mutation
pub struct CacheInvalidator {
    target: Arc<dyn Invalidate>,
}

impl CacheInvalidator {
    pub fn new(target: Arc<dyn Invalidate>) -> Self {
        CacheInvalidator { target }
    }
}

impl GraphListener for CacheInvalidator {
    fn on_sub_graph_added(&self, _source: &UnionGraph, _added: &UnionGraph) {
        debug!("structural add observed, invalidating derived cache");
        self.target.invalidate();
    }

    fn on_sub_graph_removed(&self, _source: &UnionGraph, _removed: &UnionGraph) {
        debug!("structural remove observed, invalidating derived cache");
        self.target.invalidate();
    }

    fn on_triple_added(&self, _source: &UnionGraph, _triple: &Triple) {
        self.target.invalidate();
    }

    fn on_triple_removed(&self, _source: &UnionGraph, _triple: &Triple) {
        self.target.invalidate();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Facade owning one composite graph and one derived-value cache
///
/// Mutations made through this facade (or observed by its listener on the
/// graph) invalidate the cache automatically. Mutations through a second,
/// independent view over the same base store cannot be observed; callers
/// holding such a view must call [`OntologyView::clear_cache`] after writing
/// through it, or reads here will serve stale derived data.
pub struct OntologyView<D: DerivedView> {
    graph: UnionGraph,
    builder: D,
    cache: Arc<InvalidationCache<D::Value>>,
}

impl<D: DerivedView> OntologyView<D>
where
    D::Value: 'static,
{
    pub fn new(graph: UnionGraph, builder: D) -> Self {
        let cache = Arc::new(InvalidationCache::new());
        graph.register_listener(Arc::new(CacheInvalidator::new(cache.clone())));
        OntologyView {
            graph,
            builder,
            cache,
        }
    }

    pub fn graph(&self) -> &UnionGraph {
        &self.graph
    }

    /// Force recomputation on the next read
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_valid(&self) -> bool {
        self.cache.is_valid()
    }

    /// The derived value, recomputed lazily when invalid
    pub fn derived(&self) -> D::Value {
        self.cache
            .get_or_compute(|| self.builder.derive(&self.content_snapshot()))
    }

    /// Sorted, deduplicated snapshot of the merged graph content
    fn content_snapshot(&self) -> Vec<Triple> {
        let set: BTreeSet<Triple> = self.graph.triples().into_iter().collect();
        set.into_iter().collect()
    }

    /// Insert a triple through the facade; the cache invalidates via the
    /// registered listener
    pub fn add_triple(&self, triple: Triple) -> bool {
        self.graph.add_triple(triple)
    }

    /// Remove a triple through the facade
    pub fn remove_triple(&self, triple: &Triple) -> bool {
        self.graph.remove_triple(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BaseStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Concatenates object IRIs; counts how often it ran.
    struct ObjectList {
        runs: Arc<AtomicUsize>,
    }

    impl DerivedView for ObjectList {
        type Value = Vec<String>;

        fn derive(&self, content: &[Triple]) -> Vec<String> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            content.iter().map(|t| t.object().to_string()).collect()
        }
    }

    fn view() -> (OntologyView<ObjectList>, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let builder = ObjectList { runs: runs.clone() };
        let view = OntologyView::new(UnionGraph::new(BaseStore::new()), builder);
        (view, runs)
    }

    fn triple(o: &str) -> Triple {
        Triple::from_iris("urn:s", "urn:p", o).unwrap()
    }

    #[test]
    fn test_lazy_recompute_on_read() {
        let (view, runs) = view();
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        view.derived();
        view.derived();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_is_idempotent_without_read() {
        let (view, runs) = view();
        view.derived();
        view.clear_cache();
        view.clear_cache();
        view.clear_cache();
        // No recomputation until the next actual read.
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        view.derived();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_content_mutation_invalidates() {
        let (view, runs) = view();
        view.derived();
        assert!(view.cache_valid());

        view.add_triple(triple("urn:a"));
        assert!(!view.cache_valid());
        assert_eq!(view.derived(), vec!["<urn:a>".to_string()]);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_op_mutation_keeps_cache() {
        let (view, _runs) = view();
        view.add_triple(triple("urn:a"));
        view.derived();

        // Inserting a triple that is already present changes nothing and
        // fires no event.
        view.add_triple(triple("urn:a"));
        assert!(view.cache_valid());
    }

    #[test]
    fn test_structural_mutation_invalidates() {
        let (view, _runs) = view();
        view.derived();

        let import = UnionGraph::new(BaseStore::new());
        import.add_triple(triple("urn:imported"));
        view.graph().add_sub_graph(&import).unwrap();
        assert!(!view.cache_valid());
        assert_eq!(view.derived(), vec!["<urn:imported>".to_string()]);

        view.graph().remove_sub_graph(&import);
        assert!(!view.cache_valid());
        assert!(view.derived().is_empty());
    }

    #[test]
    fn test_derived_value_is_order_independent() {
        let (first, _) = view();
        first.add_triple(triple("urn:x"));
        first.add_triple(triple("urn:y"));

        let (second, _) = view();
        second.add_triple(triple("urn:y"));
        second.add_triple(triple("urn:x"));

        assert_eq!(first.derived(), second.derived());
    }

    #[test]
    fn test_out_of_band_mutation_needs_manual_clear() {
        let shared = BaseStore::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let view = OntologyView::new(
            UnionGraph::new(shared.clone()),
            ObjectList { runs },
        );
        view.derived();

        // A write through the bare store handle bypasses the facade.
        shared.insert(triple("urn:hidden"));
        assert!(view.cache_valid());
        assert!(view.derived().is_empty());

        view.clear_cache();
        assert_eq!(view.derived(), vec!["<urn:hidden>".to_string()]);
    }
}
