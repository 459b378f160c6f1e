//! Composite graph over one base store plus imported sub-graphs
//!
//! A [`UnionGraph`] owns exactly one [`BaseStore`] and references a set of
//! other union graphs forming its import closure. The membership set is a
//! rooted DAG: self-edges and duplicate edges are silent no-ops, multi-hop
//! cycles are rejected with [`OntographError::CyclicImport`]. Sub-graphs are
//! referenced, never owned; a sub-graph may be shared by many composites and
//! outlives removal from any one of them.
//!
//! All mutation and notification is synchronous call-and-return on the
//! caller's thread. The internal locks protect individual registries only
//! and are never held across listener dispatch; they do not make the
//! composite view safe under concurrent mutation. Callers mutating a
//! hierarchy from several threads must serialize on the graph they mutate;
//! a lock held on some other facade wrapping the same store serializes
//! nothing here.

use crate::graph::events::{GraphListener, ListenerRegistry};
use crate::model::Triple;
use crate::store::BaseStore;
use crate::{OntographError, Result};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

struct GraphInner {
    base: BaseStore,
    distinct: bool,
    sub_graphs: RwLock<Vec<UnionGraph>>,
    listeners: ListenerRegistry,
}

/// Refcounted handle to a composite graph node
///
/// Cloning the handle shares the node. Handle identity is distinct from base
/// identity: two different `UnionGraph`s may wrap the same base store, which
/// is exactly what [`same_base`] sees through.
#[derive(Clone)]
pub struct UnionGraph {
    inner: Arc<GraphInner>,
}

/// Non-owning handle, used where a strong reference would form a cycle
#[derive(Clone)]
pub struct WeakUnionGraph {
    inner: Weak<GraphInner>,
}

impl WeakUnionGraph {
    pub fn upgrade(&self) -> Option<UnionGraph> {
        self.inner.upgrade().map(|inner| UnionGraph { inner })
    }
}

impl UnionGraph {
    /// Create a composite graph over `base` with deduplicating reads
    pub fn new(base: BaseStore) -> Self {
        Self::with_semantics(base, true)
    }

    /// Create a composite graph, choosing whether merged reads deduplicate
    /// content repeated across members
    pub fn with_semantics(base: BaseStore, distinct: bool) -> Self {
        UnionGraph {
            inner: Arc::new(GraphInner {
                base,
                distinct,
                sub_graphs: RwLock::new(Vec::new()),
                listeners: ListenerRegistry::new(),
            }),
        }
    }

    /// The exclusively owned base store
    pub fn base(&self) -> &BaseStore {
        &self.inner.base
    }

    /// Whether merged reads suppress duplicates across members
    pub fn distinct(&self) -> bool {
        self.inner.distinct
    }

    /// True iff `other` is the identical graph node
    pub fn same_graph(&self, other: &UnionGraph) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakUnionGraph {
        WeakUnionGraph {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Insert `g` into the membership set
    ///
    /// Inserting a graph over this graph's own base, or over a base some
    /// member already wraps, is a no-op returning `Ok(false)`. Inserting a
    /// graph whose transitive closure reaches back to this graph's base is
    /// rejected with [`OntographError::CyclicImport`]. Both guards extend to
    /// every graph mirroring this one: an insert a forwarding listener could
    /// not apply on its peer is refused here, before anything commits, so a
    /// connected pair never diverges. On a real insert a structural-add
    /// event fires before this call returns.
    pub fn add_sub_graph(&self, g: &UnionGraph) -> Result<bool> {
        let component = self.mirror_component();
        if component
            .iter()
            .any(|graph| g.base().same_store(graph.base()))
        {
            trace!("skipping self-edge insert");
            return Ok(false);
        }
        if self
            .sub_graphs()
            .iter()
            .any(|member| same_base(member, g))
        {
            trace!("skipping duplicate edge insert");
            return Ok(false);
        }
        if g.sub_graphs().iter().any(|member| {
            component
                .iter()
                .any(|graph| member.reaches_base(graph.base()))
        }) {
            return Err(OntographError::CyclicImport(
                "sub-graph transitively imports the base of this graph or a mirrored peer"
                    .to_string(),
            ));
        }

        {
            let mut members = self.inner.sub_graphs.write();
            if members.iter().any(|member| same_base(member, g)) {
                return Ok(false);
            }
            members.push(g.clone());
        }

        debug!("sub-graph added, notifying listeners");
        self.inner
            .listeners
            .notify(|l| l.on_sub_graph_added(self, g));
        Ok(true)
    }

    /// Remove the first member wrapping the same base as `g`
    ///
    /// Matching is by base identity, so removal succeeds when the caller
    /// holds a different composite wrapping the same store. A missing target
    /// is not an error; the removal is already satisfied and `false` is
    /// returned without firing an event.
    pub fn remove_sub_graph(&self, g: &UnionGraph) -> bool {
        let removed = {
            let mut members = self.inner.sub_graphs.write();
            match members.iter().position(|member| same_base(member, g)) {
                Some(index) => Some(members.remove(index)),
                None => None,
            }
        };

        match removed {
            Some(member) => {
                debug!("sub-graph removed, notifying listeners");
                self.inner
                    .listeners
                    .notify(|l| l.on_sub_graph_removed(self, &member));
                true
            }
            None => false,
        }
    }

    /// Snapshot of the current membership, in insertion order
    pub fn sub_graphs(&self) -> Vec<UnionGraph> {
        self.inner.sub_graphs.read().clone()
    }

    /// Number of direct members
    pub fn sub_graph_count(&self) -> usize {
        self.inner.sub_graphs.read().len()
    }

    /// True iff `base` is this graph's base or reachable through members
    pub fn reaches_base(&self, base: &BaseStore) -> bool {
        if self.base().same_store(base) {
            return true;
        }
        self.sub_graphs()
            .iter()
            .any(|member| member.reaches_base(base))
    }

    /// This graph plus every graph reachable through forwarding listeners
    fn mirror_component(&self) -> Vec<UnionGraph> {
        let mut component = vec![self.clone()];
        let mut index = 0;
        while index < component.len() {
            let current = component[index].clone();
            index += 1;
            for listener in current.listeners() {
                if let Some(peer) = listener.linked_peer() {
                    if !component.iter().any(|graph| graph.same_graph(&peer)) {
                        component.push(peer);
                    }
                }
            }
        }
        component
    }

    /// Insert a triple into the base store, firing a content event when the
    /// store actually changed
    pub fn add_triple(&self, triple: Triple) -> bool {
        let inserted = self.inner.base.insert(triple.clone());
        if inserted {
            self.inner
                .listeners
                .notify(|l| l.on_triple_added(self, &triple));
        }
        inserted
    }

    /// Remove a triple from the base store, firing a content event when the
    /// store actually changed
    pub fn remove_triple(&self, triple: &Triple) -> bool {
        let removed = self.inner.base.remove(triple);
        if removed {
            self.inner
                .listeners
                .notify(|l| l.on_triple_removed(self, triple));
        }
        removed
    }

    /// Merged content of base plus all members, recursively
    ///
    /// With distinct semantics duplicates across members are suppressed and
    /// the result is in term order; otherwise members contribute in
    /// membership order, duplicates included.
    pub fn triples(&self) -> Vec<Triple> {
        if self.inner.distinct {
            let mut set = BTreeSet::new();
            self.collect_into_set(&mut set);
            set.into_iter().collect()
        } else {
            let mut out = Vec::new();
            self.collect_into_vec(&mut out);
            out
        }
    }

    fn collect_into_set(&self, out: &mut BTreeSet<Triple>) {
        out.extend(self.inner.base.triples());
        for member in self.sub_graphs() {
            member.collect_into_set(out);
        }
    }

    fn collect_into_vec(&self, out: &mut Vec<Triple>) {
        out.extend(self.inner.base.triples());
        for member in self.sub_graphs() {
            member.collect_into_vec(out);
        }
    }

    /// Membership test across base and all members
    pub fn contains_triple(&self, triple: &Triple) -> bool {
        self.inner.base.contains(triple)
            || self
                .sub_graphs()
                .iter()
                .any(|member| member.contains_triple(triple))
    }

    /// Merged triple count, honoring the distinct flag
    ///
    /// With distinct semantics this is the size of the deduplicated merge;
    /// without it, content repeated across members is counted once per
    /// occurrence.
    pub fn len(&self) -> usize {
        if self.inner.distinct {
            self.triples().len()
        } else {
            self.raw_len()
        }
    }

    fn raw_len(&self) -> usize {
        self.inner.base.len()
            + self
                .sub_graphs()
                .iter()
                .map(|member| member.raw_len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.base.is_empty()
            && self.sub_graphs().iter().all(|member| member.is_empty())
    }

    /// Append a listener; notification order is registration order
    pub fn register_listener(&self, listener: Arc<dyn GraphListener>) {
        self.inner.listeners.register(listener);
    }

    /// Remove a listener by pointer identity
    pub fn unregister_listener(&self, listener: &Arc<dyn GraphListener>) {
        self.inner.listeners.unregister(listener);
    }

    /// Registered listeners whose concrete type is `T`
    pub fn listeners_of_kind<T: 'static>(&self) -> Vec<Arc<dyn GraphListener>> {
        self.inner.listeners.of_kind::<T>()
    }

    /// All registered listeners, in registration order
    pub fn listeners(&self) -> Vec<Arc<dyn GraphListener>> {
        self.inner.listeners.all()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl std::fmt::Debug for UnionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionGraph")
            .field("distinct", &self.inner.distinct)
            .field("base_len", &self.inner.base.len())
            .field("sub_graphs", &self.sub_graph_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// True iff `a` and `b` wrap the identical underlying base store
///
/// This is the one identity predicate used for duplicate detection and
/// match-by-base removal. It sees through composite wrapping and is
/// symmetric and transitive; content equality plays no part.
pub fn same_base(a: &UnionGraph, b: &UnionGraph) -> bool {
    a.base().same_store(b.base())
}
