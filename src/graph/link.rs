//! Bidirectional hierarchy synchronization between composite graphs
//!
//! A [`MirrorLink`] forwards structural mutations from the graph it is
//! registered on to a peer graph. [`connect`] installs one link per
//! direction and is idempotent; the idempotence of the link's membership
//! check plus [`UnionGraph::add_sub_graph`]'s duplicate guard keeps the
//! propagation from bouncing more than one extra hop per direction.

use crate::graph::events::GraphListener;
use crate::graph::union::{same_base, UnionGraph, WeakUnionGraph};
use crate::store::BaseStore;
use crate::Result;
use std::any::Any;
use std::sync::Arc;
use tracing::{trace, warn};

/// Listener that mirrors structural edits onto a linked peer
///
/// The peer is held weakly: a connected pair must not keep each other alive
/// through their own listener registries.
pub struct MirrorLink {
    peer: WeakUnionGraph,
}

impl MirrorLink {
    fn new(peer: &UnionGraph) -> Self {
        MirrorLink {
            peer: peer.downgrade(),
        }
    }

    fn peer(&self) -> Option<UnionGraph> {
        self.peer.upgrade()
    }

    /// Whether this link forwards to a graph over `base`
    fn forwards_to(&self, base: &BaseStore) -> bool {
        self.peer()
            .map(|peer| peer.base().same_store(base))
            .unwrap_or(false)
    }
}

impl GraphListener for MirrorLink {
    fn on_sub_graph_added(&self, _source: &UnionGraph, added: &UnionGraph) {
        let Some(peer) = self.peer() else {
            trace!("mirror peer dropped, ignoring add");
            return;
        };
        if peer.sub_graphs().iter().any(|m| same_base(m, added)) {
            return;
        }
        if let Err(err) = peer.add_sub_graph(added) {
            // The source-side guard vets mirrored peers before committing,
            // so this branch means the hierarchy changed underneath us.
            warn!("mirror add not applied, connected graphs may diverge: {err}");
        }
    }

    fn on_sub_graph_removed(&self, _source: &UnionGraph, removed: &UnionGraph) {
        let Some(peer) = self.peer() else {
            trace!("mirror peer dropped, ignoring remove");
            return;
        };
        // Absence on the peer is a normal already-removed outcome.
        peer.remove_sub_graph(removed);
    }

    fn linked_peer(&self) -> Option<UnionGraph> {
        self.peer()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Link `a` and `b` so structural edits on either are mirrored on the other
///
/// Re-connecting an already-connected pair is a no-op; exactly one
/// forwarding listener exists per direction afterwards.
pub fn connect(a: &UnionGraph, b: &UnionGraph) {
    link_one_way(a, b);
    link_one_way(b, a);
}

fn link_one_way(from: &UnionGraph, to: &UnionGraph) {
    let already_linked = from.listeners_of_kind::<MirrorLink>().iter().any(|l| {
        l.as_any()
            .downcast_ref::<MirrorLink>()
            .map(|link| link.forwards_to(to.base()))
            .unwrap_or(false)
    });
    if already_linked {
        trace!("link already present, skipping");
        return;
    }
    from.register_listener(Arc::new(MirrorLink::new(to)));
}

/// Rebase `union` onto `new_base`, keeping the hierarchy live
///
/// The returned graph wraps `new_base` with the same sub-graph membership
/// and the same listener set as `union`, and the two graphs are connected so
/// future structural edits to either are mirrored onto the other. Externally
/// held references to `union` keep seeing the shared hierarchy.
pub fn with_base(union: &UnionGraph, new_base: BaseStore) -> Result<UnionGraph> {
    let copy = UnionGraph::with_semantics(new_base, union.distinct());

    // Membership first: the copy has no listeners yet, so the initial fill
    // does not notify the inherited set.
    for member in union.sub_graphs() {
        copy.add_sub_graph(&member)?;
    }
    for listener in union.listeners() {
        copy.register_listener(listener);
    }

    connect(union, &copy);
    Ok(copy)
}
