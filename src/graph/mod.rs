//! Composite graph hierarchy: union graphs, mutation events, mirroring

pub mod events;
pub mod link;
pub mod union;

pub use events::GraphListener;
pub use link::{connect, with_base, MirrorLink};
pub use union::{same_base, UnionGraph, WeakUnionGraph};
