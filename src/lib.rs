//! # ontograph
//!
//! Composite ontology graphs with listener-based hierarchy synchronization
//! and invalidation-gated derived views.
//!
//! An ontology is held as a [`UnionGraph`]: one exclusively owned base store
//! plus a set of referenced sub-graphs forming an acyclic import closure.
//! Two independently held graphs can be linked with [`graph::connect`] so
//! structural edits on either are mirrored onto the other, and an
//! [`cache::OntologyView`] keeps an expensive derived projection coherent by
//! clearing it whenever an observable mutation lands.
//!
//! ## Examples
//!
//! ```rust
//! use ontograph::{BaseStore, UnionGraph};
//! use ontograph::graph::connect;
//!
//! # fn main() -> ontograph::Result<()> {
//! let a = UnionGraph::new(BaseStore::new());
//! let b = UnionGraph::new(BaseStore::new());
//! connect(&a, &b);
//!
//! let import = UnionGraph::new(BaseStore::new());
//! a.add_sub_graph(&import)?;
//! assert_eq!(b.sub_graphs().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod graph;
pub mod io;
pub mod model;
pub mod store;
pub mod vocab;

// Re-export the core types for convenience
pub use graph::{same_base, GraphListener, UnionGraph};
pub use model::{Literal, NamedNode, Object, Triple};
pub use store::BaseStore;

/// Core error type for ontograph operations
#[derive(Debug, thiserror::Error)]
pub enum OntographError {
    #[error("Model error: {0}")]
    Model(String),
    #[error("Cyclic import: {0}")]
    CyclicImport(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ontograph operations
pub type Result<T> = std::result::Result<T, OntographError>;

/// Version information for ontograph
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize ontograph with default configuration
pub fn init() -> Result<()> {
    tracing::info!("Initializing ontograph v{}", VERSION);
    Ok(())
}
