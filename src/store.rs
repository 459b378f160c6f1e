//! Base triple store with handle identity
//!
//! A [`BaseStore`] is the exclusively owned fact collection behind one
//! composite graph. Cloning a `BaseStore` clones the handle, not the data:
//! two clones refer to the identical underlying store, which is what the
//! identity predicate [`BaseStore::same_store`] tests. Content equality is
//! never used for identity; two distinct empty stores are distinct.

use crate::model::Triple;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A mutable, enumerable, identity-comparable triple collection
#[derive(Debug, Clone, Default)]
pub struct BaseStore {
    triples: Arc<RwLock<BTreeSet<Triple>>>,
}

impl BaseStore {
    /// Create a new empty store with a fresh identity
    pub fn new() -> Self {
        BaseStore {
            triples: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    /// Create a store from an iterator of triples
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = Triple>,
    {
        BaseStore {
            triples: Arc::new(RwLock::new(triples.into_iter().collect())),
        }
    }

    /// Insert a triple, returning true if it was not already present
    pub fn insert(&self, triple: Triple) -> bool {
        self.triples.write().insert(triple)
    }

    /// Remove a triple, returning true if it was present
    pub fn remove(&self, triple: &Triple) -> bool {
        self.triples.write().remove(triple)
    }

    /// Check membership
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.read().contains(triple)
    }

    /// Snapshot of the current content, in term order
    pub fn triples(&self) -> Vec<Triple> {
        self.triples.read().iter().cloned().collect()
    }

    /// Number of triples held
    pub fn len(&self) -> usize {
        self.triples.read().len()
    }

    /// Check if the store holds no triples
    pub fn is_empty(&self) -> bool {
        self.triples.read().is_empty()
    }

    /// Remove all triples
    pub fn clear(&self) {
        self.triples.write().clear()
    }

    /// True iff `self` and `other` are handles to the identical store
    pub fn same_store(&self, other: &BaseStore) -> bool {
        Arc::ptr_eq(&self.triples, &other.triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(n: &str) -> Triple {
        Triple::from_iris("urn:s", "urn:p", n).unwrap()
    }

    #[test]
    fn test_insert_remove_contains() {
        let store = BaseStore::new();
        assert!(store.insert(triple("urn:a")));
        assert!(!store.insert(triple("urn:a")));
        assert!(store.contains(&triple("urn:a")));
        assert_eq!(store.len(), 1);

        assert!(store.remove(&triple("urn:a")));
        assert!(!store.remove(&triple("urn:a")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_shares_identity_and_content() {
        let store = BaseStore::new();
        let alias = store.clone();
        assert!(store.same_store(&alias));

        alias.insert(triple("urn:a"));
        assert!(store.contains(&triple("urn:a")));
    }

    #[test]
    fn test_distinct_empty_stores_are_not_same() {
        // Identity, not content equality.
        let a = BaseStore::new();
        let b = BaseStore::new();
        assert!(!a.same_store(&b));
    }
}
