//! Collection-bound entries and the maps that hold them
//!
//! Every entry stores a weak reference to its collection plus the collection
//! id. Lookups upgrade the reference, so an entry whose collection was dropped
//! reads as absent even before a compaction pass removes it.

use std::hash::Hash;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;

use super::collection::{CollectionId, ModCollection};

/// A live association of some data with a collection
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The collection, shared with its owner
    pub collection: Arc<ModCollection>,
    /// Index-specific context
    pub data: T,
}

impl<T: PartialEq> PartialEq for Resolved<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.collection, &other.collection) && self.data == other.data
    }
}

impl<T: Eq> Eq for Resolved<T> {}

/// Stored form of [`Resolved`]
#[derive(Debug, Clone)]
pub(crate) struct Bound<T> {
    collection: Weak<ModCollection>,
    collection_id: CollectionId,
    data: T,
}

impl<T: Clone> Bound<T> {
    pub fn new(collection: &Arc<ModCollection>, data: T) -> Self {
        Self {
            collection: Arc::downgrade(collection),
            collection_id: collection.id(),
            data,
        }
    }

    pub fn resolve(&self) -> Option<Resolved<T>> {
        Some(Resolved {
            collection: self.collection.upgrade()?,
            data: self.data.clone(),
        })
    }

    pub fn names(&self, id: CollectionId) -> bool {
        self.collection_id == id
    }

    pub fn is_live(&self) -> bool {
        self.collection.strong_count() > 0
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

/// Unordered hash index, used for pure lookup tables
pub(crate) struct BoundMap<K, T> {
    map: DashMap<K, Bound<T>>,
}

impl<K: Eq + Hash + Clone, T: Clone> BoundMap<K, T> {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Insert or replace; returns `true` if an entry was replaced
    pub fn upsert(&self, key: K, collection: &Arc<ModCollection>, data: T) -> bool {
        self.map.insert(key, Bound::new(collection, data)).is_some()
    }

    pub fn lookup(&self, key: &K) -> Option<Resolved<T>> {
        self.map.get(key)?.resolve()
    }

    pub fn remove(&self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Keep entries matching `keep`; returns the number removed
    pub fn retain(&self, mut keep: impl FnMut(&K, &Bound<T>) -> bool) -> usize {
        let before = self.map.len();
        self.map.retain(|key, bound| keep(key, bound));
        before.saturating_sub(self.map.len())
    }

    pub fn remove_collection(&self, id: CollectionId) -> usize {
        self.retain(|_, bound| !bound.names(id))
    }

    pub fn compact(&self) -> usize {
        self.retain(|_, bound| bound.is_live())
    }

    pub fn snapshot(&self) -> Vec<(K, Resolved<T>)> {
        self.map
            .iter()
            .filter_map(|entry| Some((entry.key().clone(), entry.value().resolve()?)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn clear(&self) {
        self.map.clear();
    }
}

/// Insertion-ordered index, used where stable display order matters
pub(crate) struct OrderedBoundMap<K, T> {
    map: RwLock<IndexMap<K, Bound<T>>>,
}

impl<K: Eq + Hash + Clone, T: Clone> OrderedBoundMap<K, T> {
    pub fn new() -> Self {
        Self {
            map: RwLock::new(IndexMap::new()),
        }
    }

    /// Insert or replace; a replaced entry keeps its position
    pub fn upsert(&self, key: K, collection: &Arc<ModCollection>, data: T) -> bool {
        self.map
            .write()
            .insert(key, Bound::new(collection, data))
            .is_some()
    }

    pub fn lookup(&self, key: &K) -> Option<Resolved<T>> {
        self.map.read().get(key)?.resolve()
    }

    /// O(n): later entries shift down so enumeration order is preserved
    pub fn remove(&self, key: &K) -> bool {
        self.map.write().shift_remove(key).is_some()
    }

    pub fn retain(&self, mut keep: impl FnMut(&K, &Bound<T>) -> bool) -> usize {
        let mut map = self.map.write();
        let before = map.len();
        map.retain(|key, bound| keep(key, bound));
        before - map.len()
    }

    pub fn remove_collection(&self, id: CollectionId) -> usize {
        self.retain(|_, bound| !bound.names(id))
    }

    pub fn compact(&self) -> usize {
        self.retain(|_, bound| bound.is_live())
    }

    pub fn snapshot(&self) -> Vec<(K, Resolved<T>)> {
        self.map
            .read()
            .iter()
            .filter_map(|(key, bound)| Some((key.clone(), bound.resolve()?)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn clear(&self) {
        self.map.write().clear();
    }
}

/// A single optional association (e.g. "current material owner")
pub(crate) struct BoundSlot<T> {
    slot: RwLock<Option<Bound<T>>>,
}

impl<T: Clone> BoundSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub fn set(&self, collection: &Arc<ModCollection>, data: T) {
        *self.slot.write() = Some(Bound::new(collection, data));
    }

    pub fn get(&self) -> Option<Resolved<T>> {
        self.slot.read().as_ref()?.resolve()
    }

    pub fn clear(&self) -> bool {
        self.slot.write().take().is_some()
    }

    /// Clear the slot if it matches; returns `true` if cleared
    pub fn clear_if(&self, matches: impl FnOnce(&Bound<T>) -> bool) -> bool {
        let mut slot = self.slot.write();
        if slot.as_ref().is_some_and(matches) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
