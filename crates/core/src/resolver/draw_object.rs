//! Draw object → (collection, owning game object slot)
//!
//! Filled when the host builds a render representation for a game object and
//! cleared when that representation is destroyed. Enumerates in insertion
//! order.

use std::sync::Arc;

use tracing::{debug, trace};

use super::binding::{OrderedBoundMap, Resolved};
use super::collection::{CollectionId, ModCollection};
use super::handles::{DrawObjectAddress, ObjectIndex};
use super::inbox::Inbox;
use super::CacheIndexes;
use crate::events::HostEvent;

/// Collection and owning object slot of a draw object
pub type DrawObjectData = Resolved<ObjectIndex>;

impl DrawObjectData {
    /// Object table slot of the game object that owns the draw object
    pub fn object_index(&self) -> ObjectIndex {
        self.data
    }
}

/// Draw object index
pub struct DrawObjectIndex {
    map: OrderedBoundMap<DrawObjectAddress, ObjectIndex>,
    inbox: Inbox,
}

impl DrawObjectIndex {
    pub(crate) fn new(inbox: Inbox) -> Self {
        Self {
            map: OrderedBoundMap::new(),
            inbox,
        }
    }

    /// Apply pending host events
    pub fn sync(&self) -> usize {
        self.inbox.drain(|event| self.apply(event))
    }

    pub(crate) fn apply(&self, event: &HostEvent) {
        match *event {
            HostEvent::DrawObjectDestroyed(draw_object) => {
                self.map.remove(&draw_object);
            }
            HostEvent::CollectionRemoved(id) => {
                self.map.remove_collection(id);
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::DRAW_OBJECTS) => {
                self.map.clear();
            }
            _ => {}
        }
    }

    /// Associate a draw object with a collection and its owner's slot
    pub fn upsert(
        &self,
        draw_object: DrawObjectAddress,
        collection: &Arc<ModCollection>,
        object_index: ObjectIndex,
    ) {
        self.sync();
        let replaced = self.map.upsert(draw_object, collection, object_index);
        debug!(
            "Draw object {} -> {} (slot {}){}",
            draw_object,
            collection,
            object_index,
            if replaced { " [replaced]" } else { "" }
        );
    }

    pub fn lookup(&self, draw_object: DrawObjectAddress) -> Option<DrawObjectData> {
        self.sync();
        let found = self.map.lookup(&draw_object);
        trace!("Draw object lookup {}: hit={}", draw_object, found.is_some());
        found
    }

    pub fn remove(&self, draw_object: DrawObjectAddress) -> bool {
        self.sync();
        self.map.remove(&draw_object)
    }

    /// All live entries in insertion order
    pub fn snapshot(&self) -> Vec<(DrawObjectAddress, DrawObjectData)> {
        self.sync();
        self.map.snapshot()
    }

    pub fn len(&self) -> usize {
        self.sync();
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn remove_collection(&self, id: CollectionId) -> usize {
        self.map.remove_collection(id)
    }

    pub(crate) fn compact(&self) -> usize {
        self.map.compact()
    }

    pub(crate) fn clear(&self) {
        self.map.clear();
    }
}
