//! Game path → (collection, requesting game object)
//!
//! Filled by load interception once a path has been attributed to a
//! collection, so repeated requests for the same path skip identification.

use std::sync::Arc;

use mirage_sdk::GamePath;
use tracing::trace;

use super::binding::{BoundMap, Resolved};
use super::collection::{CollectionId, ModCollection};
use super::handles::GameObjectAddress;
use super::inbox::Inbox;
use super::CacheIndexes;
use crate::events::HostEvent;

/// Collection and associated game object of a load
pub type ResolveData = Resolved<GameObjectAddress>;

impl ResolveData {
    /// Game object on whose behalf the load happened
    pub fn associated_game_object(&self) -> GameObjectAddress {
        self.data
    }
}

/// Path collection index
pub struct PathCollectionIndex {
    map: BoundMap<GamePath, GameObjectAddress>,
    inbox: Inbox,
}

impl PathCollectionIndex {
    pub(crate) fn new(inbox: Inbox) -> Self {
        Self {
            map: BoundMap::new(),
            inbox,
        }
    }

    /// Apply pending host events
    pub fn sync(&self) -> usize {
        self.inbox.drain(|event| self.apply(event))
    }

    pub(crate) fn apply(&self, event: &HostEvent) {
        match *event {
            HostEvent::GameObjectDestroyed(game_object) => {
                self.remove_game_object(game_object);
            }
            // Paths were attributed through collection assignment
            HostEvent::CollectionRemoved(id) | HostEvent::CollectionChanged(id) => {
                self.map.remove_collection(id);
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::PATHS) => {
                self.map.clear();
            }
            _ => {}
        }
    }

    /// Attribute a path to a collection; the empty path is ignored
    pub fn upsert(&self, path: GamePath, collection: &Arc<ModCollection>, game_object: GameObjectAddress) {
        if path.is_empty() {
            return;
        }
        self.sync();
        trace!("Path {} -> {} ({})", path, collection, game_object);
        self.map.upsert(path, collection, game_object);
    }

    pub fn lookup(&self, path: &GamePath) -> Option<ResolveData> {
        self.sync();
        self.map.lookup(path)
    }

    pub fn remove(&self, path: &GamePath) -> bool {
        self.sync();
        self.map.remove(path)
    }

    /// All live entries, in no particular order
    pub fn snapshot(&self) -> Vec<(GamePath, ResolveData)> {
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

    /// Drop every path requested on behalf of a game object
    pub(crate) fn remove_game_object(&self, game_object: GameObjectAddress) -> usize {
        self.map.retain(|_, bound| *bound.data() != game_object)
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
