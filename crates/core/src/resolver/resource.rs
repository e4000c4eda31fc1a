//! Resource handle → (collection, originating game object)
//!
//! One entry per currently loaded resource. Also tracks which load context
//! is active while the host parses a material or an effect file, so that
//! sub-file requests issued from inside that parse resolve against the same
//! collection as their parent.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::binding::{BoundMap, BoundSlot};
use super::collection::{CollectionId, ModCollection};
use super::handles::{GameObjectAddress, ResourceHandle};
use super::inbox::Inbox;
use super::path::ResolveData;
use super::CacheIndexes;
use crate::events::HostEvent;

/// Kinds of resource whose parse issues nested loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubfileKind {
    /// Material, loads textures and shader packages
    Material,
    /// Visual effect, loads textures and models
    Avfx,
}

impl fmt::Display for SubfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubfileKind::Material => f.write_str("mtrl"),
            SubfileKind::Avfx => f.write_str("avfx"),
        }
    }
}

/// Resource collection index
pub struct ResourceCollectionIndex {
    map: BoundMap<ResourceHandle, GameObjectAddress>,
    current_mtrl: BoundSlot<GameObjectAddress>,
    current_avfx: BoundSlot<GameObjectAddress>,
    inbox: Inbox,
}

impl ResourceCollectionIndex {
    pub(crate) fn new(inbox: Inbox) -> Self {
        Self {
            map: BoundMap::new(),
            current_mtrl: BoundSlot::new(),
            current_avfx: BoundSlot::new(),
            inbox,
        }
    }

    /// Apply pending host events
    pub fn sync(&self) -> usize {
        self.inbox.drain(|event| self.apply(event))
    }

    pub(crate) fn apply(&self, event: &HostEvent) {
        match *event {
            HostEvent::ResourceReleased(resource) => {
                self.map.remove(&resource);
            }
            HostEvent::GameObjectDestroyed(game_object) => self.forget_game_object(game_object),
            HostEvent::CollectionRemoved(id) => {
                self.remove_collection(id);
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::RESOURCES) => self.clear(),
            _ => {}
        }
    }

    pub fn upsert(
        &self,
        resource: ResourceHandle,
        collection: &Arc<ModCollection>,
        game_object: GameObjectAddress,
    ) {
        self.sync();
        trace!("Resource {} -> {} ({})", resource, collection, game_object);
        self.map.upsert(resource, collection, game_object);
    }

    pub fn lookup(&self, resource: ResourceHandle) -> Option<ResolveData> {
        self.sync();
        self.map.lookup(&resource)
    }

    /// Forget a released resource
    pub fn remove(&self, resource: ResourceHandle) -> bool {
        self.sync();
        self.map.remove(&resource)
    }

    pub fn snapshot(&self) -> Vec<(ResourceHandle, ResolveData)> {
        self.sync();
        self.map.snapshot()
    }

    /// Number of tracked resources
    pub fn len(&self) -> usize {
        self.sync();
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, kind: SubfileKind) -> &BoundSlot<GameObjectAddress> {
        match kind {
            SubfileKind::Material => &self.current_mtrl,
            SubfileKind::Avfx => &self.current_avfx,
        }
    }

    /// Enter a sub-file parse context
    pub fn set_current(
        &self,
        kind: SubfileKind,
        collection: &Arc<ModCollection>,
        game_object: GameObjectAddress,
    ) {
        self.sync();
        debug!("Current {} context -> {} ({})", kind, collection, game_object);
        self.slot(kind).set(collection, game_object);
    }

    /// Active sub-file parse context, if any
    pub fn current(&self, kind: SubfileKind) -> Option<ResolveData> {
        self.sync();
        self.slot(kind).get()
    }

    /// Leave a sub-file parse context; returns `true` if one was active
    pub fn clear_current(&self, kind: SubfileKind) -> bool {
        self.sync();
        self.slot(kind).clear()
    }

    pub(crate) fn forget_game_object(&self, game_object: GameObjectAddress) {
        for kind in [SubfileKind::Material, SubfileKind::Avfx] {
            self.slot(kind).clear_if(|bound| *bound.data() == game_object);
        }
    }

    pub(crate) fn remove_collection(&self, id: CollectionId) -> usize {
        let mut removed = self.map.remove_collection(id);
        for kind in [SubfileKind::Material, SubfileKind::Avfx] {
            if self.slot(kind).clear_if(|bound| bound.names(id)) {
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn compact(&self) -> usize {
        let mut removed = self.map.compact();
        for kind in [SubfileKind::Material, SubfileKind::Avfx] {
            if self.slot(kind).clear_if(|bound| !bound.is_live()) {
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn clear(&self) {
        self.map.clear();
        self.current_mtrl.clear();
        self.current_avfx.clear();
    }
}
