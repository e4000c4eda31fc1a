//! Event payloads

use std::fmt;

use crate::resolver::{
    CacheIndexes, CollectionId, DrawObjectAddress, GameObjectAddress, ObjectIndex, ResourceHandle,
};

/// A lifecycle notification from the host or the collection manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A render representation was destroyed
    DrawObjectDestroyed(DrawObjectAddress),

    /// The host released a loaded resource
    ResourceReleased(ResourceHandle),

    /// The address now names a different actor (object table slot reused)
    GameObjectChanged(GameObjectAddress),

    /// The game object was destroyed
    GameObjectDestroyed(GameObjectAddress),

    /// A cutscene actor left its slot
    CutsceneActorRemoved(ObjectIndex),

    /// A collection was deleted
    CollectionRemoved(CollectionId),

    /// A collection's contents or assignments changed
    CollectionChanged(CollectionId),

    /// Drop everything in the selected indexes
    Reset(CacheIndexes),
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::DrawObjectDestroyed(addr) => write!(f, "draw object {} destroyed", addr),
            HostEvent::ResourceReleased(handle) => write!(f, "resource {} released", handle),
            HostEvent::GameObjectChanged(addr) => write!(f, "game object {} changed", addr),
            HostEvent::GameObjectDestroyed(addr) => write!(f, "game object {} destroyed", addr),
            HostEvent::CutsceneActorRemoved(index) => {
                write!(f, "cutscene actor {} removed", index)
            }
            HostEvent::CollectionRemoved(id) => write!(f, "collection {} removed", id),
            HostEvent::CollectionChanged(id) => write!(f, "collection {} changed", id),
            HostEvent::Reset(indexes) => write!(f, "reset {:?}", indexes),
        }
    }
}
