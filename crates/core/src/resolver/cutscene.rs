//! Cutscene slot → actor identity
//!
//! Cutscene actors live outside the enumerable part of the object table, so
//! their identities are recorded here as the host spawns them.

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::handles::{ActorIdentifier, ObjectIndex};
use super::inbox::Inbox;
use super::CacheIndexes;
use crate::events::HostEvent;

/// Cutscene actor index, enumerated in insertion order
pub struct CutsceneActorIndex {
    actors: RwLock<IndexMap<ObjectIndex, ActorIdentifier>>,
    inbox: Inbox,
}

impl CutsceneActorIndex {
    pub(crate) fn new(inbox: Inbox) -> Self {
        Self {
            actors: RwLock::new(IndexMap::new()),
            inbox,
        }
    }

    /// Apply pending host events
    pub fn sync(&self) -> usize {
        self.inbox.drain(|event| self.apply(event))
    }

    pub(crate) fn apply(&self, event: &HostEvent) {
        match *event {
            HostEvent::CutsceneActorRemoved(index) => {
                self.actors.write().shift_remove(&index);
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::CUTSCENE) => self.clear(),
            _ => {}
        }
    }

    /// Record the actor occupying a cutscene slot
    ///
    /// Returns `false` and stores nothing if `index` is outside the cutscene
    /// range.
    pub fn upsert(&self, index: ObjectIndex, actor: ActorIdentifier) -> bool {
        if !index.is_cutscene() {
            warn!("Ignoring cutscene actor {} at non-cutscene slot {}", actor, index);
            return false;
        }
        self.sync();
        debug!("Cutscene slot {} -> {}", index, actor);
        self.actors.write().insert(index, actor);
        true
    }

    pub fn lookup(&self, index: ObjectIndex) -> Option<ActorIdentifier> {
        self.sync();
        self.actors.read().get(&index).cloned()
    }

    /// Forget a slot; O(n) as later slots shift down to keep display order
    pub fn remove(&self, index: ObjectIndex) -> bool {
        self.sync();
        self.actors.write().shift_remove(&index).is_some()
    }

    pub fn snapshot(&self) -> Vec<(ObjectIndex, ActorIdentifier)> {
        self.sync();
        self.actors
            .read()
            .iter()
            .map(|(index, actor)| (*index, actor.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sync();
        self.actors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&self) {
        self.actors.write().clear();
    }
}
