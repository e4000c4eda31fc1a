//! Memoized actor identification
//!
//! Identifying the actor behind a game object address and picking its
//! collection is expensive, so results are cached per address. The cache is
//! only correct as long as the address keeps naming the same actor: when the
//! host reuses an object table slot, [`HostEvent::GameObjectChanged`] must be
//! published so the entry is dropped before the next lookup.
//!
//! [`HostEvent::GameObjectChanged`]: crate::events::HostEvent::GameObjectChanged
//!
//! # Example
//!
//! ```ignore
//! let data = cache.identified().get_or_identify(address, &|addr| {
//!     let actor = actors.resolve(addr)?;
//!     Some((actor.clone(), collections.for_actor(&actor)))
//! });
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use super::binding::{BoundMap, Resolved};
use super::collection::{CollectionId, ModCollection};
use super::handles::{ActorIdentifier, GameObjectAddress};
use super::inbox::Inbox;
use super::CacheIndexes;
use crate::events::HostEvent;

/// Identity and collection of a game object
pub type IdentifiedData = Resolved<ActorIdentifier>;

impl IdentifiedData {
    pub fn actor(&self) -> &ActorIdentifier {
        &self.data
    }
}

/// Resolves a game object address to an actor and its collection
pub trait IdentityResolver {
    fn identify(&self, game_object: GameObjectAddress)
        -> Option<(ActorIdentifier, Arc<ModCollection>)>;
}

impl<F> IdentityResolver for F
where
    F: Fn(GameObjectAddress) -> Option<(ActorIdentifier, Arc<ModCollection>)>,
{
    fn identify(
        &self,
        game_object: GameObjectAddress,
    ) -> Option<(ActorIdentifier, Arc<ModCollection>)> {
        self(game_object)
    }
}

/// Identified-entity cache
pub struct IdentifiedCache {
    map: BoundMap<GameObjectAddress, ActorIdentifier>,
    enabled: bool,
    inbox: Inbox,
}

impl IdentifiedCache {
    pub(crate) fn new(enabled: bool, inbox: Inbox) -> Self {
        Self {
            map: BoundMap::new(),
            enabled,
            inbox,
        }
    }

    /// Apply pending host events
    pub fn sync(&self) -> usize {
        self.inbox.drain(|event| self.apply(event))
    }

    pub(crate) fn apply(&self, event: &HostEvent) {
        match *event {
            HostEvent::GameObjectChanged(game_object) | HostEvent::GameObjectDestroyed(game_object) => {
                self.map.remove(&game_object);
            }
            // Collection choice depends on assignment
            HostEvent::CollectionRemoved(id) | HostEvent::CollectionChanged(id) => {
                self.map.remove_collection(id);
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::IDENTIFIED) => {
                self.map.clear();
            }
            _ => {}
        }
    }

    /// Whether [`get_or_identify`](Self::get_or_identify) stores its results
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn upsert(
        &self,
        game_object: GameObjectAddress,
        actor: ActorIdentifier,
        collection: &Arc<ModCollection>,
    ) {
        self.sync();
        self.store(game_object, actor, collection);
    }

    fn store(&self, game_object: GameObjectAddress, actor: ActorIdentifier, collection: &Arc<ModCollection>) {
        debug!("Identified {} as {} -> {}", game_object, actor, collection);
        self.map.upsert(game_object, collection, actor);
    }

    pub fn lookup(&self, game_object: GameObjectAddress) -> Option<IdentifiedData> {
        self.sync();
        self.map.lookup(&game_object)
    }

    pub fn remove(&self, game_object: GameObjectAddress) -> bool {
        self.sync();
        self.map.remove(&game_object)
    }

    /// Cached identity, or ask `resolver` and remember the answer
    ///
    /// The resolver is called without any index lock held, so it may itself
    /// read the cache.
    pub fn get_or_identify<R>(&self, game_object: GameObjectAddress, resolver: &R) -> Option<IdentifiedData>
    where
        R: IdentityResolver + ?Sized,
    {
        self.sync();
        if let Some(hit) = self.map.lookup(&game_object) {
            trace!("Identified cache hit for {}", game_object);
            return Some(hit);
        }

        let (actor, collection) = resolver.identify(game_object)?;
        if self.enabled {
            self.store(game_object, actor.clone(), &collection);
        }
        Some(Resolved {
            collection,
            data: actor,
        })
    }

    pub fn snapshot(&self) -> Vec<(GameObjectAddress, IdentifiedData)> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn player(name: &str) -> ActorIdentifier {
        ActorIdentifier::Player {
            name: name.to_string(),
            home_world: 40,
        }
    }

    #[test]
    fn test_memoizes_resolver() {
        let cache = IdentifiedCache::new(true, Inbox::detached("identified"));
        let a = ModCollection::new(CollectionId::new(1), "A");
        let calls = Cell::new(0);
        let resolver = |_: GameObjectAddress| {
            calls.set(calls.get() + 1);
            Some((player("Alisaie"), a.clone()))
        };
        let addr = GameObjectAddress::from_raw(0x100);

        let first = cache.get_or_identify(addr, &resolver).unwrap();
        let second = cache.get_or_identify(addr, &resolver).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_disabled_cache_always_resolves() {
        let cache = IdentifiedCache::new(false, Inbox::detached("identified"));
        let a = ModCollection::new(CollectionId::new(1), "A");
        let calls = Cell::new(0);
        let resolver = |_: GameObjectAddress| {
            calls.set(calls.get() + 1);
            Some((player("Alphinaud"), a.clone()))
        };
        let addr = GameObjectAddress::from_raw(0x100);

        cache.get_or_identify(addr, &resolver);
        cache.get_or_identify(addr, &resolver);
        assert_eq!(calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unresolvable_not_cached() {
        let cache = IdentifiedCache::new(true, Inbox::detached("identified"));
        let addr = GameObjectAddress::from_raw(0x100);
        let resolver = |_: GameObjectAddress| -> Option<(ActorIdentifier, Arc<ModCollection>)> { None };
        assert!(cache.get_or_identify(addr, &resolver).is_none());
        assert!(cache.lookup(addr).is_none());
    }

    #[test]
    fn test_slot_reuse_requires_invalidation() {
        let cache = IdentifiedCache::new(true, Inbox::detached("identified"));
        let a = ModCollection::new(CollectionId::new(1), "A");
        let b = ModCollection::new(CollectionId::new(2), "B");
        let addr = GameObjectAddress::from_raw(0x100);

        let current = std::cell::RefCell::new((player("Old"), a.clone()));
        let resolver = |_: GameObjectAddress| Some(current.borrow().clone());

        assert_eq!(cache.get_or_identify(addr, &resolver).unwrap().actor(), &player("Old"));

        // The slot now holds a different actor
        *current.borrow_mut() = (player("New"), b.clone());
        assert_eq!(cache.get_or_identify(addr, &resolver).unwrap().actor(), &player("Old"));

        assert!(cache.remove(addr));
        let fresh = cache.get_or_identify(addr, &resolver).unwrap();
        assert_eq!(fresh.actor(), &player("New"));
        assert!(Arc::ptr_eq(&fresh.collection, &b));
    }
}
