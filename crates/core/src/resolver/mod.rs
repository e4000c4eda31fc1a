//! Resolution cache
//!
//! Remembers which mod collection serves which host entity, so the load
//! interception path can answer "whose content is this?" without
//! re-identifying the requester on every load.
//!
//! # Architecture
//!
//! ```text
//!                     ┌────────────────────────────┐
//!  HostEvents ──────► │ one inbox per index        │
//!                     ├────────────────────────────┤
//!  object hooks ────► │ draw objects   (ordered)   │
//!  load hooks   ────► │ paths                      │ ◄──── load interception
//!  resource hooks ──► │ resources + current ctx    │ ◄──── inspection (snapshot)
//!  identity    ─────► │ identified                 │
//!  cutscene hooks ──► │ cutscene actors (ordered)  │
//!                     └────────────────────────────┘
//! ```
//!
//! Collections are held weakly: a lookup never returns a collection that was
//! dropped, and [`ResolutionCache::compact`] removes such entries for good.
//!
//! # Example
//!
//! ```ignore
//! use mirage_core::resolver::{ResolutionCache, ModCollection, CollectionId};
//!
//! let cache = ResolutionCache::attached(config.resolver.clone(), &events);
//! let collection = ModCollection::new(CollectionId::new(1), "Default");
//!
//! cache.draw_objects().upsert(draw_object, &collection, object_index);
//! if let Some(data) = cache.draw_objects().lookup(draw_object) {
//!     tracing::info!("{} is served by {}", draw_object, data.collection);
//! }
//! ```

mod binding;
mod collection;
mod cutscene;
mod draw_object;
mod handles;
mod identified;
mod inbox;
mod path;
mod resource;
mod snapshot;

use std::sync::Arc;

use bitflags::bitflags;
use tracing::{debug, info};

use crate::config::ResolverConfig;
use crate::events::{HostEvent, HostEvents};
use binding::BoundSlot;
use inbox::Inbox;

pub use binding::Resolved;
pub use collection::{CollectionId, ModCollection};
pub use cutscene::CutsceneActorIndex;
pub use draw_object::{DrawObjectData, DrawObjectIndex};
pub use handles::{
    ActorIdentifier, DrawObjectAddress, GameObjectAddress, ObjectIndex, ResourceHandle,
};
pub use identified::{IdentifiedCache, IdentifiedData, IdentityResolver};
pub use path::{PathCollectionIndex, ResolveData};
pub use resource::{ResourceCollectionIndex, SubfileKind};
pub use snapshot::{CacheSnapshot, CompactionReport};

bitflags! {
    /// Selection of cache indexes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CacheIndexes: u8 {
        const DRAW_OBJECTS = 0x01;
        const PATHS = 0x02;
        /// Resources and the current sub-file contexts
        const RESOURCES = 0x04;
        /// Identified actors and the last game object
        const IDENTIFIED = 0x08;
        const CUTSCENE = 0x10;
    }
}

/// The five resolution indexes plus the current load context
///
/// When attached to a bus every index holds its own subscription and applies
/// pending events at the start of each of its operations, so references
/// returned by the accessors stay consistent across publishes.
pub struct ResolutionCache {
    draw_objects: DrawObjectIndex,
    paths: PathCollectionIndex,
    resources: ResourceCollectionIndex,
    identified: IdentifiedCache,
    cutscene: CutsceneActorIndex,
    last_game_object: BoundSlot<GameObjectAddress>,
    inbox: Inbox,
    config: ResolverConfig,
}

impl ResolutionCache {
    /// Create a detached cache; invalidation happens only through [`apply`](Self::apply)
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_inboxes(config, Inbox::detached)
    }

    /// Create a cache that follows the host events published on `events`
    pub fn attached(config: ResolverConfig, events: &HostEvents) -> Self {
        Self::with_inboxes(config, |name| Inbox::attached(name, events))
    }

    fn with_inboxes(config: ResolverConfig, inbox: impl Fn(&'static str) -> Inbox) -> Self {
        Self {
            draw_objects: DrawObjectIndex::new(inbox("draw objects")),
            paths: PathCollectionIndex::new(inbox("paths")),
            resources: ResourceCollectionIndex::new(inbox("resources")),
            identified: IdentifiedCache::new(config.cache_identified, inbox("identified")),
            cutscene: CutsceneActorIndex::new(inbox("cutscene")),
            last_game_object: BoundSlot::new(),
            inbox: inbox("last game object"),
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.inbox.is_attached()
    }

    pub fn draw_objects(&self) -> &DrawObjectIndex {
        &self.draw_objects
    }

    pub fn paths(&self) -> &PathCollectionIndex {
        &self.paths
    }

    pub fn resources(&self) -> &ResourceCollectionIndex {
        &self.resources
    }

    pub fn identified(&self) -> &IdentifiedCache {
        &self.identified
    }

    pub fn cutscene_actors(&self) -> &CutsceneActorIndex {
        &self.cutscene
    }

    fn sync_last_game_object(&self) -> usize {
        self.inbox.drain(|event| self.apply_last_game_object(event))
    }

    fn apply_last_game_object(&self, event: &HostEvent) {
        match *event {
            HostEvent::GameObjectDestroyed(game_object) => {
                self.last_game_object
                    .clear_if(|bound| *bound.data() == game_object);
            }
            HostEvent::CollectionRemoved(id) => {
                self.last_game_object.clear_if(|bound| bound.names(id));
            }
            HostEvent::Reset(indexes) if indexes.contains(CacheIndexes::IDENTIFIED) => {
                self.last_game_object.clear();
            }
            _ => {}
        }
    }

    /// Remember the game object whose load is being processed
    pub fn set_last_game_object(&self, collection: &Arc<ModCollection>, game_object: GameObjectAddress) {
        self.sync_last_game_object();
        self.last_game_object.set(collection, game_object);
    }

    pub fn last_game_object(&self) -> Option<ResolveData> {
        self.sync_last_game_object();
        self.last_game_object.get()
    }

    pub fn clear_last_game_object(&self) -> bool {
        self.sync_last_game_object();
        self.last_game_object.clear()
    }

    /// Apply every pending host event to every index
    ///
    /// # Returns
    /// The number of event deliveries applied, summed over the indexes
    pub fn sync(&self) -> usize {
        self.draw_objects.sync()
            + self.paths.sync()
            + self.resources.sync()
            + self.identified.sync()
            + self.cutscene.sync()
            + self.sync_last_game_object()
    }

    /// Apply one host event to every index
    ///
    /// Pending bus events are applied first to keep publish order.
    pub fn apply(&self, event: &HostEvent) {
        self.sync();
        debug!("Applying host event: {}", event);
        self.draw_objects.apply(event);
        self.paths.apply(event);
        self.resources.apply(event);
        self.identified.apply(event);
        self.cutscene.apply(event);
        self.apply_last_game_object(event);
    }

    /// Invalidate every entry naming a collection
    ///
    /// # Returns
    /// The number of entries removed
    pub fn remove_collection(&self, id: CollectionId) -> usize {
        self.sync();
        self.purge_collection(id)
    }

    fn purge_collection(&self, id: CollectionId) -> usize {
        let mut removed = self.draw_objects.remove_collection(id)
            + self.paths.remove_collection(id)
            + self.resources.remove_collection(id)
            + self.identified.remove_collection(id);
        if self.last_game_object.clear_if(|bound| bound.names(id)) {
            removed += 1;
        }
        info!("Removed collection {} from the resolution cache ({} entries)", id, removed);
        removed
    }

    /// Remove entries whose collection no longer exists
    #[tracing::instrument(skip(self))]
    pub fn compact(&self) -> CompactionReport {
        self.sync();
        let report = CompactionReport {
            draw_objects: self.draw_objects.compact(),
            paths: self.paths.compact(),
            resources: self.resources.compact(),
            identified: self.identified.compact(),
            last_game_object: self.last_game_object.clear_if(|bound| !bound.is_live()),
        };
        if report.total() > 0 {
            debug!("Compaction removed {} dead entries: {:?}", report.total(), report);
        }
        report
    }

    /// Drop all entries of the selected indexes
    pub fn clear(&self, indexes: CacheIndexes) {
        self.sync();
        if indexes.contains(CacheIndexes::DRAW_OBJECTS) {
            self.draw_objects.clear();
        }
        if indexes.contains(CacheIndexes::PATHS) {
            self.paths.clear();
        }
        if indexes.contains(CacheIndexes::RESOURCES) {
            self.resources.clear();
        }
        if indexes.contains(CacheIndexes::IDENTIFIED) {
            self.identified.clear();
            self.last_game_object.clear();
        }
        if indexes.contains(CacheIndexes::CUTSCENE) {
            self.cutscene.clear();
        }
        debug!("Cleared {:?}", indexes);
    }

    /// Copy every index for inspection
    pub fn snapshot(&self) -> CacheSnapshot {
        self.sync();
        CacheSnapshot {
            last_game_object: self.last_game_object.get(),
            draw_objects: self.draw_objects.snapshot(),
            paths: self.paths.snapshot(),
            current_mtrl: self.resources.current(SubfileKind::Material),
            current_avfx: self.resources.current(SubfileKind::Avfx),
            resources: self.resources.snapshot(),
            identified: self.identified.snapshot(),
            cutscene_actors: self.cutscene.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_sdk::GamePath;

    fn collection(id: u32, name: &str) -> Arc<ModCollection> {
        ModCollection::new(CollectionId::new(id), name)
    }

    fn path(s: &str) -> GamePath {
        GamePath::new(s).unwrap()
    }

    fn player(name: &str) -> ActorIdentifier {
        ActorIdentifier::Player {
            name: name.to_string(),
            home_world: 21,
        }
    }

    fn populate(cache: &ResolutionCache, c: &Arc<ModCollection>, actor: GameObjectAddress) {
        cache
            .draw_objects()
            .upsert(DrawObjectAddress::from_raw(0x2000), c, ObjectIndex::new(1));
        cache.paths().upsert(path("chara/equipment/e0001/e0001.imc"), c, actor);
        cache.resources().upsert(ResourceHandle::from_raw(0x3000), c, actor);
        cache.identified().upsert(actor, player("Thancred"), c);
        cache.set_last_game_object(c, actor);
    }

    #[test]
    fn test_upsert_is_last_writer_wins() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let a = collection(1, "A");
        let b = collection(2, "B");
        let key = ResourceHandle::from_raw(0x10);

        cache.resources().upsert(key, &a, GameObjectAddress::NULL);
        cache.resources().upsert(key, &b, GameObjectAddress::NULL);
        assert!(Arc::ptr_eq(&cache.resources().lookup(key).unwrap().collection, &b));
        assert_eq!(cache.resources().len(), 1);
    }

    #[test]
    fn test_lookup_does_not_change_state() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let a = collection(1, "A");
        let draw = DrawObjectAddress::from_raw(0x40);
        cache.draw_objects().upsert(draw, &a, ObjectIndex::new(7));

        for _ in 0..3 {
            assert!(cache.draw_objects().lookup(draw).is_some());
        }
        assert_eq!(cache.draw_objects().len(), 1);
    }

    #[test]
    fn test_remove_collection_invalidates_all_indexes() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let a = collection(1, "A");
        let b = collection(2, "B");
        let actor = GameObjectAddress::from_raw(0x1000);
        populate(&cache, &a, actor);
        cache
            .draw_objects()
            .upsert(DrawObjectAddress::from_raw(0x2100), &b, ObjectIndex::new(2));

        assert_eq!(cache.remove_collection(a.id()), 5);

        assert!(cache.draw_objects().lookup(DrawObjectAddress::from_raw(0x2000)).is_none());
        assert!(cache.paths().lookup(&path("chara/equipment/e0001/e0001.imc")).is_none());
        assert!(cache.resources().lookup(ResourceHandle::from_raw(0x3000)).is_none());
        assert!(cache.identified().lookup(actor).is_none());
        assert!(cache.last_game_object().is_none());
        assert!(cache.draw_objects().lookup(DrawObjectAddress::from_raw(0x2100)).is_some());
    }

    #[test]
    fn test_dropped_collection_never_dangles() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let temp = collection(1, "Temporary");
        let actor = GameObjectAddress::from_raw(0x1000);
        populate(&cache, &temp, actor);
        drop(temp);

        assert!(cache.identified().lookup(actor).is_none());
        assert!(cache.last_game_object().is_none());
        assert_eq!(cache.snapshot().entry_count(), 0);

        let report = cache.compact();
        assert_eq!(report.total(), 5);
        assert!(report.last_game_object);
        assert_eq!(cache.compact().total(), 0);
    }

    #[test]
    fn test_events_applied_before_next_lookup() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let draw = DrawObjectAddress::from_raw(0x2000);
        let handle = ResourceHandle::from_raw(0x3000);

        cache.draw_objects().upsert(draw, &a, ObjectIndex::new(0));
        cache.resources().upsert(handle, &a, GameObjectAddress::NULL);

        events.publish(HostEvent::DrawObjectDestroyed(draw));
        events.publish(HostEvent::ResourceReleased(handle));

        assert!(cache.draw_objects().lookup(draw).is_none());
        assert!(cache.resources().lookup(handle).is_none());
    }

    #[test]
    fn test_held_index_references_see_events() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let slot = GameObjectAddress::from_raw(0x1000);
        let draw = DrawObjectAddress::from_raw(0x2000);

        let identified = cache.identified();
        let draw_objects = cache.draw_objects();
        let cutscene = cache.cutscene_actors();
        identified.upsert(slot, ActorIdentifier::Retainer { name: "Old".to_string() }, &a);
        draw_objects.upsert(draw, &a, ObjectIndex::new(3));
        cutscene.upsert(ObjectIndex::new(205), player("Zenos"));

        events.publish(HostEvent::GameObjectChanged(slot));
        events.publish(HostEvent::DrawObjectDestroyed(draw));
        events.publish(HostEvent::CutsceneActorRemoved(ObjectIndex::new(205)));

        assert!(identified.lookup(slot).is_none());
        assert!(draw_objects.lookup(draw).is_none());
        assert!(cutscene.lookup(ObjectIndex::new(205)).is_none());
        assert!(draw_objects.snapshot().is_empty());
    }

    #[test]
    fn test_events_apply_before_later_writes() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let reused = GameObjectAddress::from_raw(0x1000);
        let draw = DrawObjectAddress::from_raw(0x2000);

        // Destroy notifications for the previous occupants arrive first
        events.publish(HostEvent::GameObjectDestroyed(reused));
        events.publish(HostEvent::DrawObjectDestroyed(draw));
        cache.set_last_game_object(&a, reused);
        cache.draw_objects().upsert(draw, &a, ObjectIndex::new(1));
        cache.identified().upsert(reused, player("Fresh"), &a);

        assert_eq!(cache.last_game_object().unwrap().associated_game_object(), reused);
        assert!(cache.draw_objects().lookup(draw).is_some());
        assert_eq!(cache.identified().lookup(reused).unwrap().actor(), &player("Fresh"));

        events.publish(HostEvent::GameObjectDestroyed(reused));
        assert!(!cache.clear_last_game_object());
    }

    #[test]
    fn test_resolver_may_read_cache() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let actor = GameObjectAddress::from_raw(0x1000);
        let draw = DrawObjectAddress::from_raw(0x2000);
        let imc = path("chara/equipment/e0001/e0001.imc");

        cache.draw_objects().upsert(draw, &a, ObjectIndex::new(4));
        cache.paths().upsert(imc.clone(), &a, actor);
        events.publish(HostEvent::CutsceneActorRemoved(ObjectIndex::new(200)));

        let calls = std::cell::Cell::new(0);
        let resolver = |addr: GameObjectAddress| {
            calls.set(calls.get() + 1);
            assert!(cache.identified().lookup(addr).is_none());
            let owner = cache.paths().lookup(&imc)?;
            let slot = cache.draw_objects().lookup(draw)?.object_index();
            Some((
                ActorIdentifier::Npc {
                    data_id: 1,
                    index: slot,
                },
                owner.collection,
            ))
        };

        let first = cache.identified().get_or_identify(actor, &resolver).unwrap();
        let second = cache.identified().get_or_identify(actor, &resolver).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.identified().len(), 1);
        assert!(Arc::ptr_eq(&second.collection, &a));
    }

    #[test]
    fn test_slot_reuse_returns_new_identity() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let b = collection(2, "B");
        let slot = GameObjectAddress::from_raw(0x1000);

        let occupant = std::cell::RefCell::new((player("Urianger"), a.clone()));
        let resolver = |_: GameObjectAddress| Some(occupant.borrow().clone());

        let first = cache.identified().get_or_identify(slot, &resolver).unwrap();
        assert_eq!(first.actor(), &player("Urianger"));

        // Host despawns the actor and reuses the slot for someone else
        *occupant.borrow_mut() = (player("G'raha Tia"), b.clone());
        events.publish(HostEvent::GameObjectChanged(slot));

        let second = cache.identified().get_or_identify(slot, &resolver).unwrap();
        assert_eq!(second.actor(), &player("G'raha Tia"));
        assert!(Arc::ptr_eq(&second.collection, &b));
    }

    #[test]
    fn test_game_object_destroyed() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let actor = GameObjectAddress::from_raw(0x1000);
        populate(&cache, &a, actor);
        cache.resources().set_current(SubfileKind::Material, &a, actor);

        events.publish(HostEvent::GameObjectDestroyed(actor));

        assert!(cache.identified().lookup(actor).is_none());
        assert!(cache.paths().is_empty());
        assert!(cache.last_game_object().is_none());
        assert!(cache.resources().current(SubfileKind::Material).is_none());
        // Resources stay until the host releases them
        assert_eq!(cache.resources().len(), 1);
        assert_eq!(cache.draw_objects().len(), 1);
    }

    #[test]
    fn test_collection_changed_drops_derived_entries() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let a = collection(1, "A");
        let actor = GameObjectAddress::from_raw(0x1000);
        populate(&cache, &a, actor);

        cache.apply(&HostEvent::CollectionChanged(a.id()));
        assert!(cache.paths().is_empty());
        assert!(cache.identified().is_empty());
        assert_eq!(cache.draw_objects().len(), 1);
        assert_eq!(cache.resources().len(), 1);
    }

    #[test]
    fn test_reset_selected_indexes() {
        let events = HostEvents::new();
        let cache = ResolutionCache::attached(ResolverConfig::default(), &events);
        let a = collection(1, "A");
        let actor = GameObjectAddress::from_raw(0x1000);
        populate(&cache, &a, actor);
        cache.cutscene_actors().upsert(ObjectIndex::new(200), player("Estinien"));

        events.publish(HostEvent::Reset(CacheIndexes::PATHS | CacheIndexes::CUTSCENE));

        assert!(cache.paths().is_empty());
        assert!(cache.cutscene_actors().is_empty());
        assert_eq!(cache.draw_objects().len(), 1);
        assert_eq!(cache.identified().len(), 1);

        cache.clear(CacheIndexes::all());
        assert_eq!(cache.snapshot().entry_count(), 0);
        assert!(cache.last_game_object().is_none());
    }

    #[test]
    fn test_snapshot_orders() {
        let cache = ResolutionCache::new(ResolverConfig::default());
        let a = collection(1, "A");
        for raw in [0x30, 0x10, 0x20] {
            cache
                .draw_objects()
                .upsert(DrawObjectAddress::from_raw(raw), &a, ObjectIndex::new(0));
        }
        for slot in [220u16, 201] {
            cache.cutscene_actors().upsert(ObjectIndex::new(slot), player("Y'shtola"));
        }

        let snapshot = cache.snapshot();
        let draws: Vec<_> = snapshot.draw_objects.iter().map(|(d, _)| d.raw()).collect();
        let cutscene: Vec<_> = snapshot.cutscene_actors.iter().map(|(i, _)| i.index()).collect();
        assert_eq!(draws, vec![0x30, 0x10, 0x20]);
        assert_eq!(cutscene, vec![220, 201]);
    }

    #[test]
    fn test_detached_cache_ignores_bus() {
        let events = HostEvents::new();
        let cache = ResolutionCache::new(ResolverConfig::default());
        assert!(!cache.is_attached());
        assert_eq!(events.subscriber_count(), 0);
        assert_eq!(cache.sync(), 0);
    }
}
