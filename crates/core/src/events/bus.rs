//! Publish/subscribe bus

use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};
use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use super::HostEvent;

new_key_type! {
    /// Handle for a bus subscription
    pub struct SubscriberKey;
}

/// Receiving end of a subscription
///
/// Dropping it disconnects the channel; the bus forgets the subscriber on its
/// next publish.
pub struct Subscription {
    key: SubscriberKey,
    receiver: Receiver<HostEvent>,
}

impl Subscription {
    pub fn key(&self) -> SubscriberKey {
        self.key
    }

    /// Pending events in publish order, without blocking
    pub fn drain(&self) -> TryIter<'_, HostEvent> {
        self.receiver.try_iter()
    }

    /// Number of events waiting
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

/// Fan-out channel from the host hooks to every interested consumer
pub struct HostEvents {
    subscribers: RwLock<SlotMap<SubscriberKey, Sender<HostEvent>>>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(SlotMap::with_key()),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = unbounded();
        let key = self.subscribers.write().insert(sender);
        debug!("Host event subscriber {:?} registered", key);
        Subscription { key, receiver }
    }

    /// Remove a subscriber; returns `true` if it was registered
    pub fn unsubscribe(&self, key: SubscriberKey) -> bool {
        self.subscribers.write().remove(key).is_some()
    }

    /// Deliver `event` to every subscriber
    ///
    /// # Returns
    /// The number of subscribers the event was delivered to
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn publish(&self, event: HostEvent) -> usize {
        let mut delivered = 0;
        let mut disconnected = Vec::new();

        for (key, sender) in self.subscribers.read().iter() {
            match sender.send(event) {
                Ok(()) => delivered += 1,
                Err(_) => disconnected.push(key),
            }
        }

        if !disconnected.is_empty() {
            let mut subscribers = self.subscribers.write();
            for key in disconnected {
                debug!("Dropping disconnected host event subscriber {:?}", key);
                subscribers.remove(key);
            }
        }

        trace!("Delivered to {} subscriber(s)", delivered);
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for HostEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{CollectionId, ResourceHandle};

    #[test]
    fn test_fan_out_in_order() {
        let bus = HostEvents::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        let events = [
            HostEvent::ResourceReleased(ResourceHandle::from_raw(1)),
            HostEvent::CollectionRemoved(CollectionId::new(3)),
        ];
        for event in events {
            assert_eq!(bus.publish(event), 2);
        }

        assert_eq!(first.drain().collect::<Vec<_>>(), events);
        assert_eq!(second.pending(), 2);
        assert_eq!(second.drain().count(), 2);
        assert_eq!(first.pending(), 0);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let bus = HostEvents::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(bus.publish(HostEvent::CollectionChanged(CollectionId::new(1))), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.pending(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = HostEvents::new();
        let sub = bus.subscribe();
        assert!(bus.unsubscribe(sub.key()));
        assert!(!bus.unsubscribe(sub.key()));
        assert_eq!(bus.publish(HostEvent::CollectionChanged(CollectionId::new(1))), 0);
        assert_eq!(sub.pending(), 0);
    }
}
