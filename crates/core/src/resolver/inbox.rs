//! Per-index event intake
//!
//! Each index owns its own subscription and drains it at the start of every
//! public operation, so an index reference held across a publish still sees
//! the invalidation before its next read or write.

use tracing::trace;

use crate::events::{HostEvent, HostEvents, Subscription};

pub(crate) struct Inbox {
    name: &'static str,
    subscription: Option<Subscription>,
}

impl Inbox {
    /// An inbox that never receives anything
    pub fn detached(name: &'static str) -> Self {
        Self {
            name,
            subscription: None,
        }
    }

    pub fn attached(name: &'static str, events: &HostEvents) -> Self {
        Self {
            name,
            subscription: Some(events.subscribe()),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Hand every pending event to `apply`, in publish order
    ///
    /// `apply` must only touch storage directly, never call back into a
    /// draining operation of the same index.
    pub fn drain(&self, mut apply: impl FnMut(&HostEvent)) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };

        let mut applied = 0;
        for event in subscription.drain() {
            trace!("{}: applying {}", self.name, event);
            apply(&event);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CollectionId;

    #[test]
    fn test_detached_inbox_is_empty() {
        let inbox = Inbox::detached("test");
        assert!(!inbox.is_attached());
        assert_eq!(inbox.drain(|_| panic!("no events expected")), 0);
    }

    #[test]
    fn test_drain_in_publish_order() {
        let events = HostEvents::new();
        let inbox = Inbox::attached("test", &events);
        for id in 1..=3 {
            events.publish(HostEvent::CollectionChanged(CollectionId::new(id)));
        }

        let mut seen = Vec::new();
        assert_eq!(
            inbox.drain(|event| {
                if let HostEvent::CollectionChanged(id) = event {
                    seen.push(id.id());
                }
            }),
            3
        );
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(inbox.drain(|_| {}), 0);
    }
}
