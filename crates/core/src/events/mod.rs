//! Host lifecycle notifications
//!
//! The host-facing hook layer publishes [`HostEvent`]s on a [`HostEvents`]
//! bus. Every subscriber gets its own unbounded channel, so publishing never
//! blocks the notification thread.
//!
//! # Architecture
//!
//! ```text
//! object/resource hooks → HostEvents::publish → Subscription → ResolutionCache::sync
//! ```
//!
//! A [`ResolutionCache`](crate::resolver::ResolutionCache) attached to a bus
//! gives every index its own subscription. Each index drains it at the start
//! of every operation, so a published invalidation is applied before the next
//! lookup, even through an index reference held across the publish.
//!
//! # Example
//!
//! ```ignore
//! use mirage_core::events::{HostEvent, HostEvents};
//!
//! let events = HostEvents::new();
//! let cache = ResolutionCache::attached(config, &events);
//!
//! // From the draw object destructor hook
//! events.publish(HostEvent::DrawObjectDestroyed(draw_object));
//! assert!(cache.draw_objects().lookup(draw_object).is_none());
//! ```

mod bus;
mod types;

pub use bus::{HostEvents, SubscriberKey, Subscription};
pub use types::HostEvent;
