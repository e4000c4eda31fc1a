//! Mirage - Core Logic
//!
//! Metadata identifiers and collection resolution for the mirage mod
//! manager.
//!
//! - [`meta`] - validated, ordered, serializable metadata record identifiers
//! - [`resolver`] - the resolution cache mapping host entities to collections
//! - [`events`] - host lifecycle notifications feeding cache invalidation
//! - [`config`] - `core.toml` loading
//!
//! # Re-exports
//!
//! The SDK crate is re-exported as [`sdk`] for convenience.

pub use mirage_sdk as sdk;

pub mod config;
pub mod events;
pub mod meta;
pub mod resolver;

// Re-export commonly used items
pub use config::{ConfigError, ConfigResult, CoreConfig, ResolverConfig};
pub use events::{HostEvent, HostEvents};
pub use meta::{ImcIdentifier, ImcSchema, MetaError, MetaIdentifier, MetaResult};
pub use resolver::{
    CacheIndexes, CacheSnapshot, CollectionId, ModCollection, ResolutionCache, Resolved,
};
