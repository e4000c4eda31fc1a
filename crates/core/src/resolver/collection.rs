//! Mod collections as seen by the resolver
//!
//! Collections are owned by the collection manager. The resolver only keeps
//! weak references to them, so an index entry can never keep a collection
//! alive or hand out one that was dropped.

use std::fmt;
use std::sync::Arc;

/// Identity of a mod collection, issued by the collection manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionId(u32);

impl CollectionId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bundle of replacement content and rules
///
/// Opaque to the resolver beyond its id and display name.
#[derive(Debug)]
pub struct ModCollection {
    id: CollectionId,
    name: String,
}

impl ModCollection {
    /// Create a shared collection handle
    pub fn new(id: CollectionId, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
