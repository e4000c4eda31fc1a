//! Metadata identifiers
//!
//! A metadata identifier addresses one record inside one of the client's
//! binary metadata tables without depending on how that record is laid out in
//! memory. Identifiers are plain values: they are validated on construction,
//! totally ordered for stable display and diffing, serialized into a mod's
//! metadata edits, and used to derive the file paths a record governs.
//!
//! # Identifier kinds
//!
//! Every kind implements [`MetaIdentifier`]. Variant (IMC) records are
//! implemented by [`ImcIdentifier`]:
//!
//! ```ignore
//! use mirage_core::meta::{ImcIdentifier, MetaIdentifier};
//! use mirage_sdk::{EquipSlot, PrimaryId};
//!
//! let id = ImcIdentifier::for_slot(EquipSlot::Head, PrimaryId::new(42), 3);
//! assert!(id.validate());
//! assert_eq!(id.game_path()?.as_str(), "chara/equipment/e0042/e0042.imc");
//!
//! // Persist and restore
//! let json = id.to_json();
//! assert_eq!(ImcIdentifier::from_json(&json), Some(id));
//! ```

mod error;
mod imc;
mod json;

use std::collections::BTreeMap;
use std::fmt;

use mirage_sdk::GamePath;

pub use error::{MetaError, MetaResult};
pub use imc::{ImcIdentifier, ImcSchema, OVERSIZED_VARIANT_MARKER};

/// Position of a metadata file in the client's default resource list
///
/// Only table kinds that the client keeps as a single global file have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetaIndex(u16);

impl MetaIndex {
    /// Create a new index
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the raw index
    pub const fn index(self) -> u16 {
        self.0
    }
}

/// Items affected by a set of metadata edits, keyed by display name
pub type ChangedItems<T> = BTreeMap<String, T>;

/// Lookup from a dependent file path to the in-game items that use it
///
/// Supplied by the item database collaborator.
pub trait ObjectIdentification {
    /// Item payload recorded per name
    type Item;

    /// Add every item that references `path` to `items`
    fn identify(&self, items: &mut ChangedItems<Self::Item>, path: &GamePath);
}

/// Common interface of all metadata identifier kinds
pub trait MetaIdentifier: Copy + Ord + fmt::Display + Send + Sync {
    /// Whether the identifier satisfies its schema invariants
    fn validate(&self) -> bool;

    /// Path of the metadata table that owns the record
    fn game_path(&self) -> MetaResult<GamePath>;

    /// Index of the table in the default resource list, if it has one
    fn file_index(&self) -> Option<MetaIndex>;

    /// Add the in-game items whose files depend on this record
    fn add_changed_items<I>(&self, identification: &I, items: &mut ChangedItems<I::Item>)
    where
        I: ObjectIdentification + ?Sized;

    /// Persisted JSON form
    fn to_json(&self) -> serde_json::Value;
}
