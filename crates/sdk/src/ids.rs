//! Catalog id newtypes
//!
//! The client addresses models by a primary id (equipment set, weapon model,
//! monster model, ...) and, for non-equipment objects, a secondary id. Each
//! model carries up to 256 variants.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! impl_id {
    ($name:ident, $inner:ty) => {
        impl $name {
            /// Create a new id with the given value
            #[inline]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Get the raw id value
            #[inline]
            pub const fn id(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Primary catalog id (equipment set, weapon model, monster model, ...)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryId(u16);
impl_id!(PrimaryId, u16);

/// Secondary catalog id (weapon body, monster body, demihuman equipment)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecondaryId(u16);
impl_id!(SecondaryId, u16);

/// Variant selector within a model record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(u8);
impl_id!(Variant, u8);

impl Variant {
    /// Create a variant from a wider value, clamping to `0..=255`
    #[inline]
    pub const fn from_u16_clamped(value: u16) -> Self {
        if value > u8::MAX as u16 {
            Self(u8::MAX)
        } else {
            Self(value as u8)
        }
    }
}
