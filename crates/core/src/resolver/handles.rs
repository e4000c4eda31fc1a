//! Opaque host handles and actor identities
//!
//! Addresses identify live host objects. They are only stored and compared,
//! never dereferenced, so they carry no arithmetic.

use std::fmt;

macro_rules! address_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            /// The null handle
            pub const NULL: Self = Self(0);

            /// Wrap a raw address issued by the host
            #[inline]
            pub const fn from_raw(raw: usize) -> Self {
                Self(raw)
            }

            /// Get the raw address
            #[inline]
            pub const fn raw(self) -> usize {
                self.0
            }

            /// Check for the null handle
            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{:X})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{:X}", self.0)
            }
        }
    };
}

address_handle! {
    /// Address of a host render representation (character base, weapon, ...)
    DrawObjectAddress
}

address_handle! {
    /// Address of a host game object (character, companion, ornament, ...)
    GameObjectAddress
}

address_handle! {
    /// Host handle of a loaded resource (texture, material, model, ...)
    ResourceHandle
}

/// Slot in the host object table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIndex(u16);

impl ObjectIndex {
    /// First slot reserved for cutscene actors
    pub const CUTSCENE_START: u16 = 200;

    /// One past the last cutscene slot
    pub const CUTSCENE_END: u16 = 240;

    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Whether this slot belongs to the cutscene range
    #[inline]
    pub const fn is_cutscene(self) -> bool {
        self.0 >= Self::CUTSCENE_START && self.0 < Self::CUTSCENE_END
    }
}

impl fmt::Display for ObjectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an actor as determined by the identity-resolution collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorIdentifier {
    /// A player character
    Player { name: String, home_world: u16 },
    /// A retainer summoned by a player
    Retainer { name: String },
    /// A companion, mount or pet owned by a player
    Owned {
        owner: String,
        home_world: u16,
        data_id: u32,
    },
    /// A non-player character identified by its data row
    Npc { data_id: u32, index: ObjectIndex },
}

impl fmt::Display for ActorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorIdentifier::Player { name, home_world } => write!(f, "{} ({})", name, home_world),
            ActorIdentifier::Retainer { name } => write!(f, "{} (Retainer)", name),
            ActorIdentifier::Owned {
                owner,
                home_world,
                data_id,
            } => write!(f, "{}'s #{} ({})", owner, data_id, home_world),
            ActorIdentifier::Npc { data_id, index } => write!(f, "NPC #{} at {}", data_id, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = DrawObjectAddress::from_raw(0x1A2B);
        assert_eq!(format!("{}", addr), "0x1A2B");
        assert_eq!(format!("{:?}", addr), "DrawObjectAddress(0x1A2B)");
        assert_eq!(addr.raw(), 0x1A2B);
    }

    #[test]
    fn test_null_handle() {
        assert!(GameObjectAddress::NULL.is_null());
        assert!(!ResourceHandle::from_raw(8).is_null());
    }

    #[test]
    fn test_cutscene_range() {
        assert!(!ObjectIndex::new(0).is_cutscene());
        assert!(ObjectIndex::new(200).is_cutscene());
        assert!(ObjectIndex::new(239).is_cutscene());
        assert!(!ObjectIndex::new(240).is_cutscene());
    }

    #[test]
    fn test_actor_display() {
        let player = ActorIdentifier::Player {
            name: "Y'shtola Rhul".to_string(),
            home_world: 73,
        };
        assert_eq!(player.to_string(), "Y'shtola Rhul (73)");

        let npc = ActorIdentifier::Npc {
            data_id: 1008,
            index: ObjectIndex::new(12),
        };
        assert_eq!(npc.to_string(), "NPC #1008 at 12");
    }
}
