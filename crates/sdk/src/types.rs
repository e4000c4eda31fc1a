//! Object types, slots and race codes
//!
//! Discriminant values match the client's own enumerations so identifiers
//! built from raw host data can be checked with `TryFrom<u8>`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw discriminant that does not name any variant of the target enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Undefined {kind} value: {value}")]
pub struct UndefinedValue {
    /// Enum that rejected the value
    pub kind: &'static str,
    /// The raw value
    pub value: u8,
}

macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// All defined values in discriminant order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Get the raw discriminant
            #[inline]
            pub const fn raw(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UndefinedValue;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UndefinedValue {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

raw_enum! {
    /// Category of a game object, selecting which file schema applies
    pub enum ObjectType {
        #[default]
        Unknown = 0,
        Vfx = 1,
        DemiHuman = 2,
        Accessory = 3,
        World = 4,
        Housing = 5,
        Monster = 6,
        Icon = 7,
        LoadingScreen = 8,
        Map = 9,
        Interface = 10,
        Equipment = 11,
        Character = 12,
        Weapon = 13,
        Font = 14,
    }
}

impl ObjectType {
    /// Whether objects of this type own a variant (IMC) table
    pub const fn has_imc_table(self) -> bool {
        matches!(
            self,
            ObjectType::Equipment
                | ObjectType::Accessory
                | ObjectType::DemiHuman
                | ObjectType::Monster
                | ObjectType::Weapon
        )
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::Unknown => "Unknown",
            ObjectType::Vfx => "Visual Effect",
            ObjectType::DemiHuman => "Demi Human",
            ObjectType::Accessory => "Accessory",
            ObjectType::World => "Doodad",
            ObjectType::Housing => "Housing Object",
            ObjectType::Monster => "Monster",
            ObjectType::Icon => "Icon",
            ObjectType::LoadingScreen => "Loading Screen",
            ObjectType::Map => "Map",
            ObjectType::Interface => "UI Element",
            ObjectType::Equipment => "Equipment",
            ObjectType::Character => "Character",
            ObjectType::Weapon => "Weapon",
            ObjectType::Font => "Font",
        }
    }
}

raw_enum! {
    /// Equipment slot of a character
    ///
    /// Composite slots (e.g. `BodyHands`) describe items that cover several
    /// slots at once.
    pub enum EquipSlot {
        #[default]
        Unknown = 0,
        MainHand = 1,
        OffHand = 2,
        Head = 3,
        Body = 4,
        Hands = 5,
        Belt = 6,
        Legs = 7,
        Feet = 8,
        Ears = 9,
        Neck = 10,
        Wrists = 11,
        RFinger = 12,
        BothHand = 13,
        LFinger = 14,
        HeadBody = 15,
        BodyHandsLegsFeet = 16,
        SoulCrystal = 17,
        LegsFeet = 18,
        FullBody = 19,
        BodyHands = 20,
        BodyLegsFeet = 21,
        ChestHands = 22,
    }
}

impl EquipSlot {
    /// Whether this slot is worn gear (including composite gear slots)
    pub const fn is_equipment(self) -> bool {
        matches!(
            self,
            EquipSlot::Head
                | EquipSlot::Body
                | EquipSlot::Hands
                | EquipSlot::Legs
                | EquipSlot::Feet
                | EquipSlot::BodyHands
                | EquipSlot::BodyHandsLegsFeet
                | EquipSlot::BodyLegsFeet
                | EquipSlot::FullBody
                | EquipSlot::HeadBody
                | EquipSlot::LegsFeet
                | EquipSlot::ChestHands
        )
    }

    /// Whether this slot is an accessory slot
    pub const fn is_accessory(self) -> bool {
        matches!(
            self,
            EquipSlot::Ears
                | EquipSlot::Neck
                | EquipSlot::Wrists
                | EquipSlot::RFinger
                | EquipSlot::LFinger
        )
    }

    /// File name suffix used by model and material paths
    ///
    /// Only the ten base gear slots have one.
    pub const fn suffix(self) -> Option<&'static str> {
        match self {
            EquipSlot::Head => Some("met"),
            EquipSlot::Hands => Some("glv"),
            EquipSlot::Legs => Some("dwn"),
            EquipSlot::Feet => Some("sho"),
            EquipSlot::Body => Some("top"),
            EquipSlot::Ears => Some("ear"),
            EquipSlot::Neck => Some("nek"),
            EquipSlot::RFinger => Some("rir"),
            EquipSlot::LFinger => Some("ril"),
            EquipSlot::Wrists => Some("wrs"),
            _ => None,
        }
    }

    /// Inverse of [`EquipSlot::suffix`]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "met" => Some(EquipSlot::Head),
            "glv" => Some(EquipSlot::Hands),
            "dwn" => Some(EquipSlot::Legs),
            "sho" => Some(EquipSlot::Feet),
            "top" => Some(EquipSlot::Body),
            "ear" => Some(EquipSlot::Ears),
            "nek" => Some(EquipSlot::Neck),
            "rir" => Some(EquipSlot::RFinger),
            "ril" => Some(EquipSlot::LFinger),
            "wrs" => Some(EquipSlot::Wrists),
            _ => None,
        }
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            EquipSlot::Head => "Head",
            EquipSlot::Body => "Body",
            EquipSlot::Hands => "Hands",
            EquipSlot::Legs => "Legs",
            EquipSlot::Feet => "Feet",
            EquipSlot::Ears => "Earrings",
            EquipSlot::Neck => "Necklace",
            EquipSlot::Wrists => "Bracelets",
            EquipSlot::RFinger => "Right Ring",
            EquipSlot::LFinger => "Left Ring",
            EquipSlot::MainHand | EquipSlot::BothHand => "Primary Weapon",
            EquipSlot::OffHand => "Secondary Weapon",
            EquipSlot::Belt => "Belt",
            EquipSlot::HeadBody => "Head and Body",
            EquipSlot::SoulCrystal => "Soul Crystal",
            EquipSlot::LegsFeet => "Bottom",
            EquipSlot::BodyHands => "Top",
            EquipSlot::BodyHandsLegsFeet
            | EquipSlot::FullBody
            | EquipSlot::BodyLegsFeet
            | EquipSlot::ChestHands => "Costume",
            EquipSlot::Unknown => "Unknown",
        }
    }
}

raw_enum! {
    /// Body part of a non-humanoid model
    pub enum BodySlot {
        #[default]
        Unknown = 0,
        Hair = 1,
        Face = 2,
        Tail = 3,
        Body = 4,
        Zear = 5,
    }
}

impl fmt::Display for BodySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Gender and race combination, encoded as the four digit race code in paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum GenderRace {
    MidlanderMale = 101,
    MidlanderFemale = 201,
    HighlanderMale = 301,
    HighlanderFemale = 401,
    ElezenMale = 501,
    ElezenFemale = 601,
    MiqoteMale = 701,
    MiqoteFemale = 801,
    RoegadynMale = 901,
    RoegadynFemale = 1001,
    LalafellMale = 1101,
    LalafellFemale = 1201,
}

impl GenderRace {
    /// Raw race code
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a race code
    pub fn from_code(code: u16) -> Option<Self> {
        use GenderRace::*;
        [
            MidlanderMale,
            MidlanderFemale,
            HighlanderMale,
            HighlanderFemale,
            ElezenMale,
            ElezenFemale,
            MiqoteMale,
            MiqoteFemale,
            RoegadynMale,
            RoegadynFemale,
            LalafellMale,
            LalafellFemale,
        ]
        .into_iter()
        .find(|race| race.code() == code)
    }
}
