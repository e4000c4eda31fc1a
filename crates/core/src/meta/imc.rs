//! Variant (IMC) record identifiers
//!
//! Each model owns an IMC table holding one entry per variant and, for gear,
//! per slot. An [`ImcIdentifier`] names one such entry.
//!
//! # Schemas
//!
//! Which fields carry meaning depends on the object type:
//!
//! ```text
//! ┌─────────────────────┬─────────────┬──────────────┬───────────┐
//! │ Object type         │ Secondary   │ Equip slot   │ Body slot │
//! ├─────────────────────┼─────────────┼──────────────┼───────────┤
//! │ Equipment/Accessory │ always 0    │ gear slot    │ Unknown   │
//! │ DemiHuman           │ equipment   │ gear slot    │ Unknown   │
//! │ Monster/Weapon      │ body        │ Unknown      │ any       │
//! └─────────────────────┴─────────────┴──────────────┴───────────┘
//! ```
//!
//! The flat identifier keeps all six fields so unvalidated values can still
//! be inspected and persisted; [`ImcIdentifier::schema`] yields the typed view
//! that exists only for valid identifiers.

use std::cmp::Ordering;
use std::fmt;

use mirage_sdk::templates;
use mirage_sdk::{
    BodySlot, EquipSlot, GamePath, GenderRace, ObjectType, PrimaryId, SecondaryId, Variant,
};

use super::{ChangedItems, MetaError, MetaIdentifier, MetaIndex, MetaResult, ObjectIdentification};

/// Body slot stored by [`ImcIdentifier::for_slot`] when the requested variant
/// did not fit the variant range. Gear identifiers never validate with it.
pub const OVERSIZED_VARIANT_MARKER: BodySlot = BodySlot::Body;

/// Material suffix used for representative paths
const REPRESENTATIVE_SUFFIX: &str = "a";

/// Typed view of a valid [`ImcIdentifier`]
///
/// One variant per table schema, carrying only the fields meaningful to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImcSchema {
    Equipment { slot: EquipSlot },
    Accessory { slot: EquipSlot },
    DemiHuman { secondary_id: SecondaryId, slot: EquipSlot },
    Monster { secondary_id: SecondaryId, body_slot: BodySlot },
    Weapon { secondary_id: SecondaryId, body_slot: BodySlot },
}

impl ImcSchema {
    /// Object type this schema belongs to
    pub const fn object_type(self) -> ObjectType {
        match self {
            ImcSchema::Equipment { .. } => ObjectType::Equipment,
            ImcSchema::Accessory { .. } => ObjectType::Accessory,
            ImcSchema::DemiHuman { .. } => ObjectType::DemiHuman,
            ImcSchema::Monster { .. } => ObjectType::Monster,
            ImcSchema::Weapon { .. } => ObjectType::Weapon,
        }
    }
}

/// Identifier of one entry in a variant (IMC) table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImcIdentifier {
    primary_id: PrimaryId,
    variant: Variant,
    object_type: ObjectType,
    secondary_id: SecondaryId,
    equip_slot: EquipSlot,
    body_slot: BodySlot,
}

impl ImcIdentifier {
    /// Create an identifier from all six fields without validating
    ///
    /// Use [`ImcIdentifier::new`] unless the value is only inspected.
    pub const fn from_parts(
        primary_id: PrimaryId,
        variant: Variant,
        object_type: ObjectType,
        secondary_id: SecondaryId,
        equip_slot: EquipSlot,
        body_slot: BodySlot,
    ) -> Self {
        Self {
            primary_id,
            variant,
            object_type,
            secondary_id,
            equip_slot,
            body_slot,
        }
    }

    /// Create a validated identifier from all six fields
    pub fn new(
        primary_id: PrimaryId,
        variant: Variant,
        object_type: ObjectType,
        secondary_id: SecondaryId,
        equip_slot: EquipSlot,
        body_slot: BodySlot,
    ) -> MetaResult<Self> {
        let id = Self::from_parts(
            primary_id,
            variant,
            object_type,
            secondary_id,
            equip_slot,
            body_slot,
        );
        if id.validate() {
            Ok(id)
        } else {
            Err(MetaError::Validation(id.to_string()))
        }
    }

    /// Create a validated identifier from raw host values
    ///
    /// Enum fields are given as raw discriminants; undefined values and
    /// variants above 255 are rejected.
    pub fn from_raw(
        primary_id: u16,
        variant: u16,
        object_type: u8,
        secondary_id: u16,
        equip_slot: u8,
        body_slot: u8,
    ) -> MetaResult<Self> {
        let variant = u8::try_from(variant)
            .map_err(|_| MetaError::Validation(format!("variant {} out of range", variant)))?;
        Self::new(
            PrimaryId::new(primary_id),
            Variant::new(variant),
            ObjectType::try_from(object_type)?,
            SecondaryId::new(secondary_id),
            EquipSlot::try_from(equip_slot)?,
            BodySlot::try_from(body_slot)?,
        )
    }

    /// Create a gear identifier for a slot
    ///
    /// The object type follows from the slot. A variant above 255 is clamped
    /// and marked with [`OVERSIZED_VARIANT_MARKER`], so the result is kept for
    /// inspection but never validates.
    pub const fn for_slot(slot: EquipSlot, primary_id: PrimaryId, variant: u16) -> Self {
        let object_type = if slot.is_accessory() {
            ObjectType::Accessory
        } else {
            ObjectType::Equipment
        };
        let body_slot = if variant > u8::MAX as u16 {
            OVERSIZED_VARIANT_MARKER
        } else {
            BodySlot::Unknown
        };
        Self::from_parts(
            primary_id,
            Variant::from_u16_clamped(variant),
            object_type,
            SecondaryId::new(0),
            slot,
            body_slot,
        )
    }

    /// Create an identifier from its typed view
    ///
    /// Fails only when the slot in the schema is not a gear slot.
    pub fn from_schema(primary_id: PrimaryId, variant: Variant, schema: ImcSchema) -> MetaResult<Self> {
        let (secondary_id, equip_slot, body_slot) = match schema {
            ImcSchema::Equipment { slot } | ImcSchema::Accessory { slot } => {
                (SecondaryId::new(0), slot, BodySlot::Unknown)
            }
            ImcSchema::DemiHuman { secondary_id, slot } => (secondary_id, slot, BodySlot::Unknown),
            ImcSchema::Monster {
                secondary_id,
                body_slot,
            }
            | ImcSchema::Weapon {
                secondary_id,
                body_slot,
            } => (secondary_id, EquipSlot::Unknown, body_slot),
        };
        Self::new(
            primary_id,
            variant,
            schema.object_type(),
            secondary_id,
            equip_slot,
            body_slot,
        )
    }

    /// Identify the record a material load path belongs to
    ///
    /// Returns `None` for paths that are not model materials or that name an
    /// out-of-range variant.
    pub fn from_material_path(path: &GamePath) -> Option<Self> {
        let key = templates::parse_material_path(path.as_str())?;
        let variant = Variant::new(u8::try_from(key.variant).ok()?);
        let id = match key.object_type {
            ObjectType::Equipment | ObjectType::Accessory => Self::from_parts(
                key.primary_id,
                variant,
                key.object_type,
                SecondaryId::new(0),
                key.slot,
                BodySlot::Unknown,
            ),
            ObjectType::DemiHuman => Self::from_parts(
                key.primary_id,
                variant,
                ObjectType::DemiHuman,
                key.secondary_id,
                key.slot,
                BodySlot::Unknown,
            ),
            ObjectType::Monster | ObjectType::Weapon => Self::from_parts(
                key.primary_id,
                variant,
                key.object_type,
                key.secondary_id,
                EquipSlot::Unknown,
                BodySlot::Body,
            ),
            _ => return None,
        };
        id.validate().then_some(id)
    }

    #[inline]
    pub const fn primary_id(&self) -> PrimaryId {
        self.primary_id
    }

    #[inline]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub const fn object_type(&self) -> ObjectType {
        self.object_type
    }

    #[inline]
    pub const fn secondary_id(&self) -> SecondaryId {
        self.secondary_id
    }

    #[inline]
    pub const fn equip_slot(&self) -> EquipSlot {
        self.equip_slot
    }

    #[inline]
    pub const fn body_slot(&self) -> BodySlot {
        self.body_slot
    }

    /// Typed view of this identifier, `None` if it fails validation
    pub fn schema(&self) -> Option<ImcSchema> {
        let gear_slot = self.equip_slot.is_equipment() || self.equip_slot.is_accessory();
        match self.object_type {
            ObjectType::Equipment | ObjectType::Accessory => {
                if self.body_slot != BodySlot::Unknown || !gear_slot || self.secondary_id.id() != 0 {
                    return None;
                }
                let slot = self.equip_slot;
                Some(if self.object_type == ObjectType::Equipment {
                    ImcSchema::Equipment { slot }
                } else {
                    ImcSchema::Accessory { slot }
                })
            }
            ObjectType::DemiHuman => {
                if self.body_slot != BodySlot::Unknown || !gear_slot {
                    return None;
                }
                Some(ImcSchema::DemiHuman {
                    secondary_id: self.secondary_id,
                    slot: self.equip_slot,
                })
            }
            ObjectType::Monster | ObjectType::Weapon => {
                if self.equip_slot != EquipSlot::Unknown {
                    return None;
                }
                let (secondary_id, body_slot) = (self.secondary_id, self.body_slot);
                Some(if self.object_type == ObjectType::Monster {
                    ImcSchema::Monster {
                        secondary_id,
                        body_slot,
                    }
                } else {
                    ImcSchema::Weapon {
                        secondary_id,
                        body_slot,
                    }
                })
            }
            // No variant table exists for any other object type
            _ => None,
        }
    }

    /// Path of the IMC table owning this record
    pub fn table_path(&self) -> MetaResult<GamePath> {
        let path = match self.object_type {
            ObjectType::Equipment => templates::equipment_imc(self.primary_id),
            ObjectType::Accessory => templates::accessory_imc(self.primary_id),
            ObjectType::DemiHuman => templates::demihuman_imc(self.primary_id, self.secondary_id),
            ObjectType::Monster => templates::monster_imc(self.primary_id, self.secondary_id),
            ObjectType::Weapon => templates::weapon_imc(self.primary_id, self.secondary_id),
            other => return Err(MetaError::NotApplicable(other)),
        };
        Ok(GamePath::new(&path)?)
    }

    /// A material path that depends on this record
    ///
    /// Gear records do not depend on race, so the Midlander male race code is
    /// used. Returns the empty path when no material template applies.
    pub fn representative_path(&self) -> GamePath {
        let variant = u16::from(self.variant.id());
        let path = match self.object_type {
            ObjectType::Equipment | ObjectType::Accessory => templates::equipment_mtrl(
                self.primary_id,
                GenderRace::MidlanderMale,
                self.equip_slot,
                variant,
                REPRESENTATIVE_SUFFIX,
            ),
            ObjectType::Weapon => Some(templates::weapon_mtrl(
                self.primary_id,
                self.secondary_id,
                variant,
                REPRESENTATIVE_SUFFIX,
            )),
            ObjectType::DemiHuman => templates::demihuman_mtrl(
                self.primary_id,
                self.secondary_id,
                self.equip_slot,
                variant,
                REPRESENTATIVE_SUFFIX,
            ),
            ObjectType::Monster => Some(templates::monster_mtrl(
                self.primary_id,
                self.secondary_id,
                variant,
                REPRESENTATIVE_SUFFIX,
            )),
            _ => None,
        };

        path.and_then(|p| GamePath::new(&p).ok()).unwrap_or_default()
    }

    /// Secondary id, body slot, variant
    fn cmp_body(&self, other: &Self) -> Ordering {
        self.secondary_id
            .cmp(&other.secondary_id)
            .then(self.body_slot.cmp(&other.body_slot))
            .then(self.variant.cmp(&other.variant))
    }
}

impl MetaIdentifier for ImcIdentifier {
    fn validate(&self) -> bool {
        self.schema().is_some()
    }

    fn game_path(&self) -> MetaResult<GamePath> {
        self.table_path()
    }

    fn file_index(&self) -> Option<MetaIndex> {
        None
    }

    fn add_changed_items<I>(&self, identification: &I, items: &mut ChangedItems<I::Item>)
    where
        I: ObjectIdentification + ?Sized,
    {
        let path = self.representative_path();
        if path.is_empty() {
            return;
        }
        identification.identify(items, &path);
    }

    fn to_json(&self) -> serde_json::Value {
        ImcIdentifier::to_json(self)
    }
}

impl Ord for ImcIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        let schema_order = self
            .object_type
            .cmp(&other.object_type)
            .then(self.primary_id.cmp(&other.primary_id))
            .then_with(|| match self.object_type {
                ObjectType::Equipment | ObjectType::Accessory => self
                    .equip_slot
                    .cmp(&other.equip_slot)
                    .then(self.variant.cmp(&other.variant)),
                ObjectType::DemiHuman => self
                    .equip_slot
                    .cmp(&other.equip_slot)
                    .then_with(|| self.cmp_body(other)),
                _ => self.cmp_body(other),
            });

        // Fields the schema order ignores; constant across valid identifiers
        schema_order
            .then(self.secondary_id.cmp(&other.secondary_id))
            .then(self.body_slot.cmp(&other.body_slot))
            .then(self.equip_slot.cmp(&other.equip_slot))
    }
}

impl PartialOrd for ImcIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ImcIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object_type {
            ObjectType::Equipment | ObjectType::Accessory => write!(
                f,
                "Imc - {} - {} - {}",
                self.primary_id,
                self.equip_slot.name(),
                self.variant
            ),
            _ => write!(
                f,
                "Imc - {} - {} - {} - {} - {}",
                self.primary_id,
                self.object_type.name(),
                self.secondary_id,
                self.body_slot,
                self.variant
            ),
        }
    }
}
