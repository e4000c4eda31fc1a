//! Persisted JSON form of variant identifiers
//!
//! ```text
//! {
//!   "ObjectType": "Equipment",
//!   "PrimaryId": 42,
//!   "SecondaryId": 0,
//!   "Variant": 3,
//!   "EquipSlot": "Head",
//!   "BodySlot": "Unknown"
//! }
//! ```
//!
//! Reading is lenient: missing or mistyped fields fall back to zero/`Unknown`.
//! Only an out-of-range variant, an object type without a variant table, or a
//! result that fails validation rejects the entry.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use mirage_sdk::{BodySlot, EquipSlot, ObjectType, PrimaryId, SecondaryId, Variant};

use super::{ImcIdentifier, MetaError, MetaIdentifier, MetaResult};

/// Read one field, substituting `None` for missing or mistyped values
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key)?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Substituting default for malformed field {}: {}", key, e);
            None
        }
    }
}

impl ImcIdentifier {
    /// Write all fields into an existing JSON object
    pub fn add_to_json(&self, obj: &mut Map<String, Value>) {
        obj.insert("ObjectType".into(), serde_json::json!(self.object_type()));
        obj.insert("PrimaryId".into(), self.primary_id().id().into());
        obj.insert("SecondaryId".into(), self.secondary_id().id().into());
        obj.insert("Variant".into(), self.variant().id().into());
        obj.insert("EquipSlot".into(), serde_json::json!(self.equip_slot()));
        obj.insert("BodySlot".into(), serde_json::json!(self.body_slot()));
    }

    /// Persisted JSON form
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        self.add_to_json(&mut obj);
        Value::Object(obj)
    }

    /// Parse the persisted JSON form, reporting why an entry was rejected
    pub fn parse_json(value: &Value) -> MetaResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| MetaError::Malformed(format!("expected an object, got {}", value)))?;

        let object_type: ObjectType = field(obj, "ObjectType").unwrap_or_default();
        let primary_id = PrimaryId::new(field(obj, "PrimaryId").unwrap_or_default());
        let variant: u64 = field(obj, "Variant").unwrap_or_default();
        let variant = u8::try_from(variant)
            .map(Variant::new)
            .map_err(|_| MetaError::Malformed(format!("variant {} out of range", variant)))?;

        let id = match object_type {
            ObjectType::Equipment | ObjectType::Accessory => ImcIdentifier::from_parts(
                primary_id,
                variant,
                object_type,
                SecondaryId::new(0),
                field(obj, "EquipSlot").unwrap_or_default(),
                BodySlot::Unknown,
            ),
            ObjectType::DemiHuman => {
                // Older edits stored the slot under "Slot"
                let slot: EquipSlot = field(obj, "EquipSlot")
                    .or_else(|| field(obj, "Slot"))
                    .unwrap_or_default();
                ImcIdentifier::from_parts(
                    primary_id,
                    variant,
                    object_type,
                    SecondaryId::new(field(obj, "SecondaryId").unwrap_or_default()),
                    slot,
                    BodySlot::Unknown,
                )
            }
            ObjectType::Monster | ObjectType::Weapon => ImcIdentifier::from_parts(
                primary_id,
                variant,
                object_type,
                SecondaryId::new(field(obj, "SecondaryId").unwrap_or_default()),
                EquipSlot::Unknown,
                field(obj, "BodySlot").unwrap_or(BodySlot::Body),
            ),
            other => return Err(MetaError::NotApplicable(other)),
        };

        if id.validate() {
            Ok(id)
        } else {
            Err(MetaError::Validation(id.to_string()))
        }
    }

    /// Parse the persisted JSON form
    ///
    /// Returns `None` for rejected entries; the reason is logged at debug level.
    pub fn from_json(value: &Value) -> Option<Self> {
        match Self::parse_json(value) {
            Ok(id) => Some(id),
            Err(e) => {
                debug!("Discarding persisted IMC identifier: {}", e);
                None
            }
        }
    }
}

impl Serialize for ImcIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ImcIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::parse_json(&value).map_err(D::Error::custom)
    }
}
