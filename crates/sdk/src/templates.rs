//! Path templates for metadata tables and materials
//!
//! Every model owns one variant table (`.imc`) next to its model folder, and
//! one material folder per variant:
//!
//! ```text
//! chara/equipment/e0042/e0042.imc
//! chara/equipment/e0042/material/v0003/mt_c0101e0042_met_a.mtrl
//! chara/accessory/a0042/a0042.imc
//! chara/weapon/w0001/obj/body/b0002/b0002.imc
//! chara/weapon/w0001/obj/body/b0002/material/v0003/mt_w0001b0002_a.mtrl
//! chara/monster/m0001/obj/body/b0002/b0002.imc
//! chara/demihuman/d0001/obj/equipment/e0002/e0002.imc
//! ```
//!
//! The parse functions are the inverses of the builders and are used to map a
//! load request back to the record it touches.

use crate::ids::{PrimaryId, SecondaryId};
use crate::types::{EquipSlot, GenderRace, ObjectType};

/// Variant table path for equipment
pub fn equipment_imc(id: PrimaryId) -> String {
    format!("chara/equipment/e{:04}/e{:04}.imc", id.id(), id.id())
}

/// Variant table path for accessories
pub fn accessory_imc(id: PrimaryId) -> String {
    format!("chara/accessory/a{:04}/a{:04}.imc", id.id(), id.id())
}

/// Variant table path for weapons
pub fn weapon_imc(id: PrimaryId, body: SecondaryId) -> String {
    format!(
        "chara/weapon/w{:04}/obj/body/b{:04}/b{:04}.imc",
        id.id(),
        body.id(),
        body.id()
    )
}

/// Variant table path for monsters
pub fn monster_imc(id: PrimaryId, body: SecondaryId) -> String {
    format!(
        "chara/monster/m{:04}/obj/body/b{:04}/b{:04}.imc",
        id.id(),
        body.id(),
        body.id()
    )
}

/// Variant table path for demihumans
pub fn demihuman_imc(id: PrimaryId, equipment: SecondaryId) -> String {
    format!(
        "chara/demihuman/d{:04}/obj/equipment/e{:04}/e{:04}.imc",
        id.id(),
        equipment.id(),
        equipment.id()
    )
}

/// Material path for an equipment or accessory piece
///
/// Returns `None` for slots without a file suffix.
pub fn equipment_mtrl(
    id: PrimaryId,
    race: GenderRace,
    slot: EquipSlot,
    variant: u16,
    suffix: &str,
) -> Option<String> {
    let slot_suffix = slot.suffix()?;
    let (folder, prefix) = if slot.is_accessory() {
        ("accessory", 'a')
    } else {
        ("equipment", 'e')
    };
    Some(format!(
        "chara/{folder}/{prefix}{id:04}/material/v{variant:04}/mt_c{race:04}{prefix}{id:04}_{slot_suffix}_{suffix}.mtrl",
        id = id.id(),
        race = race.code(),
    ))
}

/// Material path for a weapon body
pub fn weapon_mtrl(id: PrimaryId, body: SecondaryId, variant: u16, suffix: &str) -> String {
    format!(
        "chara/weapon/w{id:04}/obj/body/b{body:04}/material/v{variant:04}/mt_w{id:04}b{body:04}_{suffix}.mtrl",
        id = id.id(),
        body = body.id(),
    )
}

/// Material path for a monster body
pub fn monster_mtrl(id: PrimaryId, body: SecondaryId, variant: u16, suffix: &str) -> String {
    format!(
        "chara/monster/m{id:04}/obj/body/b{body:04}/material/v{variant:04}/mt_m{id:04}b{body:04}_{suffix}.mtrl",
        id = id.id(),
        body = body.id(),
    )
}

/// Material path for a demihuman equipment piece
///
/// Returns `None` for slots without a file suffix.
pub fn demihuman_mtrl(
    id: PrimaryId,
    equipment: SecondaryId,
    slot: EquipSlot,
    variant: u16,
    suffix: &str,
) -> Option<String> {
    let slot_suffix = slot.suffix()?;
    Some(format!(
        "chara/demihuman/d{id:04}/obj/equipment/e{eq:04}/material/v{variant:04}/mt_d{id:04}e{eq:04}_{slot_suffix}_{suffix}.mtrl",
        id = id.id(),
        eq = equipment.id(),
    ))
}

/// Model addressed by a variant table path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableKey {
    pub object_type: ObjectType,
    pub primary_id: PrimaryId,
    pub secondary_id: SecondaryId,
}

/// Record addressed by a material path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialKey {
    pub object_type: ObjectType,
    pub primary_id: PrimaryId,
    pub secondary_id: SecondaryId,
    /// Raw variant folder number, may exceed the variant range
    pub variant: u16,
    /// `Unknown` for weapon and monster materials
    pub slot: EquipSlot,
}

/// Parse `{prefix}{digits}` into an id
fn prefixed_id(segment: &str, prefix: char) -> Option<u16> {
    plain_id(segment.strip_prefix(prefix)?)
}

/// Parse a run of ASCII digits; signs and whitespace are rejected
fn plain_id(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse a table file name `{prefix}{digits}.imc` and check it matches the folder
fn table_file(file: &str, prefix: char, expected: u16) -> Option<()> {
    let stem = file.strip_suffix(".imc")?;
    (prefixed_id(stem, prefix)? == expected).then_some(())
}

/// Parse a variant table path
///
/// Input is expected in normalized form (see [`crate::GamePath`]).
pub fn parse_table_path(path: &str) -> Option<TableKey> {
    let segments: Vec<&str> = path.split('/').collect();
    let (object_type, primary, secondary) = match segments.as_slice() {
        ["chara", "equipment", folder, file] => {
            let id = prefixed_id(folder, 'e')?;
            table_file(file, 'e', id)?;
            (ObjectType::Equipment, id, 0)
        }
        ["chara", "accessory", folder, file] => {
            let id = prefixed_id(folder, 'a')?;
            table_file(file, 'a', id)?;
            (ObjectType::Accessory, id, 0)
        }
        ["chara", "weapon", folder, "obj", "body", body, file] => {
            let body = prefixed_id(body, 'b')?;
            table_file(file, 'b', body)?;
            (ObjectType::Weapon, prefixed_id(folder, 'w')?, body)
        }
        ["chara", "monster", folder, "obj", "body", body, file] => {
            let body = prefixed_id(body, 'b')?;
            table_file(file, 'b', body)?;
            (ObjectType::Monster, prefixed_id(folder, 'm')?, body)
        }
        ["chara", "demihuman", folder, "obj", "equipment", equipment, file] => {
            let equipment = prefixed_id(equipment, 'e')?;
            table_file(file, 'e', equipment)?;
            (ObjectType::DemiHuman, prefixed_id(folder, 'd')?, equipment)
        }
        _ => return None,
    };

    Some(TableKey {
        object_type,
        primary_id: PrimaryId::new(primary),
        secondary_id: SecondaryId::new(secondary),
    })
}

/// Split `mt_{model}_{parts...}.mtrl` into the model token and the remaining parts
fn material_file(file: &str) -> Option<(&str, Vec<&str>)> {
    let stem = file.strip_prefix("mt_")?.strip_suffix(".mtrl")?;
    let mut parts = stem.split('_');
    let model = parts.next()?;
    Some((model, parts.collect()))
}

/// Parse `c{race}{prefix}{id}` from a gear material name
fn gear_model(model: &str, prefix: char, expected: u16) -> Option<()> {
    let rest = model.strip_prefix('c')?;
    let (race, id) = rest.split_at_checked(4)?;
    if !race.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    (prefixed_id(id, prefix)? == expected).then_some(())
}

/// Parse `{first}{a}{second}{b}` from a body material name
fn body_model(model: &str, first: char, a: u16, second: char, b: u16) -> Option<()> {
    let rest = model.strip_prefix(first)?;
    let split = rest.find(second)?;
    let (lhs, rhs) = rest.split_at(split);
    (plain_id(lhs)? == a && prefixed_id(rhs, second)? == b).then_some(())
}

/// Parse a material path
///
/// Input is expected in normalized form (see [`crate::GamePath`]).
pub fn parse_material_path(path: &str) -> Option<MaterialKey> {
    let segments: Vec<&str> = path.split('/').collect();
    let (object_type, primary, secondary, variant, slot) = match segments.as_slice() {
        ["chara", kind @ ("equipment" | "accessory"), folder, "material", variant, file] => {
            let prefix = if *kind == "equipment" { 'e' } else { 'a' };
            let id = prefixed_id(folder, prefix)?;
            let (model, parts) = material_file(file)?;
            gear_model(model, prefix, id)?;
            let slot = EquipSlot::from_suffix(parts.first()?)?;
            if slot.is_accessory() != (prefix == 'a') {
                return None;
            }
            let object_type = if prefix == 'a' {
                ObjectType::Accessory
            } else {
                ObjectType::Equipment
            };
            (object_type, id, 0, prefixed_id(variant, 'v')?, slot)
        }
        ["chara", kind @ ("weapon" | "monster"), folder, "obj", "body", body, "material", variant, file] => {
            let (prefix, object_type) = if *kind == "weapon" {
                ('w', ObjectType::Weapon)
            } else {
                ('m', ObjectType::Monster)
            };
            let id = prefixed_id(folder, prefix)?;
            let body = prefixed_id(body, 'b')?;
            let (model, _) = material_file(file)?;
            body_model(model, prefix, id, 'b', body)?;
            (object_type, id, body, prefixed_id(variant, 'v')?, EquipSlot::Unknown)
        }
        ["chara", "demihuman", folder, "obj", "equipment", equipment, "material", variant, file] => {
            let id = prefixed_id(folder, 'd')?;
            let equipment = prefixed_id(equipment, 'e')?;
            let (model, parts) = material_file(file)?;
            body_model(model, 'd', id, 'e', equipment)?;
            let slot = EquipSlot::from_suffix(parts.first()?)?;
            (ObjectType::DemiHuman, id, equipment, prefixed_id(variant, 'v')?, slot)
        }
        _ => return None,
    };

    Some(MaterialKey {
        object_type,
        primary_id: PrimaryId::new(primary),
        secondary_id: SecondaryId::new(secondary),
        variant,
        slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_templates() {
        assert_eq!(
            equipment_imc(PrimaryId::new(42)),
            "chara/equipment/e0042/e0042.imc"
        );
        assert_eq!(
            accessory_imc(PrimaryId::new(7)),
            "chara/accessory/a0007/a0007.imc"
        );
        assert_eq!(
            weapon_imc(PrimaryId::new(1), SecondaryId::new(2)),
            "chara/weapon/w0001/obj/body/b0002/b0002.imc"
        );
        assert_eq!(
            monster_imc(PrimaryId::new(8001), SecondaryId::new(12)),
            "chara/monster/m8001/obj/body/b0012/b0012.imc"
        );
        assert_eq!(
            demihuman_imc(PrimaryId::new(1), SecondaryId::new(3)),
            "chara/demihuman/d0001/obj/equipment/e0003/e0003.imc"
        );
    }

    #[test]
    fn test_material_templates() {
        assert_eq!(
            equipment_mtrl(PrimaryId::new(42), GenderRace::MidlanderMale, EquipSlot::Head, 3, "a").as_deref(),
            Some("chara/equipment/e0042/material/v0003/mt_c0101e0042_met_a.mtrl")
        );
        assert_eq!(
            equipment_mtrl(PrimaryId::new(5), GenderRace::MidlanderMale, EquipSlot::Ears, 1, "a").as_deref(),
            Some("chara/accessory/a0005/material/v0001/mt_c0101a0005_ear_a.mtrl")
        );
        assert_eq!(
            equipment_mtrl(PrimaryId::new(5), GenderRace::MidlanderMale, EquipSlot::BodyHands, 1, "a"),
            None
        );
        assert_eq!(
            weapon_mtrl(PrimaryId::new(1), SecondaryId::new(2), 0, "a"),
            "chara/weapon/w0001/obj/body/b0002/material/v0000/mt_w0001b0002_a.mtrl"
        );
        assert_eq!(
            demihuman_mtrl(PrimaryId::new(1), SecondaryId::new(2), EquipSlot::Legs, 4, "a").as_deref(),
            Some("chara/demihuman/d0001/obj/equipment/e0002/material/v0004/mt_d0001e0002_dwn_a.mtrl")
        );
    }

    #[test]
    fn test_parse_table_paths() {
        let key = parse_table_path("chara/equipment/e0042/e0042.imc").unwrap();
        assert_eq!(key.object_type, ObjectType::Equipment);
        assert_eq!(key.primary_id, PrimaryId::new(42));
        assert_eq!(key.secondary_id, SecondaryId::new(0));

        let key = parse_table_path(&weapon_imc(PrimaryId::new(201), SecondaryId::new(9))).unwrap();
        assert_eq!(key.object_type, ObjectType::Weapon);
        assert_eq!(key.primary_id, PrimaryId::new(201));
        assert_eq!(key.secondary_id, SecondaryId::new(9));

        let key = parse_table_path(&demihuman_imc(PrimaryId::new(3), SecondaryId::new(4))).unwrap();
        assert_eq!(key.object_type, ObjectType::DemiHuman);
    }

    #[test]
    fn test_parse_table_rejects() {
        // Folder and file disagree
        assert_eq!(parse_table_path("chara/equipment/e0042/e0043.imc"), None);
        assert_eq!(parse_table_path("chara/equipment/e0042/e0042.mdl"), None);
        assert_eq!(parse_table_path("chara/equipment/ex042/ex042.imc"), None);
        assert_eq!(parse_table_path("bg/ffxiv/sea_s1/e0042.imc"), None);
        assert_eq!(parse_table_path(""), None);
    }

    #[test]
    fn test_parse_material_paths() {
        let key = parse_material_path("chara/equipment/e0042/material/v0003/mt_c0201e0042_met_b.mtrl").unwrap();
        assert_eq!(key.object_type, ObjectType::Equipment);
        assert_eq!(key.primary_id, PrimaryId::new(42));
        assert_eq!(key.variant, 3);
        assert_eq!(key.slot, EquipSlot::Head);

        let key = parse_material_path("chara/accessory/a0005/material/v0001/mt_c0101a0005_ear_a.mtrl").unwrap();
        assert_eq!(key.object_type, ObjectType::Accessory);
        assert_eq!(key.slot, EquipSlot::Ears);

        let key = parse_material_path(&monster_mtrl(PrimaryId::new(8001), SecondaryId::new(2), 12, "a")).unwrap();
        assert_eq!(key.object_type, ObjectType::Monster);
        assert_eq!(key.primary_id, PrimaryId::new(8001));
        assert_eq!(key.secondary_id, SecondaryId::new(2));
        assert_eq!(key.variant, 12);
        assert_eq!(key.slot, EquipSlot::Unknown);

        let path = demihuman_mtrl(PrimaryId::new(1), SecondaryId::new(2), EquipSlot::Feet, 4, "a").unwrap();
        let key = parse_material_path(&path).unwrap();
        assert_eq!(key.object_type, ObjectType::DemiHuman);
        assert_eq!(key.slot, EquipSlot::Feet);
    }

    #[test]
    fn test_parse_material_rejects() {
        // Accessory suffix in an equipment folder
        assert_eq!(
            parse_material_path("chara/equipment/e0042/material/v0003/mt_c0101e0042_ear_a.mtrl"),
            None
        );
        // Model id does not match folder
        assert_eq!(
            parse_material_path("chara/weapon/w0001/obj/body/b0002/material/v0001/mt_w0001b0003_a.mtrl"),
            None
        );
        assert_eq!(
            parse_material_path("chara/equipment/e0042/material/v0003/e0042.mtrl"),
            None
        );
    }

    #[test]
    fn test_parse_material_rejects_signed_ids() {
        assert_eq!(
            parse_material_path("chara/weapon/w0001/obj/body/b0002/material/v0001/mt_w+001b0002_a.mtrl"),
            None
        );
        assert_eq!(
            parse_material_path("chara/monster/m8001/obj/body/b0002/material/v0001/mt_m+8001b0002_a.mtrl"),
            None
        );
        assert!(
            parse_material_path("chara/weapon/w0001/obj/body/b0002/material/v0001/mt_w0001b0002_a.mtrl")
                .is_some()
        );
    }
}
