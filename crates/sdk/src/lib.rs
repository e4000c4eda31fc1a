//! mirage SDK - Game Data Type Definitions
//!
//! This crate contains the plain game data types shared by every mirage crate:
//! catalog ids, object/slot enums and the relative file paths the client loads.
//! It holds no state and compiles quickly, allowing parallel compilation of
//! dependent crates.
//!
//! # Modules
//!
//! - [`ids`] - Catalog id newtypes (primary, secondary, variant)
//! - [`types`] - Object types, equipment slots, body slots and race codes
//! - [`game_path`] - Normalized relative game paths
//! - [`templates`] - Path templates for metadata tables and materials

pub mod game_path;
pub mod ids;
pub mod templates;
pub mod types;

pub use game_path::{GamePath, PathError, MAX_GAME_PATH_LENGTH};
pub use ids::{PrimaryId, SecondaryId, Variant};
pub use types::{BodySlot, EquipSlot, GenderRace, ObjectType, UndefinedValue};
