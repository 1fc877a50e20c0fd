//! Domain layer - Combat and progression rules with no I/O
//!
//! This layer contains:
//! - Entities: Character, items, enemies, dungeons, combat sessions, skills
//! - Value Objects: Attributes, identifiers, slots
//! - Domain Services: Pure rule engines (attributes, scaling, equipment,
//!   turn resolution, rewards, dungeon progression)
//! - Errors: The engine's error taxonomy

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
