//! Value objects - Immutable objects defined by their attributes

mod attributes;
mod ids;

pub use attributes::{Attributes, CharacterClass, DamageStyle, EquipmentSlot};
pub use ids::*;
