//! Catalog port - Read-only access to static game content
//!
//! Enemy templates, dungeons, item templates and the skill table are seed
//! data. The engine never writes to them.

use crate::domain::entities::{Dungeon, EnemyTemplate, SkillDefinition};
use crate::domain::services::lookup::{EnemyLookup, ItemLookup, SkillLookup};
use crate::domain::value_objects::{CharacterClass, DungeonId};

pub trait CatalogPort: ItemLookup + EnemyLookup + SkillLookup + Send + Sync {
    /// Every enemy template, across all tiers
    fn enemies(&self) -> &[EnemyTemplate];

    fn dungeon(&self, id: &DungeonId) -> Option<&Dungeon>;

    /// Dungeons ordered by required level
    fn dungeons(&self) -> Vec<&Dungeon>;

    fn skills_for(&self, class: CharacterClass) -> Vec<&SkillDefinition>;
}
