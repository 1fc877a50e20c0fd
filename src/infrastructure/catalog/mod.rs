//! Static game catalog - Seed data for enemies, dungeons, items and skills
//!
//! The catalog is built once at startup and checked for internal
//! consistency before the server accepts requests. A failed check means the
//! seed data is wrong, not that a player did something invalid.

mod dungeons;
mod enemies;
mod items;
mod skills;

use std::collections::HashMap;

use tracing::{debug, error};

use crate::application::ports::outbound::CatalogPort;
use crate::domain::entities::{Dungeon, EnemyTemplate, ItemTemplate, SkillDefinition};
use crate::domain::errors::EngineError;
use crate::domain::services::enemy_scaler::{scaling_factor_percent, MAX_TIER, MIN_TIER};
use crate::domain::services::lookup::{EnemyLookup, ItemLookup, SkillLookup};
use crate::domain::value_objects::{
    CharacterClass, DungeonId, EnemyTemplateId, ItemTemplateId, SkillId,
};

/// Player levels at which random encounters first draw from `tier`
fn first_level_of_tier(tier: u8) -> u32 {
    5 * (tier as u32 - 1) + 1
}

pub struct StaticCatalog {
    enemies: Vec<EnemyTemplate>,
    enemy_index: HashMap<EnemyTemplateId, usize>,
    items: HashMap<ItemTemplateId, ItemTemplate>,
    skills: HashMap<SkillId, SkillDefinition>,
    dungeons: HashMap<DungeonId, Dungeon>,
}

impl StaticCatalog {
    pub fn from_parts(
        enemies: Vec<EnemyTemplate>,
        items: Vec<ItemTemplate>,
        skills: Vec<SkillDefinition>,
        dungeons: Vec<Dungeon>,
    ) -> Self {
        let enemy_index = enemies
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        Self {
            enemies,
            enemy_index,
            items: items.into_iter().map(|t| (t.id.clone(), t)).collect(),
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
            dungeons: dungeons.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    /// The built-in game content, unvalidated
    pub fn seeded() -> Self {
        Self::from_parts(
            enemies::enemy_templates(),
            items::item_templates(),
            skills::skill_table(),
            dungeons::dungeon_table(),
        )
    }

    /// The built-in game content, rejected if inconsistent
    pub fn load() -> Result<Self, EngineError> {
        let catalog = Self::seeded();
        catalog.validate()?;
        debug!(
            enemies = catalog.enemies.len(),
            items = catalog.items.len(),
            skills = catalog.skills.len(),
            dungeons = catalog.dungeons.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Check every cross-reference and scaling bound in the catalog
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_inner()
            .inspect_err(|e| error!(error = %e, "Catalog validation failed"))
    }

    fn validate_inner(&self) -> Result<(), EngineError> {
        if self.enemy_index.len() != self.enemies.len() {
            return Err(EngineError::Catalog("duplicate enemy template id".to_string()));
        }

        for tier in MIN_TIER..=MAX_TIER {
            let members: Vec<&EnemyTemplate> =
                self.enemies.iter().filter(|t| t.tier == tier).collect();
            if members.is_empty() {
                return Err(EngineError::EmptyTier(tier));
            }
            let level = first_level_of_tier(tier);
            for template in members {
                if scaling_factor_percent(template.base_level, level) < 0 {
                    return Err(EngineError::Catalog(format!(
                        "enemy {} scales negatively at level {}",
                        template.id, level
                    )));
                }
            }
        }

        for dungeon in self.dungeons.values() {
            if dungeon.encounter_count() == 0 {
                return Err(EngineError::Catalog(format!(
                    "dungeon {} has no encounters",
                    dungeon.id
                )));
            }
            for encounter in dungeon.encounters() {
                let template = self
                    .enemy_template(&encounter.enemy_template_id)
                    .ok_or_else(|| {
                        EngineError::MissingEnemyTemplate(encounter.enemy_template_id.clone())
                    })?;
                if scaling_factor_percent(template.base_level, encounter.level) < 0 {
                    return Err(EngineError::Catalog(format!(
                        "dungeon {} encounter {} scales {} negatively",
                        dungeon.id, encounter.position, template.id
                    )));
                }
            }
            for grant in &dungeon.completion.items {
                if !self.items.contains_key(&grant.template_id) {
                    return Err(EngineError::Catalog(format!(
                        "dungeon {} rewards unknown item {}",
                        dungeon.id, grant.template_id
                    )));
                }
            }
        }

        for class in [CharacterClass::Warrior, CharacterClass::Mage, CharacterClass::Rogue] {
            if self.skills_for(class).is_empty() {
                return Err(EngineError::Catalog(format!("no skills for {}", class)));
            }
        }
        Ok(())
    }
}

impl ItemLookup for StaticCatalog {
    fn item_template(&self, id: &ItemTemplateId) -> Option<&ItemTemplate> {
        self.items.get(id)
    }
}

impl EnemyLookup for StaticCatalog {
    fn enemy_template(&self, id: &EnemyTemplateId) -> Option<&EnemyTemplate> {
        self.enemy_index.get(id).map(|&i| &self.enemies[i])
    }
}

impl SkillLookup for StaticCatalog {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }
}

impl CatalogPort for StaticCatalog {
    fn enemies(&self) -> &[EnemyTemplate] {
        &self.enemies
    }

    fn dungeon(&self, id: &DungeonId) -> Option<&Dungeon> {
        self.dungeons.get(id)
    }

    fn dungeons(&self) -> Vec<&Dungeon> {
        let mut dungeons: Vec<&Dungeon> = self.dungeons.values().collect();
        dungeons.sort_by(|a, b| {
            a.required_level
                .cmp(&b.required_level)
                .then_with(|| a.id.cmp(&b.id))
        });
        dungeons
    }

    fn skills_for(&self, class: CharacterClass) -> Vec<&SkillDefinition> {
        let mut skills: Vec<&SkillDefinition> =
            self.skills.values().filter(|s| s.class == class).collect();
        skills.sort_by(|a, b| a.mana_cost.cmp(&b.mana_cost).then_with(|| a.id.cmp(&b.id)));
        skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EnemyStats;

    #[test]
    fn test_seed_data_is_consistent() {
        let catalog = StaticCatalog::load().unwrap();
        assert_eq!(catalog.enemies().len(), 15);
        assert_eq!(catalog.dungeons().len(), 3);
        assert_eq!(catalog.skills.len(), 18);
        for class in [CharacterClass::Warrior, CharacterClass::Mage, CharacterClass::Rogue] {
            assert_eq!(catalog.skills_for(class).len(), 6);
        }
        for tier in MIN_TIER..=MAX_TIER {
            assert_eq!(catalog.enemies().iter().filter(|t| t.tier == tier).count(), 3);
        }
    }

    #[test]
    fn test_dungeons_sorted_by_level() {
        let catalog = StaticCatalog::seeded();
        let levels: Vec<u32> = catalog.dungeons().iter().map(|d| d.required_level).collect();
        assert_eq!(levels, vec![1, 8, 18]);
    }

    #[test]
    fn test_dangling_dungeon_enemy_is_rejected() {
        let catalog = StaticCatalog::from_parts(
            enemies::enemy_templates(),
            items::item_templates(),
            skills::skill_table(),
            vec![Dungeon::new("void", "Void", 1).with_encounter("phantom", 1)],
        );
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, EngineError::MissingEnemyTemplate(_)));
    }

    #[test]
    fn test_empty_tier_is_rejected() {
        let mut enemies = enemies::enemy_templates();
        enemies.retain(|t| t.tier != 4);
        let catalog = StaticCatalog::from_parts(enemies, Vec::new(), skills::skill_table(), Vec::new());
        assert!(matches!(catalog.validate(), Err(EngineError::EmptyTier(4))));
    }

    #[test]
    fn test_negative_scaling_is_rejected() {
        let mut enemies = enemies::enemy_templates();
        enemies.push(EnemyTemplate::new(
            "titan",
            "Titan",
            1,
            30,
            EnemyStats {
                hp: 1000,
                strength: 80,
                defense: 40,
                mana: 0,
            },
        ));
        let catalog = StaticCatalog::from_parts(enemies, Vec::new(), skills::skill_table(), Vec::new());
        assert!(matches!(catalog.validate(), Err(EngineError::Catalog(_))));
    }
}
