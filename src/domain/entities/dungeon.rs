//! Dungeon definitions - Ordered encounter lists with a completion bundle

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DungeonId, EnemyTemplateId, ItemTemplateId};

/// One fight within a dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonEncounter {
    pub position: u32,
    pub enemy_template_id: EnemyTemplateId,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub template_id: ItemTemplateId,
    pub quantity: u32,
}

/// Fixed rewards granted once when the final encounter is won
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionBundle {
    pub currency: u64,
    pub experience: u64,
    pub items: Vec<ItemGrant>,
    pub forging_currency: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    pub id: DungeonId,
    pub name: String,
    pub required_level: u32,
    encounters: Vec<DungeonEncounter>,
    pub completion: CompletionBundle,
}

impl Dungeon {
    pub fn new(id: impl Into<DungeonId>, name: impl Into<String>, required_level: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required_level,
            encounters: Vec::new(),
            completion: CompletionBundle::default(),
        }
    }

    /// Append an encounter; positions are assigned in insertion order
    pub fn with_encounter(mut self, enemy: impl Into<EnemyTemplateId>, level: u32) -> Self {
        let position = self.encounters.len() as u32;
        self.encounters.push(DungeonEncounter {
            position,
            enemy_template_id: enemy.into(),
            level,
        });
        self
    }

    pub fn with_completion(mut self, completion: CompletionBundle) -> Self {
        self.completion = completion;
        self
    }

    /// Encounters ordered by position
    pub fn encounters(&self) -> &[DungeonEncounter] {
        &self.encounters
    }

    pub fn encounter(&self, index: usize) -> Option<&DungeonEncounter> {
        self.encounters.get(index)
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_final(&self, index: usize) -> bool {
        index + 1 >= self.encounters.len()
    }
}
