//! Read-only access to catalog templates needed by the rule engines

use std::collections::HashMap;

use crate::domain::entities::{EnemyTemplate, ItemTemplate, SkillDefinition};
use crate::domain::value_objects::{EnemyTemplateId, ItemTemplateId, SkillId};

pub trait ItemLookup {
    fn item_template(&self, id: &ItemTemplateId) -> Option<&ItemTemplate>;
}

pub trait EnemyLookup {
    fn enemy_template(&self, id: &EnemyTemplateId) -> Option<&EnemyTemplate>;
}

pub trait SkillLookup {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition>;
}

impl ItemLookup for HashMap<ItemTemplateId, ItemTemplate> {
    fn item_template(&self, id: &ItemTemplateId) -> Option<&ItemTemplate> {
        self.get(id)
    }
}

impl EnemyLookup for HashMap<EnemyTemplateId, EnemyTemplate> {
    fn enemy_template(&self, id: &EnemyTemplateId) -> Option<&EnemyTemplate> {
        self.get(id)
    }
}

impl SkillLookup for HashMap<SkillId, SkillDefinition> {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.get(id)
    }
}
