//! Character entity - The player's combatant and everything it owns

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ItemInstance, ItemTemplate};
use crate::domain::errors::EngineError;
use crate::domain::services::attribute_calculator::{self, DerivedStats};
use crate::domain::value_objects::{
    Attributes, CharacterClass, CharacterId, EquipmentSlot, ItemInstanceId,
};

/// Minimum time between two rests
pub const REST_COOLDOWN_HOURS: i64 = 8;

/// Current and maximum vitals plus the win/loss record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRecord {
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_mana: u32,
    pub max_mana: u32,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
    pub skill_points: u32,
    pub currency: u64,
    /// Rare drop spent on item enhancement
    pub forging_currency: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            skill_points: 0,
            currency: 0,
            forging_currency: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub attributes: Attributes,
    /// Sum of the contributions of every equipped item
    pub equipment_bonus: Attributes,
    pub combat: CombatRecord,
    pub progression: Progression,
    pub inventory: Vec<ItemInstance>,
    pub last_rest_at: Option<DateTime<Utc>>,
}

/// What a rest restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub hp_restored: u32,
    pub mana_restored: u32,
}

impl Character {
    /// Create a character at full health with no equipment
    pub fn new(name: impl Into<String>, class: CharacterClass, attributes: Attributes) -> Self {
        let max_hp = attribute_calculator::max_hp(&attributes);
        let max_mana = attribute_calculator::max_mana(&attributes);
        Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            attributes,
            equipment_bonus: Attributes::default(),
            combat: CombatRecord {
                current_hp: max_hp,
                max_hp,
                current_mana: max_mana,
                max_mana,
                wins: 0,
                losses: 0,
            },
            progression: Progression::default(),
            inventory: Vec::new(),
            last_rest_at: None,
        }
    }

    pub fn with_item(mut self, item: ItemInstance) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn total_attributes(&self) -> Attributes {
        self.attributes.plus(&self.equipment_bonus)
    }

    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats::from_totals(&self.total_attributes())
    }

    /// Recompute max HP/mana from totals and clamp current vitals downward
    pub fn recompute_vitals(&mut self) {
        let total = self.total_attributes();
        self.combat.max_hp = attribute_calculator::max_hp(&total);
        self.combat.max_mana = attribute_calculator::max_mana(&total);
        self.combat.current_hp = self.combat.current_hp.min(self.combat.max_hp);
        self.combat.current_mana = self.combat.current_mana.min(self.combat.max_mana);
    }

    /// Restore HP up to the maximum; returns the amount actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.combat.current_hp;
        self.combat.current_hp = before.saturating_add(amount).min(self.combat.max_hp);
        self.combat.current_hp - before
    }

    /// Restore mana up to the maximum; returns the amount actually restored
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.combat.current_mana;
        self.combat.current_mana = before.saturating_add(amount).min(self.combat.max_mana);
        self.combat.current_mana - before
    }

    pub fn item(&self, id: ItemInstanceId) -> Option<&ItemInstance> {
        self.inventory.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemInstanceId) -> Option<&mut ItemInstance> {
        self.inventory.iter_mut().find(|item| item.id == id)
    }

    pub fn equipped_in(&self, slot: EquipmentSlot) -> Option<&ItemInstance> {
        self.inventory
            .iter()
            .find(|item| item.equipped && item.slot == Some(slot))
    }

    /// Add items to the inventory, stacking consumables onto an existing instance
    pub fn add_item(&mut self, template: &ItemTemplate, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if template.is_stackable() {
            if let Some(stack) = self
                .inventory
                .iter_mut()
                .find(|item| item.template_id == template.id && !item.equipped)
            {
                stack.quantity = stack.quantity.saturating_add(quantity);
                return;
            }
            self.inventory
                .push(ItemInstance::new(template.id.clone(), quantity));
        } else {
            for _ in 0..quantity {
                self.inventory.push(ItemInstance::new(template.id.clone(), 1));
            }
        }
    }

    /// Consume one unit of an item, removing the instance when the stack runs out
    pub fn consume_one(&mut self, id: ItemInstanceId) -> Result<(), EngineError> {
        let position = self
            .inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or(EngineError::ItemNotOwned(id))?;
        let item = &mut self.inventory[position];
        if item.quantity <= 1 {
            self.inventory.remove(position);
        } else {
            item.quantity -= 1;
        }
        Ok(())
    }

    /// When the next rest becomes available, if it is still on cooldown
    pub fn rest_available_at(&self) -> Option<DateTime<Utc>> {
        self.last_rest_at
            .map(|at| at + Duration::hours(REST_COOLDOWN_HOURS))
    }

    /// Recover half of max HP and mana, at most once per cooldown window
    pub fn rest(&mut self, now: DateTime<Utc>) -> Result<RestOutcome, EngineError> {
        if let Some(available_at) = self.rest_available_at() {
            if now < available_at {
                let remaining = available_at - now;
                return Err(EngineError::RestOnCooldown {
                    remaining_minutes: remaining.num_minutes().max(1),
                });
            }
        }

        let hp_restored = self.heal(self.combat.max_hp / 2);
        let mana_restored = self.restore_mana(self.combat.max_mana / 2);
        self.last_rest_at = Some(now);

        Ok(RestOutcome {
            hp_restored,
            mana_restored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemType;

    fn fighter() -> Character {
        Character::new("Brom", CharacterClass::Warrior, Attributes::new(12, 3, 5, 4, 2))
    }

    #[test]
    fn test_new_character_starts_at_full_vitals() {
        let character = fighter();
        assert_eq!(character.combat.max_hp, 150);
        assert_eq!(character.combat.current_hp, 150);
        assert_eq!(character.combat.max_mana, 65);
        assert_eq!(character.combat.current_mana, 65);
        assert_eq!(character.progression.level, 1);
    }

    #[test]
    fn test_recompute_vitals_clamps_downward() {
        let mut character = fighter();
        character.equipment_bonus.vitality = 5;
        character.recompute_vitals();
        character.combat.current_hp = character.combat.max_hp;
        assert_eq!(character.combat.current_hp, 200);

        character.equipment_bonus.vitality = 0;
        character.recompute_vitals();
        assert_eq!(character.combat.max_hp, 150);
        assert_eq!(character.combat.current_hp, 150);
    }

    #[test]
    fn test_add_item_stacks_consumables_only() {
        let mut character = fighter();
        let potion = ItemTemplate::new("minor_health_potion", "Minor Health Potion", ItemType::Consumable);
        let sword = ItemTemplate::new("iron_sword", "Iron Sword", ItemType::Weapon);

        character.add_item(&potion, 2);
        character.add_item(&potion, 3);
        character.add_item(&sword, 2);

        assert_eq!(character.inventory.len(), 3);
        assert_eq!(character.inventory[0].quantity, 5);
    }

    #[test]
    fn test_consume_one_removes_empty_stack() {
        let mut character = fighter();
        let potion = ItemTemplate::new("minor_health_potion", "Minor Health Potion", ItemType::Consumable);
        character.add_item(&potion, 1);
        let id = character.inventory[0].id;

        character.consume_one(id).unwrap();
        assert!(character.inventory.is_empty());
        assert!(matches!(character.consume_one(id), Err(EngineError::ItemNotOwned(_))));
    }

    #[test]
    fn test_rest_cooldown() {
        let mut character = fighter();
        character.combat.current_hp = 10;
        character.combat.current_mana = 0;
        let now = Utc::now();

        let outcome = character.rest(now).unwrap();
        assert_eq!(outcome.hp_restored, 75);
        assert_eq!(outcome.mana_restored, 32);
        assert_eq!(character.combat.current_hp, 85);

        let too_soon = character.rest(now + Duration::hours(7));
        assert!(matches!(too_soon, Err(EngineError::RestOnCooldown { remaining_minutes: 60 })));

        assert!(character.rest(now + Duration::hours(8)).is_ok());
        assert_eq!(character.combat.current_hp, 150);
    }
}
