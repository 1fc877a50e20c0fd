//! Item templates (catalog) and item instances (owned by a character's inventory)

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Attributes, CharacterClass, EquipmentSlot, ItemInstanceId, ItemTemplateId,
};

/// Highest enhancement level an item can reach
pub const MAX_ENHANCEMENT_LEVEL: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Consumable,
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Entry of an item's class restriction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassTag {
    All,
    Warrior,
    Mage,
    Rogue,
}

impl ClassTag {
    pub fn admits(&self, class: CharacterClass) -> bool {
        match self {
            Self::All => true,
            Self::Warrior => class == CharacterClass::Warrior,
            Self::Mage => class == CharacterClass::Mage,
            Self::Rogue => class == CharacterClass::Rogue,
        }
    }
}

/// Numeric effect bag of an item template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemEffects {
    /// Flat HP restored on use
    pub heal: u32,
    /// Percentage of max HP restored on use
    pub heal_percent: u32,
    /// Flat mana restored on use
    pub mana: u32,
    /// Percentage of max mana restored on use
    pub mana_percent: u32,
    pub cure_poison: bool,
    /// Flat attribute buffs; the only effects enhancement multiplies
    pub attributes: Attributes,
    /// Set for temporary effects that expire after a number of minutes
    pub duration_minutes: Option<u32>,
}

impl ItemEffects {
    pub fn restores_anything(&self) -> bool {
        self.heal > 0
            || self.heal_percent > 0
            || self.mana > 0
            || self.mana_percent > 0
            || self.cure_poison
    }
}

/// Static item definition from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: ItemTemplateId,
    pub name: String,
    pub item_type: ItemType,
    /// Declared slot; `None` lets the equipment resolver infer one from the type
    pub slot: Option<EquipmentSlot>,
    pub allowed_classes: Vec<ClassTag>,
    pub effects: ItemEffects,
    pub rarity: Rarity,
    pub value: u32,
}

impl ItemTemplate {
    pub fn new(id: impl Into<ItemTemplateId>, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type,
            slot: None,
            allowed_classes: vec![ClassTag::All],
            effects: ItemEffects::default(),
            rarity: Rarity::Common,
            value: 0,
        }
    }

    pub fn with_slot(mut self, slot: EquipmentSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = ClassTag>) -> Self {
        self.allowed_classes = classes.into_iter().collect();
        self
    }

    pub fn with_effects(mut self, effects: ItemEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity, value: u32) -> Self {
        self.rarity = rarity;
        self.value = value;
        self
    }

    pub fn is_equippable(&self) -> bool {
        self.item_type != ItemType::Consumable && self.effects.duration_minutes.is_none()
    }

    pub fn allows_class(&self, class: CharacterClass) -> bool {
        self.allowed_classes.iter().any(|tag| tag.admits(class))
    }

    /// Consumables stack in one inventory instance; equipment never does
    pub fn is_stackable(&self) -> bool {
        self.item_type == ItemType::Consumable
    }
}

/// An item owned by a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub id: ItemInstanceId,
    pub template_id: ItemTemplateId,
    pub quantity: u32,
    pub equipped: bool,
    pub slot: Option<EquipmentSlot>,
    pub enhancement_level: u8,
}

impl ItemInstance {
    pub fn new(template_id: ItemTemplateId, quantity: u32) -> Self {
        Self {
            id: ItemInstanceId::new(),
            template_id,
            quantity: quantity.max(1),
            equipped: false,
            slot: None,
            enhancement_level: 0,
        }
    }
}

/// Bonus multiplier for an enhancement level, in percent.
///
/// 0 → 100%, 1..=4 → +20% per level, 5..=10 → 180% + 100% per level above 4.
pub fn enhancement_multiplier_percent(level: u8) -> u32 {
    match level {
        0 => 100,
        1..=4 => 100 + 20 * level as u32,
        _ => 180 + 100 * (level.min(MAX_ENHANCEMENT_LEVEL) as u32 - 4),
    }
}

/// Forging-currency cost to reach `target_level`
pub fn enhancement_cost(target_level: u8) -> Option<u64> {
    const COSTS: [u64; 10] = [3, 5, 7, 9, 12, 15, 18, 21, 24, 30];
    match target_level {
        1..=MAX_ENHANCEMENT_LEVEL => Some(COSTS[target_level as usize - 1]),
        _ => None,
    }
}

/// Attribute contribution of an item at a given enhancement level
pub fn enhanced_bonus(template: &ItemTemplate, level: u8) -> Attributes {
    template
        .effects
        .attributes
        .scaled_percent(enhancement_multiplier_percent(level))
}
