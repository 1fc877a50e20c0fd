use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Character, ItemInstance, RestOutcome};
use crate::domain::services::attribute_calculator::DerivedStats;
use crate::domain::services::progression::experience_threshold;
use crate::domain::value_objects::{
    Attributes, CharacterClass, CharacterId, EquipmentSlot, ItemInstanceId, ItemTemplateId,
};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to create a character
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacterRequestDto {
    pub name: String,
    pub class: CharacterClass,
    #[serde(default)]
    pub attributes: Attributes,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItemDto {
    pub id: ItemInstanceId,
    pub template_id: ItemTemplateId,
    pub quantity: u32,
    pub equipped: bool,
    pub slot: Option<EquipmentSlot>,
    pub enhancement_level: u8,
}

impl From<&ItemInstance> for InventoryItemDto {
    fn from(item: &ItemInstance) -> Self {
        Self {
            id: item.id,
            template_id: item.template_id.clone(),
            quantity: item.quantity,
            equipped: item.equipped,
            slot: item.slot,
            enhancement_level: item.enhancement_level,
        }
    }
}

/// Character snapshot including everything derived from attributes
#[derive(Debug, Clone, Serialize)]
pub struct CharacterResponseDto {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub skill_points: u32,
    pub currency: u64,
    pub forging_currency: u64,
    pub attributes: Attributes,
    pub equipment_bonus: Attributes,
    pub total_attributes: Attributes,
    pub derived: DerivedStats,
    pub current_hp: u32,
    pub current_mana: u32,
    pub wins: u32,
    pub losses: u32,
    pub inventory: Vec<InventoryItemDto>,
    pub last_rest_at: Option<DateTime<Utc>>,
    pub rest_available_at: Option<DateTime<Utc>>,
}

impl From<&Character> for CharacterResponseDto {
    fn from(character: &Character) -> Self {
        let progression = &character.progression;
        Self {
            id: character.id,
            name: character.name.clone(),
            class: character.class,
            level: progression.level,
            experience: progression.experience,
            experience_to_next_level: experience_threshold(progression.level),
            skill_points: progression.skill_points,
            currency: progression.currency,
            forging_currency: progression.forging_currency,
            attributes: character.attributes,
            equipment_bonus: character.equipment_bonus,
            total_attributes: character.total_attributes(),
            derived: character.derived_stats(),
            current_hp: character.combat.current_hp,
            current_mana: character.combat.current_mana,
            wins: character.combat.wins,
            losses: character.combat.losses,
            inventory: character.inventory.iter().map(InventoryItemDto::from).collect(),
            last_rest_at: character.last_rest_at,
            rest_available_at: character.rest_available_at(),
        }
    }
}

impl From<Character> for CharacterResponseDto {
    fn from(character: Character) -> Self {
        Self::from(&character)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestResponseDto {
    pub hp_restored: u32,
    pub mana_restored: u32,
    pub character: CharacterResponseDto,
}

impl RestResponseDto {
    pub fn new(outcome: RestOutcome, character: &Character) -> Self {
        Self {
            hp_restored: outcome.hp_restored,
            mana_restored: outcome.mana_restored,
            character: character.into(),
        }
    }
}
