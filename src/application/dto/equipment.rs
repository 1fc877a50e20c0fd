use serde::{Deserialize, Serialize};

use crate::application::dto::CharacterResponseDto;
use crate::domain::services::equipment::{EnhanceOutcome, EquipOutcome};
use crate::domain::value_objects::{EquipmentSlot, ItemInstanceId};

#[derive(Debug, Clone, Deserialize)]
pub struct EquipRequestDto {
    pub item_id: ItemInstanceId,
    /// Inferred from the item when omitted
    #[serde(default)]
    pub slot: Option<EquipmentSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnhanceRequestDto {
    pub item_id: ItemInstanceId,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipResponseDto {
    pub outcome: EquipOutcome,
    pub character: CharacterResponseDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnequipResponseDto {
    pub item_id: ItemInstanceId,
    pub character: CharacterResponseDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhanceResponseDto {
    pub outcome: EnhanceOutcome,
    pub character: CharacterResponseDto,
}
