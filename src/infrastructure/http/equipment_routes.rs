//! Equipment API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{
    EnhanceRequestDto, EnhanceResponseDto, EquipRequestDto, EquipResponseDto, UnequipResponseDto,
};
use crate::domain::services::equipment::UnequipTarget;
use crate::infrastructure::http::{error_response, parse_character_id};
use crate::infrastructure::state::AppState;

/// Equip an owned item
pub async fn equip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EquipRequestDto>,
) -> Result<Json<EquipResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let (character, outcome) = state
        .equipment_service
        .equip(character_id, req.item_id, req.slot)
        .await
        .map_err(error_response)?;

    Ok(Json(EquipResponseDto {
        outcome,
        character: character.into(),
    }))
}

/// Unequip by slot or by item
pub async fn unequip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(target): Json<UnequipTarget>,
) -> Result<Json<UnequipResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let (character, item_id) = state
        .equipment_service
        .unequip(character_id, target)
        .await
        .map_err(error_response)?;

    Ok(Json(UnequipResponseDto {
        item_id,
        character: character.into(),
    }))
}

/// Raise an item's enhancement level by one
pub async fn enhance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EnhanceRequestDto>,
) -> Result<Json<EnhanceResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let (character, outcome) = state
        .equipment_service
        .enhance(character_id, req.item_id)
        .await
        .map_err(error_response)?;

    Ok(Json(EnhanceResponseDto {
        outcome,
        character: character.into(),
    }))
}
