//! Character API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{CharacterResponseDto, CreateCharacterRequestDto, RestResponseDto};
use crate::application::services::CreateCharacterRequest;
use crate::domain::entities::SkillDefinition;
use crate::infrastructure::http::{error_response, parse_character_id};
use crate::infrastructure::state::AppState;

/// Create a character
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCharacterRequestDto>,
) -> Result<(StatusCode, Json<CharacterResponseDto>), (StatusCode, String)> {
    let service_request = CreateCharacterRequest {
        name: req.name,
        class: req.class,
        attributes: req.attributes,
    };

    let character = state
        .character_service
        .create_character(service_request)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CharacterResponseDto::from(character)),
    ))
}

/// Get a character with its derived stats
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let character = state
        .character_service
        .get_character(character_id)
        .await
        .map_err(error_response)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

/// Rest to recover HP and mana
pub async fn rest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RestResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let (character, outcome) = state
        .character_service
        .rest(character_id)
        .await
        .map_err(error_response)?;

    Ok(Json(RestResponseDto::new(outcome, &character)))
}

/// Skills available to the character's class, cheapest first
pub async fn list_skills(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SkillDefinition>>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let character = state
        .character_service
        .get_character(character_id)
        .await
        .map_err(error_response)?;

    let skills = state
        .catalog
        .skills_for(character.class)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(skills))
}
