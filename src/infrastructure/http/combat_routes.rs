//! Combat API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::ActionResponseDto;
use crate::domain::entities::CombatSession;
use crate::domain::services::combat_engine::CombatAction;
use crate::infrastructure::http::{error_response, parse_character_id, parse_session_id};
use crate::infrastructure::state::AppState;

/// Start a fight, or resume the one already in progress
pub async fn initiate_combat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CombatSession>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let session = state
        .combat_service
        .initiate_combat(character_id)
        .await
        .map_err(error_response)?;

    Ok(Json(session))
}

/// Read a session without acting on it
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path((id, session_id)): Path<(String, String)>,
) -> Result<Json<CombatSession>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;
    let session_id = parse_session_id(&session_id)?;

    let session = state
        .combat_service
        .get_session(character_id, session_id)
        .await
        .map_err(error_response)?;

    Ok(Json(session))
}

/// Resolve one player action and the enemy's response
pub async fn resolve_action(
    State(state): State<Arc<AppState>>,
    Path((id, session_id)): Path<(String, String)>,
    Json(action): Json<CombatAction>,
) -> Result<Json<ActionResponseDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;
    let session_id = parse_session_id(&session_id)?;

    let outcome = state
        .combat_service
        .resolve_action(character_id, session_id, action)
        .await
        .map_err(error_response)?;

    Ok(Json(ActionResponseDto::from(outcome)))
}
