//! Dungeon API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{DungeonContinuationDto, DungeonSummaryDto};
use crate::domain::entities::CombatSession;
use crate::domain::value_objects::DungeonId;
use crate::infrastructure::http::{error_response, parse_character_id};
use crate::infrastructure::state::AppState;

/// List dungeons, lowest level requirement first
pub async fn list_dungeons(State(state): State<Arc<AppState>>) -> Json<Vec<DungeonSummaryDto>> {
    let dungeons = state.dungeon_service.list_dungeons();
    Json(dungeons.iter().map(DungeonSummaryDto::from).collect())
}

/// Open a run at the first encounter
pub async fn start_dungeon(
    State(state): State<Arc<AppState>>,
    Path((id, dungeon_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<CombatSession>), (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let session = state
        .dungeon_service
        .start_dungeon(character_id, DungeonId::new(dungeon_id))
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Resume the active run, or report the completion bundle
pub async fn continue_dungeon(
    State(state): State<Arc<AppState>>,
    Path((id, dungeon_id)): Path<(String, String)>,
) -> Result<Json<DungeonContinuationDto>, (StatusCode, String)> {
    let character_id = parse_character_id(&id)?;

    let continuation = state
        .dungeon_service
        .continue_dungeon(character_id, DungeonId::new(dungeon_id))
        .await
        .map_err(error_response)?;

    Ok(Json(DungeonContinuationDto::from(continuation)))
}
