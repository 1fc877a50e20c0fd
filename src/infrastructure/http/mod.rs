//! HTTP REST API routes

mod character_routes;
mod combat_routes;
mod dungeon_routes;
mod equipment_routes;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::{EngineError, ErrorCategory};
use crate::domain::value_objects::{CharacterId, CombatSessionId};
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Character routes
        .route("/api/characters", post(character_routes::create_character))
        .route("/api/characters/{id}", get(character_routes::get_character))
        .route("/api/characters/{id}/rest", post(character_routes::rest))
        .route("/api/characters/{id}/skills", get(character_routes::list_skills))
        // Combat routes
        .route(
            "/api/characters/{id}/combat",
            post(combat_routes::initiate_combat),
        )
        .route(
            "/api/characters/{id}/combat/{session_id}",
            get(combat_routes::get_session),
        )
        .route(
            "/api/characters/{id}/combat/{session_id}/actions",
            post(combat_routes::resolve_action),
        )
        // Dungeon routes
        .route("/api/dungeons", get(dungeon_routes::list_dungeons))
        .route(
            "/api/characters/{id}/dungeons/{dungeon_id}/start",
            post(dungeon_routes::start_dungeon),
        )
        .route(
            "/api/characters/{id}/dungeons/{dungeon_id}/continue",
            post(dungeon_routes::continue_dungeon),
        )
        // Equipment routes
        .route(
            "/api/characters/{id}/equipment/equip",
            post(equipment_routes::equip),
        )
        .route(
            "/api/characters/{id}/equipment/unequip",
            post(equipment_routes::unequip),
        )
        .route(
            "/api/characters/{id}/equipment/enhance",
            post(equipment_routes::enhance),
        )
}

/// Map an engine error onto a status code and message
pub(crate) fn error_response(error: EngineError) -> (StatusCode, String) {
    let status = status_for(error.category());
    if status.is_server_error() {
        tracing::error!("Request failed: {}", error);
    }
    (status, error.to_string())
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::CatalogInconsistency | ErrorCategory::Storage => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn parse_character_id(id: &str) -> Result<CharacterId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(CharacterId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid character ID".to_string()))
}

pub(crate) fn parse_session_id(id: &str) -> Result<CombatSessionId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(CombatSessionId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DungeonId;

    #[test]
    fn test_error_categories_map_to_status_codes() {
        let id = CharacterId::new();
        assert_eq!(
            error_response(EngineError::Incapacitated).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(EngineError::AlreadyInCombat(id)).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(EngineError::CharacterNotFound(id)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(EngineError::DungeonNotFound(DungeonId::new("nowhere"))).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(EngineError::Storage("disk".to_string())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_id_parsing_rejects_garbage() {
        assert_eq!(
            parse_character_id("not-a-uuid").unwrap_err().0,
            StatusCode::BAD_REQUEST
        );
        let id = CombatSessionId::new();
        assert_eq!(parse_session_id(&id.to_string()).unwrap(), id);
    }
}
