use serde::Serialize;

use crate::application::dto::CharacterResponseDto;
use crate::application::services::ActionOutcome;
use crate::domain::entities::CombatSession;
use crate::domain::services::combat_engine::ActionReport;
use crate::domain::services::dungeon_progression::DungeonStep;

/// Result of one resolved combat action
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponseDto {
    pub report: ActionReport,
    pub session: CombatSession,
    pub character: CharacterResponseDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dungeon: Option<DungeonStep>,
}

impl From<ActionOutcome> for ActionResponseDto {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            report: outcome.report,
            character: (&outcome.character).into(),
            session: outcome.session,
            dungeon: outcome.dungeon,
        }
    }
}
