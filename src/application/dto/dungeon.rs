use serde::Serialize;

use crate::application::services::DungeonContinuation;
use crate::domain::entities::{CombatSession, CompletionBundle, Dungeon};
use crate::domain::value_objects::{CombatSessionId, DungeonId, EnemyTemplateId};

#[derive(Debug, Clone, Serialize)]
pub struct EncounterDto {
    pub position: u32,
    pub enemy_template_id: EnemyTemplateId,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DungeonSummaryDto {
    pub id: DungeonId,
    pub name: String,
    pub required_level: u32,
    pub encounters: Vec<EncounterDto>,
    pub completion: CompletionBundle,
}

impl From<&Dungeon> for DungeonSummaryDto {
    fn from(dungeon: &Dungeon) -> Self {
        Self {
            id: dungeon.id.clone(),
            name: dungeon.name.clone(),
            required_level: dungeon.required_level,
            encounters: dungeon
                .encounters()
                .iter()
                .map(|e| EncounterDto {
                    position: e.position,
                    enemy_template_id: e.enemy_template_id.clone(),
                    level: e.level,
                })
                .collect(),
            completion: dungeon.completion.clone(),
        }
    }
}

/// Either the live session or the completion bundle of a finished run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DungeonContinuationDto {
    InProgress {
        session: CombatSession,
    },
    Completed {
        session_id: CombatSessionId,
        bundle: CompletionBundle,
    },
}

impl From<DungeonContinuation> for DungeonContinuationDto {
    fn from(value: DungeonContinuation) -> Self {
        match value {
            DungeonContinuation::InProgress(session) => Self::InProgress { session },
            DungeonContinuation::Completed { session_id, bundle } => {
                Self::Completed { session_id, bundle }
            }
        }
    }
}
