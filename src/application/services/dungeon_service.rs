//! Dungeon Service - Starting and continuing dungeon runs
//!
//! Encounters inside a run are advanced by the combat service when an
//! encounter is won; this service opens runs and reports on them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{
    CatalogPort, CharacterRepositoryPort, CombatSessionRepositoryPort,
};
use crate::application::services::character_service::load_character;
use crate::application::services::CharacterLocks;
use crate::domain::entities::{CombatSession, CompletionBundle, Dungeon, SessionStatus};
use crate::domain::errors::EngineError;
use crate::domain::services::dungeon_progression;
use crate::domain::value_objects::{CharacterId, CombatSessionId, DungeonId};

/// State of a character's latest run of one dungeon
#[derive(Debug, Clone)]
pub enum DungeonContinuation {
    InProgress(CombatSession),
    Completed {
        session_id: CombatSessionId,
        bundle: CompletionBundle,
    },
}

#[async_trait]
pub trait DungeonService: Send + Sync {
    fn list_dungeons(&self) -> Vec<Dungeon>;

    async fn start_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: DungeonId,
    ) -> Result<CombatSession, EngineError>;

    /// Resume the active run, or report the bundle of a completed one
    async fn continue_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: DungeonId,
    ) -> Result<DungeonContinuation, EngineError>;
}

pub struct DungeonServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    sessions: Arc<dyn CombatSessionRepositoryPort>,
    catalog: Arc<dyn CatalogPort>,
    locks: Arc<CharacterLocks>,
}

impl DungeonServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        sessions: Arc<dyn CombatSessionRepositoryPort>,
        catalog: Arc<dyn CatalogPort>,
        locks: Arc<CharacterLocks>,
    ) -> Self {
        Self {
            characters,
            sessions,
            catalog,
            locks,
        }
    }

    fn dungeon(&self, id: &DungeonId) -> Result<&Dungeon, EngineError> {
        self.catalog
            .dungeon(id)
            .ok_or_else(|| EngineError::DungeonNotFound(id.clone()))
    }
}

#[async_trait]
impl DungeonService for DungeonServiceImpl {
    fn list_dungeons(&self) -> Vec<Dungeon> {
        self.catalog.dungeons().into_iter().cloned().collect()
    }

    #[instrument(skip(self))]
    async fn start_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: DungeonId,
    ) -> Result<CombatSession, EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let character = load_character(self.characters.as_ref(), character_id).await?;
        let dungeon = self.dungeon(&dungeon_id)?;

        if let Some(active) = self.sessions.find_active_for_character(character_id).await? {
            return Err(match active.dungeon_id() {
                Some(running) => EngineError::DungeonInProgress(running.clone()),
                None => EngineError::AlreadyInCombat(character_id),
            });
        }

        let session = dungeon_progression::start_run(&character, dungeon, self.catalog.as_ref())?;
        self.sessions.create(&session).await?;
        info!(
            session_id = %session.id,
            encounters = dungeon.encounter_count(),
            "Dungeon run started"
        );
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn continue_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: DungeonId,
    ) -> Result<DungeonContinuation, EngineError> {
        let dungeon = self.dungeon(&dungeon_id)?;
        let session = self
            .sessions
            .find_latest_for_dungeon(character_id, &dungeon_id)
            .await?
            .ok_or_else(|| EngineError::DungeonRunNotFound(dungeon_id.clone()))?;
        debug!(session_id = %session.id, status = %session.status, "Found dungeon run");

        match session.status {
            SessionStatus::Active => Ok(DungeonContinuation::InProgress(session)),
            SessionStatus::DungeonComplete => {
                let bundle = session
                    .dungeon
                    .as_ref()
                    .and_then(|progress| progress.completion.clone())
                    .unwrap_or_else(|| dungeon.completion.clone());
                Ok(DungeonContinuation::Completed {
                    session_id: session.id,
                    bundle,
                })
            }
            SessionStatus::Defeat | SessionStatus::Victory => {
                Err(EngineError::DungeonRunFailed(dungeon_id))
            }
        }
    }
}
