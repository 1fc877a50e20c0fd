//! Repository ports - Interfaces for character and combat-session persistence
//!
//! Application services depend on these traits, not on concrete backends.
//! The session port owns the atomic commit of a resolved action: the
//! character and its session are written together or not at all.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::{Character, CombatSession};
use crate::domain::errors::EngineError;
use crate::domain::value_objects::{CharacterId, CombatSessionId, DungeonId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Character {0} already has an active combat session")]
    ActiveSessionExists(CharacterId),
    #[error("Record not found: {0}")]
    NotFound(String),
    /// The session was swept between load and commit
    #[error("Combat session {0} no longer exists")]
    SessionGone(CombatSessionId),
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ActiveSessionExists(id) => EngineError::AlreadyInCombat(id),
            RepositoryError::SessionGone(id) => EngineError::SessionNotFound(id),
            other => EngineError::Storage(other.to_string()),
        }
    }
}

// =============================================================================
// Character Repository Port
// =============================================================================

#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Insert a new character
    async fn create(&self, character: &Character) -> Result<(), RepositoryError>;

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepositoryError>;

    /// Overwrite an existing character
    async fn save(&self, character: &Character) -> Result<(), RepositoryError>;
}

// =============================================================================
// Combat Session Repository Port
// =============================================================================

#[async_trait]
pub trait CombatSessionRepositoryPort: Send + Sync {
    async fn get(&self, id: CombatSessionId) -> Result<Option<CombatSession>, RepositoryError>;

    /// The character's single `active` session, if any
    async fn find_active_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CombatSession>, RepositoryError>;

    /// Most recently created run of a dungeon by this character, in any status
    async fn find_latest_for_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: &DungeonId,
    ) -> Result<Option<CombatSession>, RepositoryError>;

    /// Insert a session; fails with `ActiveSessionExists` when the character
    /// already has an active one.
    async fn create(&self, session: &CombatSession) -> Result<(), RepositoryError>;

    /// Persist a character and its session in one atomic write
    async fn commit(
        &self,
        character: &Character,
        session: &CombatSession,
    ) -> Result<(), RepositoryError>;

    /// Delete active sessions idle longer than `idle_timeout` and finished
    /// sessions older than `retention`. Returns the number removed.
    async fn purge_stale(
        &self,
        idle_timeout: Duration,
        retention: Duration,
    ) -> Result<u64, RepositoryError>;
}
