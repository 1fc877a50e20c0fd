//! In-memory repositories for tests and local runs
//!
//! Characters and sessions share one lock so `commit` can write both
//! atomically, matching the transactional SQLite backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    CharacterRepositoryPort, CombatSessionRepositoryPort, RepositoryError,
};
use crate::domain::entities::{Character, CombatSession};
use crate::domain::value_objects::{CharacterId, CombatSessionId, DungeonId};

#[derive(Default)]
struct Tables {
    characters: HashMap<CharacterId, Character>,
    sessions: HashMap<CombatSessionId, CombatSession>,
}

impl Tables {
    fn active_for(&self, character_id: CharacterId) -> Option<&CombatSession> {
        self.sessions
            .values()
            .find(|s| s.character_id == character_id && s.is_active())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepositoryPort for MemoryStore {
    async fn create(&self, character: &Character) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.characters.insert(character.id, character.clone());
        Ok(())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepositoryError> {
        Ok(self.tables.read().await.characters.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.characters.get_mut(&character.id) {
            Some(stored) => {
                *stored = character.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("character {}", character.id))),
        }
    }
}

#[async_trait]
impl CombatSessionRepositoryPort for MemoryStore {
    async fn get(&self, id: CombatSessionId) -> Result<Option<CombatSession>, RepositoryError> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn find_active_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CombatSession>, RepositoryError> {
        Ok(self.tables.read().await.active_for(character_id).cloned())
    }

    async fn find_latest_for_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: &DungeonId,
    ) -> Result<Option<CombatSession>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.character_id == character_id && s.dungeon_id() == Some(dungeon_id))
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn create(&self, session: &CombatSession) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if session.is_active() && tables.active_for(session.character_id).is_some() {
            return Err(RepositoryError::ActiveSessionExists(session.character_id));
        }
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn commit(
        &self,
        character: &Character,
        session: &CombatSession,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.characters.contains_key(&character.id) {
            return Err(RepositoryError::NotFound(format!("character {}", character.id)));
        }
        if !tables.sessions.contains_key(&session.id) {
            return Err(RepositoryError::SessionGone(session.id));
        }
        tables.characters.insert(character.id, character.clone());
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn purge_stale(
        &self,
        idle_timeout: Duration,
        retention: Duration,
    ) -> Result<u64, RepositoryError> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| {
            let limit = if s.is_active() { idle_timeout } else { retention };
            now - s.updated_at <= limit
        });
        Ok((before - tables.sessions.len()) as u64)
    }
}
