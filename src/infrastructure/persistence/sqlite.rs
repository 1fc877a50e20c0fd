//! SQLite repositories via sqlx
//!
//! Characters and sessions are stored as JSON documents next to the few
//! columns that queries filter on. A partial unique index allows at most one
//! `active` session per character, so the invariant holds even across
//! processes sharing the database file.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::application::ports::outbound::{
    CharacterRepositoryPort, CombatSessionRepositoryPort, RepositoryError,
};
use crate::domain::entities::{Character, CombatSession, SessionStatus};
use crate::domain::value_objects::{CharacterId, CombatSessionId, DungeonId};

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(data: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(data).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and ensure the schema
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::new(pool).await
    }

    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS combat_sessions (
                id TEXT PRIMARY KEY,
                character_id TEXT NOT NULL,
                dungeon_id TEXT,
                status TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_combat_sessions_one_active
            ON combat_sessions (character_id) WHERE status = 'active'
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_combat_sessions_dungeon ON combat_sessions (character_id, dungeon_id, created_at)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    async fn fetch_session(
        &self,
        sql: &str,
        binds: &[String],
    ) -> Result<Option<CombatSession>, RepositoryError> {
        let mut query = sqlx::query_as::<_, (String,)>(sql);
        for bind in binds {
            query = query.bind(bind.as_str());
        }
        let row = query.fetch_optional(&self.pool).await.map_err(db_err)?;
        row.map(|(data,)| from_json(&data)).transpose()
    }
}

#[async_trait]
impl CharacterRepositoryPort for SqliteStore {
    async fn create(&self, character: &Character) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO characters (id, data, updated_at) VALUES (?, ?, ?)")
            .bind(character.id.to_string())
            .bind(to_json(character)?)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(|(data,)| from_json(&data)).transpose()
    }

    async fn save(&self, character: &Character) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE characters SET data = ?, updated_at = ? WHERE id = ?")
            .bind(to_json(character)?)
            .bind(Utc::now().timestamp_millis())
            .bind(character.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("character {}", character.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CombatSessionRepositoryPort for SqliteStore {
    async fn get(&self, id: CombatSessionId) -> Result<Option<CombatSession>, RepositoryError> {
        self.fetch_session("SELECT data FROM combat_sessions WHERE id = ?", &[id.to_string()])
            .await
    }

    async fn find_active_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CombatSession>, RepositoryError> {
        self.fetch_session(
            "SELECT data FROM combat_sessions WHERE character_id = ? AND status = 'active'",
            &[character_id.to_string()],
        )
        .await
    }

    async fn find_latest_for_dungeon(
        &self,
        character_id: CharacterId,
        dungeon_id: &DungeonId,
    ) -> Result<Option<CombatSession>, RepositoryError> {
        self.fetch_session(
            "SELECT data FROM combat_sessions WHERE character_id = ? AND dungeon_id = ? ORDER BY created_at DESC LIMIT 1",
            &[character_id.to_string(), dungeon_id.to_string()],
        )
        .await
    }

    async fn create(&self, session: &CombatSession) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO combat_sessions (id, character_id, dungeon_id, status, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(session.id.to_string())
        .bind(session.character_id.to_string())
        .bind(session.dungeon_id().map(|d| d.to_string()))
        .bind(session.status.as_str())
        .bind(to_json(session)?)
        .bind(session.created_at.timestamp_millis())
        .bind(session.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::ActiveSessionExists(session.character_id))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn commit(
        &self,
        character: &Character,
        session: &CombatSession,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query("UPDATE characters SET data = ?, updated_at = ? WHERE id = ?")
            .bind(to_json(character)?)
            .bind(now)
            .bind(character.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("character {}", character.id)));
        }

        let updated = sqlx::query(
            "UPDATE combat_sessions SET status = ?, data = ?, updated_at = ? WHERE id = ?",
        )
        .bind(session.status.as_str())
        .bind(to_json(session)?)
        .bind(session.updated_at.timestamp_millis())
        .bind(session.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(RepositoryError::SessionGone(session.id));
        }

        tx.commit().await.map_err(db_err)
    }

    async fn purge_stale(
        &self,
        idle_timeout: Duration,
        retention: Duration,
    ) -> Result<u64, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            DELETE FROM combat_sessions
            WHERE (status = ? AND updated_at < ?)
               OR (status != ? AND updated_at < ?)
        "#,
        )
        .bind(SessionStatus::Active.as_str())
        .bind((now - idle_timeout).timestamp_millis())
        .bind(SessionStatus::Active.as_str())
        .bind((now - retention).timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EnemyInstance, RewardRates};
    use crate::domain::value_objects::{Attributes, CharacterClass};

    async fn store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteStore::new(pool).await.unwrap()
    }

    fn bat() -> EnemyInstance {
        EnemyInstance {
            template_id: "bat".into(),
            name: "Bat".to_string(),
            tier: 1,
            level: 1,
            current_hp: 20,
            max_hp: 20,
            damage: 3,
            defense: 0,
            mana: 0,
            rewards: RewardRates {
                experience: 5,
                currency: 2,
                forging_drop_chance: 0.15,
            },
            poison: None,
        }
    }

    #[tokio::test]
    async fn test_character_round_trip_and_save() {
        let store = store().await;
        let mut character = Character::new("Ilsa", CharacterClass::Mage, Attributes::new(0, 8, 2, 0, 0));
        CharacterRepositoryPort::create(&store, &character).await.unwrap();

        character.progression.currency = 77;
        CharacterRepositoryPort::save(&store, &character).await.unwrap();

        let loaded = CharacterRepositoryPort::get(&store, character.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.progression.currency, 77);
        assert_eq!(loaded.combat, character.combat);
    }

    #[tokio::test]
    async fn test_unique_active_session_index() {
        let store = store().await;
        let character = Character::new("Ilsa", CharacterClass::Mage, Attributes::default());
        CharacterRepositoryPort::create(&store, &character).await.unwrap();

        let mut first = CombatSession::new(character.id, bat(), 100, 100);
        CombatSessionRepositoryPort::create(&store, &first).await.unwrap();
        let second = CombatSession::new(character.id, bat(), 100, 100);
        assert!(matches!(
            CombatSessionRepositoryPort::create(&store, &second).await,
            Err(RepositoryError::ActiveSessionExists(_))
        ));

        first.status = SessionStatus::Defeat;
        store.commit(&character, &first).await.unwrap();
        CombatSessionRepositoryPort::create(&store, &second).await.unwrap();

        let active = store.find_active_for_character(character.id).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
    }

    #[tokio::test]
    async fn test_commit_of_unknown_session_rolls_back() {
        let store = store().await;
        let mut character = Character::new("Ilsa", CharacterClass::Mage, Attributes::default());
        CharacterRepositoryPort::create(&store, &character).await.unwrap();

        character.progression.currency = 500;
        let ghost = CombatSession::new(character.id, bat(), 100, 100);
        assert!(matches!(
            store.commit(&character, &ghost).await,
            Err(RepositoryError::SessionGone(_))
        ));

        let loaded = CharacterRepositoryPort::get(&store, character.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.progression.currency, 0);
    }

    #[tokio::test]
    async fn test_purge_stale_sessions() {
        let store = store().await;
        let character = Character::new("Ilsa", CharacterClass::Mage, Attributes::default());

        let mut stale = CombatSession::new(character.id, bat(), 100, 100);
        stale.updated_at = Utc::now() - Duration::hours(2);
        CombatSessionRepositoryPort::create(&store, &stale).await.unwrap();

        let removed = store
            .purge_stale(Duration::minutes(30), Duration::minutes(10))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.find_active_for_character(character.id).await.unwrap().is_none());
    }
}
