//! Combat Service - Initiating fights and resolving player actions
//!
//! Each action is one atomic read-modify-write: the character lock is held
//! while the character and session are loaded, the turn engine (and, for
//! dungeon sessions, the progression controller) runs, and both records are
//! committed together. A failed step commits nothing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{
    CatalogPort, CharacterRepositoryPort, CombatSessionRepositoryPort,
};
use crate::application::services::character_service::load_character;
use crate::application::services::{CharacterLocks, Dice};
use crate::domain::entities::{Character, CombatSession, SessionStatus};
use crate::domain::errors::EngineError;
use crate::domain::services::combat_engine::{self, ActionReport, CombatAction};
use crate::domain::services::dungeon_progression::{self, DungeonStep};
use crate::domain::services::enemy_scaler;
use crate::domain::value_objects::{CharacterId, CombatSessionId};

/// Everything a caller needs after one resolved action
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub report: ActionReport,
    pub session: CombatSession,
    pub character: Character,
    /// Set when a dungeon encounter was won
    pub dungeon: Option<DungeonStep>,
}

#[async_trait]
pub trait CombatService: Send + Sync {
    /// Start a fight against a random enemy of the character's tier, or
    /// resume the active non-dungeon session
    async fn initiate_combat(&self, character_id: CharacterId) -> Result<CombatSession, EngineError>;

    async fn resolve_action(
        &self,
        character_id: CharacterId,
        session_id: CombatSessionId,
        action: CombatAction,
    ) -> Result<ActionOutcome, EngineError>;

    /// Side-effect-free snapshot, for clients reconnecting mid-fight
    async fn get_session(
        &self,
        character_id: CharacterId,
        session_id: CombatSessionId,
    ) -> Result<CombatSession, EngineError>;
}

pub struct CombatServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    sessions: Arc<dyn CombatSessionRepositoryPort>,
    catalog: Arc<dyn CatalogPort>,
    locks: Arc<CharacterLocks>,
    dice: Arc<Dice>,
}

impl CombatServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        sessions: Arc<dyn CombatSessionRepositoryPort>,
        catalog: Arc<dyn CatalogPort>,
        locks: Arc<CharacterLocks>,
        dice: Arc<Dice>,
    ) -> Self {
        Self {
            characters,
            sessions,
            catalog,
            locks,
            dice,
        }
    }

    async fn load_owned_session(
        &self,
        character_id: CharacterId,
        session_id: CombatSessionId,
    ) -> Result<CombatSession, EngineError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(EngineError::SessionNotFound(session_id))?;
        if session.character_id != character_id {
            return Err(EngineError::SessionNotOwned {
                session_id,
                character_id,
            });
        }
        Ok(session)
    }

    /// Hand a won dungeon encounter to the progression controller
    fn advance_dungeon(
        &self,
        character: &mut Character,
        session: &mut CombatSession,
    ) -> Result<Option<DungeonStep>, EngineError> {
        if session.status != SessionStatus::Victory {
            return Ok(None);
        }
        let Some(dungeon_id) = session.dungeon_id().cloned() else {
            return Ok(None);
        };
        let dungeon = self.catalog.dungeon(&dungeon_id).ok_or_else(|| {
            EngineError::Catalog(format!("session references unknown dungeon {}", dungeon_id))
        })?;
        let catalog = self.catalog.as_ref();
        dungeon_progression::advance_after_victory(character, session, dungeon, catalog, catalog)
            .map(Some)
    }
}

#[async_trait]
impl CombatService for CombatServiceImpl {
    #[instrument(skip(self))]
    async fn initiate_combat(&self, character_id: CharacterId) -> Result<CombatSession, EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let character = load_character(self.characters.as_ref(), character_id).await?;

        if let Some(active) = self.sessions.find_active_for_character(character_id).await? {
            if let Some(dungeon_id) = active.dungeon_id() {
                return Err(EngineError::DungeonInProgress(dungeon_id.clone()));
            }
            debug!(session_id = %active.id, "Resuming active combat session");
            return Ok(active);
        }
        if character.combat.current_hp == 0 {
            return Err(EngineError::Incapacitated);
        }

        let enemy = {
            let mut rng = self.dice.lock().await;
            enemy_scaler::random_for_player_level(
                self.catalog.enemies(),
                character.progression.level,
                &mut *rng,
            )
            .inspect_err(|e| error!(error = %e, "Enemy selection failed"))?
        };
        let session = CombatSession::new(
            character.id,
            enemy,
            character.combat.current_hp,
            character.combat.max_hp,
        );
        self.sessions.create(&session).await?;

        info!(
            session_id = %session.id,
            enemy = %session.enemy.name,
            enemy_level = session.enemy.level,
            "Combat started"
        );
        Ok(session)
    }

    #[instrument(skip(self), fields(action = action.label()))]
    async fn resolve_action(
        &self,
        character_id: CharacterId,
        session_id: CombatSessionId,
        action: CombatAction,
    ) -> Result<ActionOutcome, EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let mut character = load_character(self.characters.as_ref(), character_id).await?;
        let mut session = self.load_owned_session(character_id, session_id).await?;

        let report = {
            let mut rng = self.dice.lock().await;
            let catalog = self.catalog.as_ref();
            combat_engine::resolve_action(
                &mut character,
                &mut session,
                &action,
                catalog,
                catalog,
                &mut *rng,
            )?
        };

        let dungeon = self
            .advance_dungeon(&mut character, &mut session)
            .inspect_err(|e| {
                if e.is_fatal() {
                    error!(error = %e, "Dungeon run cannot continue");
                }
            })?;

        self.sessions
            .commit(&character, &session)
            .await
            .map_err(EngineError::from)
            .inspect_err(|e| {
                if matches!(e, EngineError::SessionNotFound(_)) {
                    warn!("Session expired before the action could be saved");
                }
            })?;

        match report.status {
            SessionStatus::Victory => {
                if let Some(rewards) = &report.rewards {
                    info!(
                        experience = rewards.experience,
                        currency = rewards.currency,
                        forging_currency = rewards.forging_currency,
                        "Enemy defeated"
                    );
                    if rewards.level_up.levels_gained > 0 {
                        info!(new_level = rewards.level_up.new_level, "Level up");
                    }
                }
            }
            SessionStatus::Defeat => {
                warn!(currency_lost = report.currency_lost.unwrap_or(0), "Character defeated");
            }
            _ => debug!(turn = session.turn, "Action resolved"),
        }

        Ok(ActionOutcome {
            report,
            session,
            character,
            dungeon,
        })
    }

    #[instrument(skip(self))]
    async fn get_session(
        &self,
        character_id: CharacterId,
        session_id: CombatSessionId,
    ) -> Result<CombatSession, EngineError> {
        self.load_owned_session(character_id, session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::RepositoryError;
    use crate::domain::entities::Character;
    use crate::domain::value_objects::{Attributes, CharacterClass, DungeonId};
    use crate::infrastructure::catalog::StaticCatalog;
    use crate::infrastructure::persistence::MemoryStore;

    struct Fixture {
        service: Arc<CombatServiceImpl>,
        store: Arc<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(CombatServiceImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(StaticCatalog::seeded()),
            Arc::new(CharacterLocks::new()),
            Arc::new(Dice::seeded(7)),
        ));
        Fixture { service, store }
    }

    async fn hero(store: &MemoryStore, strength: u32) -> Character {
        let character = Character::new(
            "Brom",
            CharacterClass::Warrior,
            Attributes::new(strength, 0, 20, 0, 0),
        );
        CharacterRepositoryPort::create(store, &character).await.unwrap();
        character
    }

    #[tokio::test]
    async fn test_initiate_creates_then_resumes() {
        let f = fixture();
        let character = hero(&f.store, 10).await;

        let first = f.service.initiate_combat(character.id).await.unwrap();
        assert!(first.is_active());
        assert_eq!(first.enemy.tier, 1);
        assert_eq!(first.enemy.level, 1);

        let second = f.service.initiate_combat(character.id).await.unwrap();
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_concurrent_initiation_yields_one_session() {
        let f = fixture();
        let character = hero(&f.store, 10).await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = f.service.clone();
                tokio::spawn(async move { service.initiate_combat(character.id).await })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_fight_until_finished_and_persist() {
        let f = fixture();
        let character = hero(&f.store, 200).await;
        let session = f.service.initiate_combat(character.id).await.unwrap();

        let outcome = f
            .service
            .resolve_action(character.id, session.id, CombatAction::Attack)
            .await
            .unwrap();
        // 15 × (1 + 200/20) outclasses every tier-one enemy
        assert_eq!(outcome.report.status, SessionStatus::Victory);
        assert!(outcome.dungeon.is_none());
        assert_eq!(outcome.character.combat.wins, 1);

        let stored = CharacterRepositoryPort::get(f.store.as_ref(), character.id)
            .await
            .unwrap()
            .unwrap();
        let rewards = outcome.report.rewards.unwrap();
        assert_eq!(stored.progression.experience, rewards.experience);

        let again = f
            .service
            .resolve_action(character.id, session.id, CombatAction::Attack)
            .await;
        assert!(matches!(again, Err(EngineError::SessionNotActive(_))));

        let snapshot = f.service.get_session(character.id, session.id).await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Victory);
    }

    #[tokio::test]
    async fn test_failed_action_commits_nothing() {
        let f = fixture();
        let character = hero(&f.store, 10).await;
        let session = f.service.initiate_combat(character.id).await.unwrap();

        let result = f
            .service
            .resolve_action(
                character.id,
                session.id,
                CombatAction::Skill {
                    skill_id: "no_such_skill".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(EngineError::UnknownSkill(_))));

        let snapshot = f.service.get_session(character.id, session.id).await.unwrap();
        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.log.len(), session.log.len());
    }

    /// Session store whose sweeper fires right after every session load
    struct SweptAfterLoad {
        inner: Arc<MemoryStore>,
    }

    #[async_trait]
    impl CombatSessionRepositoryPort for SweptAfterLoad {
        async fn get(&self, id: CombatSessionId) -> Result<Option<CombatSession>, RepositoryError> {
            let session = CombatSessionRepositoryPort::get(self.inner.as_ref(), id).await?;
            let expired_long_ago = chrono::Duration::seconds(-1);
            self.inner.purge_stale(expired_long_ago, expired_long_ago).await?;
            Ok(session)
        }

        async fn find_active_for_character(
            &self,
            character_id: CharacterId,
        ) -> Result<Option<CombatSession>, RepositoryError> {
            self.inner.find_active_for_character(character_id).await
        }

        async fn find_latest_for_dungeon(
            &self,
            character_id: CharacterId,
            dungeon_id: &DungeonId,
        ) -> Result<Option<CombatSession>, RepositoryError> {
            self.inner.find_latest_for_dungeon(character_id, dungeon_id).await
        }

        async fn create(&self, session: &CombatSession) -> Result<(), RepositoryError> {
            CombatSessionRepositoryPort::create(self.inner.as_ref(), session).await
        }

        async fn commit(
            &self,
            character: &Character,
            session: &CombatSession,
        ) -> Result<(), RepositoryError> {
            self.inner.commit(character, session).await
        }

        async fn purge_stale(
            &self,
            idle_timeout: chrono::Duration,
            retention: chrono::Duration,
        ) -> Result<u64, RepositoryError> {
            self.inner.purge_stale(idle_timeout, retention).await
        }
    }

    #[tokio::test]
    async fn test_session_swept_mid_action_reports_not_found() {
        let store = Arc::new(MemoryStore::new());
        let character = hero(&store, 10).await;
        let session = CombatSession::new(
            character.id,
            enemy_scaler::scale_to_level(
                &StaticCatalog::seeded().enemies()[0],
                1,
            ),
            character.combat.current_hp,
            character.combat.max_hp,
        );
        CombatSessionRepositoryPort::create(store.as_ref(), &session).await.unwrap();

        let service = CombatServiceImpl::new(
            store.clone(),
            Arc::new(SweptAfterLoad {
                inner: store.clone(),
            }),
            Arc::new(StaticCatalog::seeded()),
            Arc::new(CharacterLocks::new()),
            Arc::new(Dice::seeded(7)),
        );

        let result = service
            .resolve_action(character.id, session.id, CombatAction::Defend)
            .await;
        assert!(matches!(result, Err(EngineError::SessionNotFound(id)) if id == session.id));

        // Nothing from the half-resolved turn reached the character
        let stored = CharacterRepositoryPort::get(store.as_ref(), character.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.combat.current_hp, character.combat.current_hp);
        assert!(store.find_active_for_character(character.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_foreign_session_is_rejected() {
        let f = fixture();
        let owner = hero(&f.store, 10).await;
        let intruder = hero(&f.store, 10).await;
        let session = f.service.initiate_combat(owner.id).await.unwrap();

        let result = f
            .service
            .resolve_action(intruder.id, session.id, CombatAction::Defend)
            .await;
        assert!(matches!(result, Err(EngineError::SessionNotOwned { .. })));
        assert!(matches!(
            f.service.get_session(intruder.id, session.id).await,
            Err(EngineError::SessionNotOwned { .. })
        ));
    }

    #[tokio::test]
    async fn test_dungeon_victory_advances_encounter() {
        let f = fixture();
        let character = hero(&f.store, 200).await;
        let catalog = StaticCatalog::seeded();
        let dungeon = catalog.dungeon(&DungeonId::new("goblin_warren")).unwrap();
        let session = dungeon_progression::start_run(&character, dungeon, &catalog).unwrap();
        CombatSessionRepositoryPort::create(f.store.as_ref(), &session).await.unwrap();

        let outcome = f
            .service
            .resolve_action(character.id, session.id, CombatAction::Attack)
            .await
            .unwrap();
        assert_eq!(
            outcome.dungeon,
            Some(DungeonStep::NextEncounter { encounter_index: 1 })
        );
        assert!(outcome.session.is_active());
        assert_eq!(outcome.session.turn, 1);

        assert!(matches!(
            f.service.initiate_combat(character.id).await,
            Err(EngineError::DungeonInProgress(_))
        ));
    }
}
