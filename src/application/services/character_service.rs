//! Character Service - Character bootstrap, snapshot queries and rest
//!
//! Rest is the only out-of-combat recovery: it is refused while the
//! character has an active session and inside the eight-hour cooldown.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{
    CatalogPort, CharacterRepositoryPort, CombatSessionRepositoryPort,
};
use crate::application::services::CharacterLocks;
use crate::domain::entities::{Character, RestOutcome};
use crate::domain::errors::EngineError;
use crate::domain::value_objects::{Attributes, CharacterClass, CharacterId, ItemTemplateId};

/// Items every new character starts with
pub const STARTER_KIT: [(&str, u32); 2] = [("minor_health_potion", 2), ("minor_mana_potion", 1)];

pub const MAX_NAME_LENGTH: usize = 32;

/// Ceiling for each base attribute a new character may start with
pub const MAX_STARTING_ATTRIBUTE: u32 = 1_000;

#[derive(Debug, Clone)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub class: CharacterClass,
    pub attributes: Attributes,
}

#[async_trait]
pub trait CharacterService: Send + Sync {
    async fn create_character(&self, request: CreateCharacterRequest) -> Result<Character, EngineError>;

    async fn get_character(&self, id: CharacterId) -> Result<Character, EngineError>;

    /// Restore half of max HP and mana, subject to the rest cooldown
    async fn rest(&self, id: CharacterId) -> Result<(Character, RestOutcome), EngineError>;
}

/// Load a character or fail with `CharacterNotFound`
pub(crate) async fn load_character(
    characters: &dyn CharacterRepositoryPort,
    id: CharacterId,
) -> Result<Character, EngineError> {
    characters
        .get(id)
        .await?
        .ok_or(EngineError::CharacterNotFound(id))
}

pub struct CharacterServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    sessions: Arc<dyn CombatSessionRepositoryPort>,
    catalog: Arc<dyn CatalogPort>,
    locks: Arc<CharacterLocks>,
}

impl CharacterServiceImpl {
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

    fn validate_create_request(request: &CreateCharacterRequest) -> Result<(), EngineError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidCharacter(
                "Character name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(EngineError::InvalidCharacter(format!(
                "Character name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        let a = &request.attributes;
        let highest = [a.strength, a.intelligence, a.vitality, a.dexterity, a.luck]
            .into_iter()
            .max()
            .unwrap_or(0);
        if highest > MAX_STARTING_ATTRIBUTE {
            return Err(EngineError::InvalidCharacter(format!(
                "Attributes cannot exceed {}",
                MAX_STARTING_ATTRIBUTE
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CharacterService for CharacterServiceImpl {
    #[instrument(skip(self), fields(name = %request.name, class = %request.class))]
    async fn create_character(&self, request: CreateCharacterRequest) -> Result<Character, EngineError> {
        Self::validate_create_request(&request)?;

        let mut character = Character::new(request.name.trim(), request.class, request.attributes);
        for (template_id, quantity) in STARTER_KIT {
            let id = ItemTemplateId::new(template_id);
            let template = self.catalog.item_template(&id).ok_or_else(|| {
                EngineError::Catalog(format!("starter kit references unknown item {}", id))
            })?;
            character.add_item(template, quantity);
        }

        self.characters.create(&character).await?;
        info!(character_id = %character.id, "Created character: {}", character.name);
        Ok(character)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, id: CharacterId) -> Result<Character, EngineError> {
        debug!("Fetching character");
        load_character(self.characters.as_ref(), id).await
    }

    #[instrument(skip(self))]
    async fn rest(&self, id: CharacterId) -> Result<(Character, RestOutcome), EngineError> {
        let _guard = self.locks.acquire(id).await;
        let mut character = load_character(self.characters.as_ref(), id).await?;

        if self.sessions.find_active_for_character(id).await?.is_some() {
            return Err(EngineError::AlreadyInCombat(id));
        }

        let outcome = character.rest(Utc::now())?;
        self.characters.save(&character).await?;
        info!(
            hp_restored = outcome.hp_restored,
            mana_restored = outcome.mana_restored,
            "Character rested"
        );
        Ok((character, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CombatSession;
    use crate::domain::services::enemy_scaler::scale_to_level;
    use crate::infrastructure::catalog::StaticCatalog;
    use crate::infrastructure::persistence::MemoryStore;

    fn service() -> (CharacterServiceImpl, Arc<MemoryStore>, Arc<StaticCatalog>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(StaticCatalog::seeded());
        let service = CharacterServiceImpl::new(
            store.clone(),
            store.clone(),
            catalog.clone(),
            Arc::new(CharacterLocks::new()),
        );
        (service, store, catalog)
    }

    fn request(name: &str) -> CreateCharacterRequest {
        CreateCharacterRequest {
            name: name.to_string(),
            class: CharacterClass::Mage,
            attributes: Attributes::new(2, 12, 4, 3, 1),
        }
    }

    #[tokio::test]
    async fn test_create_character_with_starter_kit() {
        let (service, _, _) = service();
        let character = service.create_character(request("  Ilsa ")).await.unwrap();

        assert_eq!(character.name, "Ilsa");
        assert_eq!(character.progression.level, 1);
        assert_eq!(character.combat.max_hp, 140);
        assert_eq!(character.combat.current_mana, 110);
        assert_eq!(character.inventory.len(), 2);
        assert_eq!(character.inventory[0].quantity, 2);

        let loaded = service.get_character(character.id).await.unwrap();
        assert_eq!(loaded.id, character.id);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_names() {
        let (service, _, _) = service();
        assert!(matches!(
            service.create_character(request("   ")).await,
            Err(EngineError::InvalidCharacter(_))
        ));
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            service.create_character(request(&long)).await,
            Err(EngineError::InvalidCharacter(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_attributes() {
        let (service, store, _) = service();
        let mut oversized = request("Brom");
        oversized.attributes = Attributes::new(0, 0, 500_000_000, 0, 0);
        assert!(matches!(
            service.create_character(oversized).await,
            Err(EngineError::InvalidCharacter(_))
        ));

        let mut at_limit = request("Brom");
        at_limit.attributes = Attributes::new(0, 0, MAX_STARTING_ATTRIBUTE, 0, 0);
        let character = service.create_character(at_limit).await.unwrap();
        assert_eq!(character.combat.max_hp, 10_100);
        assert!(CharacterRepositoryPort::get(store.as_ref(), character.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_missing_character() {
        let (service, _, _) = service();
        assert!(matches!(
            service.get_character(CharacterId::new()).await,
            Err(EngineError::CharacterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rest_restores_then_cools_down() {
        let (service, store, _) = service();
        let mut character = service.create_character(request("Ilsa")).await.unwrap();
        character.combat.current_hp = 10;
        character.combat.current_mana = 0;
        CharacterRepositoryPort::save(store.as_ref(), &character).await.unwrap();

        let (rested, outcome) = service.rest(character.id).await.unwrap();
        assert_eq!(outcome.hp_restored, 70);
        assert_eq!(outcome.mana_restored, 55);
        assert_eq!(rested.combat.current_hp, 80);
        assert!(rested.last_rest_at.is_some());

        assert!(matches!(
            service.rest(character.id).await,
            Err(EngineError::RestOnCooldown { .. })
        ));
    }

    #[tokio::test]
    async fn test_rest_refused_in_combat() {
        let (service, store, catalog) = service();
        let character = service.create_character(request("Ilsa")).await.unwrap();
        let template = &catalog.enemies()[0];
        let session = CombatSession::new(
            character.id,
            scale_to_level(template, 1),
            character.combat.current_hp,
            character.combat.max_hp,
        );
        CombatSessionRepositoryPort::create(store.as_ref(), &session).await.unwrap();

        assert!(matches!(
            service.rest(character.id).await,
            Err(EngineError::AlreadyInCombat(_))
        ));
    }
}
