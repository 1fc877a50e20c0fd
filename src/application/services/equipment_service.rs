//! Equipment Service - Equip, unequip and enhance use cases

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::application::ports::outbound::{CatalogPort, CharacterRepositoryPort};
use crate::application::services::character_service::load_character;
use crate::application::services::CharacterLocks;
use crate::domain::entities::Character;
use crate::domain::errors::EngineError;
use crate::domain::services::equipment::{self, EnhanceOutcome, EquipOutcome, UnequipTarget};
use crate::domain::value_objects::{CharacterId, EquipmentSlot, ItemInstanceId};

#[async_trait]
pub trait EquipmentService: Send + Sync {
    async fn equip(
        &self,
        character_id: CharacterId,
        item_id: ItemInstanceId,
        slot: Option<EquipmentSlot>,
    ) -> Result<(Character, EquipOutcome), EngineError>;

    async fn unequip(
        &self,
        character_id: CharacterId,
        target: UnequipTarget,
    ) -> Result<(Character, ItemInstanceId), EngineError>;

    async fn enhance(
        &self,
        character_id: CharacterId,
        item_id: ItemInstanceId,
    ) -> Result<(Character, EnhanceOutcome), EngineError>;
}

pub struct EquipmentServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    catalog: Arc<dyn CatalogPort>,
    locks: Arc<CharacterLocks>,
}

impl EquipmentServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        catalog: Arc<dyn CatalogPort>,
        locks: Arc<CharacterLocks>,
    ) -> Self {
        Self {
            characters,
            catalog,
            locks,
        }
    }
}

#[async_trait]
impl EquipmentService for EquipmentServiceImpl {
    #[instrument(skip(self))]
    async fn equip(
        &self,
        character_id: CharacterId,
        item_id: ItemInstanceId,
        slot: Option<EquipmentSlot>,
    ) -> Result<(Character, EquipOutcome), EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let mut character = load_character(self.characters.as_ref(), character_id).await?;

        let outcome = equipment::equip(&mut character, self.catalog.as_ref(), item_id, slot)?;
        self.characters.save(&character).await?;
        info!(slot = %outcome.slot, replaced = ?outcome.replaced, "Item equipped");
        Ok((character, outcome))
    }

    #[instrument(skip(self))]
    async fn unequip(
        &self,
        character_id: CharacterId,
        target: UnequipTarget,
    ) -> Result<(Character, ItemInstanceId), EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let mut character = load_character(self.characters.as_ref(), character_id).await?;

        let item_id = equipment::unequip(&mut character, self.catalog.as_ref(), target)?;
        self.characters.save(&character).await?;
        info!(%item_id, "Item unequipped");
        Ok((character, item_id))
    }

    #[instrument(skip(self))]
    async fn enhance(
        &self,
        character_id: CharacterId,
        item_id: ItemInstanceId,
    ) -> Result<(Character, EnhanceOutcome), EngineError> {
        let _guard = self.locks.acquire(character_id).await;
        let mut character = load_character(self.characters.as_ref(), character_id).await?;

        let outcome = equipment::enhance(&mut character, self.catalog.as_ref(), item_id)?;
        self.characters.save(&character).await?;
        info!(
            new_level = outcome.new_level,
            cost = outcome.cost,
            "Item enhanced"
        );
        Ok((character, outcome))
    }
}
