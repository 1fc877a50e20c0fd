//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{CatalogPort, CombatSessionRepositoryPort};
use crate::application::services::{
    CharacterLocks, CharacterService, CharacterServiceImpl, CombatService, CombatServiceImpl,
    Dice, DungeonService, DungeonServiceImpl, EquipmentService, EquipmentServiceImpl,
};
use crate::infrastructure::catalog::StaticCatalog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::Repositories;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<dyn CatalogPort>,
    /// Session repository, exposed for the background sweeper
    pub sessions: Arc<dyn CombatSessionRepositoryPort>,
    pub locks: Arc<CharacterLocks>,
    // Application services
    pub character_service: Arc<dyn CharacterService>,
    pub combat_service: Arc<dyn CombatService>,
    pub dungeon_service: Arc<dyn DungeonService>,
    pub equipment_service: Arc<dyn EquipmentService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog: Arc<dyn CatalogPort> =
            Arc::new(StaticCatalog::load().context("Static catalog failed validation")?);

        let repositories = Repositories::connect(&config).await?;

        Ok(Self::assemble(config, repositories, catalog, Dice::from_entropy()))
    }

    /// Wire the services over already-opened adapters
    pub fn assemble(
        config: AppConfig,
        repositories: Repositories,
        catalog: Arc<dyn CatalogPort>,
        dice: Dice,
    ) -> Self {
        let Repositories {
            characters,
            sessions,
        } = repositories;
        let locks = Arc::new(CharacterLocks::new());
        let dice = Arc::new(dice);

        let character_service = Arc::new(CharacterServiceImpl::new(
            characters.clone(),
            sessions.clone(),
            catalog.clone(),
            locks.clone(),
        ));
        let combat_service = Arc::new(CombatServiceImpl::new(
            characters.clone(),
            sessions.clone(),
            catalog.clone(),
            locks.clone(),
            dice,
        ));
        let dungeon_service = Arc::new(DungeonServiceImpl::new(
            characters.clone(),
            sessions.clone(),
            catalog.clone(),
            locks.clone(),
        ));
        let equipment_service = Arc::new(EquipmentServiceImpl::new(
            characters,
            catalog.clone(),
            locks.clone(),
        ));

        Self {
            config,
            catalog,
            sessions,
            locks,
            character_service,
            combat_service,
            dungeon_service,
            equipment_service,
        }
    }
}
