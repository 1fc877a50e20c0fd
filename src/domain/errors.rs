//! Error taxonomy for every engine operation
//!
//! All failures are synchronous and terminal for the request; nothing is
//! retried. Validation and conflict errors are raised before any state is
//! mutated.

use thiserror::Error;

use crate::domain::value_objects::{
    CharacterId, CombatSessionId, DungeonId, EnemyTemplateId, ItemInstanceId, ItemTemplateId,
    SkillId,
};

/// Coarse error category, used by the transport layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    CatalogInconsistency,
    Storage,
}

#[derive(Debug, Error)]
pub enum EngineError {
    // Validation
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Unknown skill: {0}")]
    UnknownSkill(SkillId),
    #[error("Not enough mana: {required} required, {available} available")]
    InsufficientMana { required: u32, available: u32 },
    #[error("Not enough currency: {required} required, {available} available")]
    InsufficientCurrency { required: u64, available: u64 },
    #[error("Not enough forging currency: {required} required, {available} available")]
    InsufficientForgingCurrency { required: u64, available: u64 },
    #[error("Item {0} is not in the inventory")]
    ItemNotOwned(ItemInstanceId),
    #[error("Item cannot be used this way: {0}")]
    ItemNotUsable(String),
    #[error("{class} cannot equip {item}")]
    ClassMismatch { class: String, item: String },
    #[error("{item} cannot be equipped in the {slot} slot")]
    SlotMismatch { item: String, slot: String },
    #[error("Nothing is equipped in the {0} slot")]
    SlotEmpty(String),
    #[error("Item is already at maximum enhancement level {0}")]
    EnhancementCapped(u8),
    #[error("Character level {current} is below the required level {required}")]
    LevelTooLow { required: u32, current: u32 },
    #[error("Rest is on cooldown for another {remaining_minutes} minutes")]
    RestOnCooldown { remaining_minutes: i64 },
    #[error("Character has no health left to fight with")]
    Incapacitated,
    #[error("Invalid character data: {0}")]
    InvalidCharacter(String),

    // Conflict
    #[error("Combat session {0} is not active")]
    SessionNotActive(CombatSessionId),
    #[error("Combat session {session_id} does not belong to character {character_id}")]
    SessionNotOwned {
        session_id: CombatSessionId,
        character_id: CharacterId,
    },
    #[error("Character {0} is already in combat")]
    AlreadyInCombat(CharacterId),
    #[error("Dungeon {0} is already in progress")]
    DungeonInProgress(DungeonId),
    #[error("Dungeon run failed: {0}")]
    DungeonRunFailed(DungeonId),

    // Not found
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Combat session not found: {0}")]
    SessionNotFound(CombatSessionId),
    #[error("Dungeon not found: {0}")]
    DungeonNotFound(DungeonId),
    #[error("No run of dungeon {0} found for this character")]
    DungeonRunNotFound(DungeonId),
    #[error("Item template not found: {0}")]
    ItemTemplateNotFound(ItemTemplateId),

    // Catalog inconsistency
    #[error("Catalog inconsistency: enemy template {0} cannot be resolved")]
    MissingEnemyTemplate(EnemyTemplateId),
    #[error("Catalog inconsistency: no enemy templates for tier {0}")]
    EmptyTier(u8),
    #[error("Catalog inconsistency: {0}")]
    Catalog(String),

    // Storage
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAction(_)
            | Self::UnknownSkill(_)
            | Self::InsufficientMana { .. }
            | Self::InsufficientCurrency { .. }
            | Self::InsufficientForgingCurrency { .. }
            | Self::ItemNotOwned(_)
            | Self::ItemNotUsable(_)
            | Self::ClassMismatch { .. }
            | Self::SlotMismatch { .. }
            | Self::SlotEmpty(_)
            | Self::EnhancementCapped(_)
            | Self::LevelTooLow { .. }
            | Self::RestOnCooldown { .. }
            | Self::Incapacitated
            | Self::InvalidCharacter(_) => ErrorCategory::Validation,
            Self::SessionNotActive(_)
            | Self::SessionNotOwned { .. }
            | Self::AlreadyInCombat(_)
            | Self::DungeonInProgress(_)
            | Self::DungeonRunFailed(_) => ErrorCategory::Conflict,
            Self::CharacterNotFound(_)
            | Self::SessionNotFound(_)
            | Self::DungeonNotFound(_)
            | Self::DungeonRunNotFound(_)
            | Self::ItemTemplateNotFound(_) => ErrorCategory::NotFound,
            Self::MissingEnemyTemplate(_) | Self::EmptyTier(_) | Self::Catalog(_) => {
                ErrorCategory::CatalogInconsistency
            }
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Whether the failure means the current run cannot safely continue
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::CatalogInconsistency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            EngineError::InsufficientMana { required: 10, available: 2 }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            EngineError::AlreadyInCombat(CharacterId::new()).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            EngineError::DungeonNotFound("crypt".into()).category(),
            ErrorCategory::NotFound
        );
        let missing = EngineError::MissingEnemyTemplate("lich".into());
        assert_eq!(missing.category(), ErrorCategory::CatalogInconsistency);
        assert!(missing.is_fatal());
    }
}
