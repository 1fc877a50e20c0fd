//! Domain entities - Core business objects with identity

mod character;
mod combat_session;
mod dungeon;
mod enemy;
mod item;
mod skill;

pub use character::{Character, CombatRecord, Progression, RestOutcome, REST_COOLDOWN_HOURS};
pub use combat_session::{
    ActiveEffect, Actor, CombatLogEntry, CombatSession, DungeonProgress, EffectKind,
    SessionStatus,
};
pub use dungeon::{CompletionBundle, Dungeon, DungeonEncounter, ItemGrant};
pub use enemy::{
    EnemyInstance, EnemyStats, EnemyTemplate, PoisonSpec, RewardRates,
    DEFAULT_FORGING_DROP_CHANCE,
};
pub use item::{
    enhanced_bonus, enhancement_cost, enhancement_multiplier_percent, ClassTag, ItemEffects,
    ItemInstance, ItemTemplate, ItemType, Rarity, MAX_ENHANCEMENT_LEVEL,
};
pub use skill::{BuffEffect, SkillDefinition, SkillKind, EXECUTE_THRESHOLD};
