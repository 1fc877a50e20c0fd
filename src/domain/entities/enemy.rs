//! Enemy templates (immutable catalog entries) and scaled enemy instances

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EnemyTemplateId;

/// Forging-currency drop chance used when a catalog entry does not set one
pub const DEFAULT_FORGING_DROP_CHANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: u32,
    pub strength: u32,
    pub defense: u32,
    pub mana: u32,
}

/// Per-template reward rates, scaled with the enemy's level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRates {
    pub experience: u64,
    pub currency: u64,
    /// Probability in [0, 1]; never scaled
    pub forging_drop_chance: f64,
}

/// Poison inflicted by some enemies on a successful hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoisonSpec {
    pub chance_percent: u32,
    pub damage_per_turn: u32,
    pub turns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: EnemyTemplateId,
    pub name: String,
    pub tier: u8,
    pub base_level: u32,
    pub stats: EnemyStats,
    pub rewards: RewardRates,
    pub poison: Option<PoisonSpec>,
}

impl EnemyTemplate {
    pub fn new(
        id: impl Into<EnemyTemplateId>,
        name: impl Into<String>,
        tier: u8,
        base_level: u32,
        stats: EnemyStats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            base_level,
            stats,
            rewards: RewardRates {
                experience: 0,
                currency: 0,
                forging_drop_chance: DEFAULT_FORGING_DROP_CHANCE,
            },
            poison: None,
        }
    }

    pub fn with_rewards(mut self, experience: u64, currency: u64) -> Self {
        self.rewards.experience = experience;
        self.rewards.currency = currency;
        self
    }

    pub fn with_forging_drop_chance(mut self, chance: f64) -> Self {
        self.rewards.forging_drop_chance = chance;
        self
    }

    pub fn with_poison(mut self, poison: PoisonSpec) -> Self {
        self.poison = Some(poison);
        self
    }
}

/// A concrete opponent derived from a template at a target level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyInstance {
    pub template_id: EnemyTemplateId,
    pub name: String,
    pub tier: u8,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    /// Base damage of each enemy attack before the random bonus
    pub damage: u32,
    pub defense: u32,
    pub mana: u32,
    /// Advertised bounty, scaled with level
    pub rewards: RewardRates,
    pub poison: Option<PoisonSpec>,
}

impl EnemyInstance {
    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// Remaining HP as a fraction of max HP
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Subtract damage, flooring HP at zero; returns the HP removed
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }
}
