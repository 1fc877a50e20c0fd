//! Skill definitions - The static per-archetype skill table entries

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterClass, SkillId};

/// Enemy HP fraction under which finishers apply their execute multiplier
pub const EXECUTE_THRESHOLD: f64 = 0.30;

/// Timed effect a buff skill installs on the caster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffEffect {
    /// Raise outgoing damage by a percentage
    Empower { percent: u32 },
    /// Reduce incoming enemy damage by a percentage
    Guard { percent: u32 },
}

/// Shape of a skill; each variant has exactly one resolver in the turn engine.
///
/// Multipliers are expressed in percent so every result floors exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkillKind {
    Damage {
        multiplier_percent: u32,
    },
    Finisher {
        multiplier_percent: u32,
        execute_multiplier_percent: u32,
    },
    Chain {
        multiplier_percent: u32,
        hits: u32,
    },
    Dot {
        multiplier_percent: u32,
        tick_percent: u32,
        turns: u32,
    },
    Heal {
        base: u32,
    },
    Buff {
        effect: BuffEffect,
        turns: u32,
    },
}

impl SkillKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Damage { .. } => "damage",
            Self::Finisher { .. } => "finisher",
            Self::Chain { .. } => "chain",
            Self::Dot { .. } => "dot",
            Self::Heal { .. } => "heal",
            Self::Buff { .. } => "buff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub class: CharacterClass,
    pub mana_cost: u32,
    pub kind: SkillKind,
    pub description: String,
}

impl SkillDefinition {
    pub fn new(
        id: impl Into<SkillId>,
        name: impl Into<String>,
        class: CharacterClass,
        mana_cost: u32,
        kind: SkillKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class,
            mana_cost,
            kind,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
