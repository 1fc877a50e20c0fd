//! Combat session - The persisted record of one in-progress fight or dungeon run
//!
//! At most one session per character may be `Active`. Dungeon sessions carry
//! their progression across encounters; every other session ends with its
//! first terminal outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CompletionBundle, EnemyInstance};
use crate::domain::value_objects::{CharacterId, CombatSessionId, DungeonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Victory,
    Defeat,
    DungeonComplete,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::DungeonComplete => "dungeon_complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a dungeon-bound session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonProgress {
    pub dungeon_id: DungeonId,
    pub encounter_index: usize,
    pub encounter_count: usize,
    /// Set once, when the completion bundle is granted
    pub completion: Option<CompletionBundle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Enemy,
    System,
}

/// Timed effects living on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Player deals `percent`% more damage
    Empower { percent: u32 },
    /// Player takes `percent`% less damage
    Guard { percent: u32 },
    /// Player loses HP at the start of each enemy turn
    Poison { damage_per_turn: u32 },
    /// Enemy loses HP at the start of each enemy turn
    Burn { damage_per_turn: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_turns: u32,
    pub source: String,
}

/// One append-only log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub turn: u32,
    pub actor: Actor,
    pub action: String,
    pub damage: u32,
    pub healed: u32,
    pub critical: bool,
    pub player_hp: u32,
    pub enemy_hp: u32,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl CombatLogEntry {
    pub fn new(actor: Actor, action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            turn: 0,
            actor,
            action: action.into(),
            damage: 0,
            healed: 0,
            critical: false,
            player_hp: 0,
            enemy_hp: 0,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn with_damage(mut self, damage: u32, critical: bool) -> Self {
        self.damage = damage;
        self.critical = critical;
        self
    }

    pub fn with_healed(mut self, healed: u32) -> Self {
        self.healed = healed;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatSession {
    pub id: CombatSessionId,
    pub character_id: CharacterId,
    pub enemy: EnemyInstance,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub defending: bool,
    pub turn: u32,
    pub status: SessionStatus,
    pub dungeon: Option<DungeonProgress>,
    pub effects: Vec<ActiveEffect>,
    pub log: Vec<CombatLogEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CombatSession {
    pub fn new(character_id: CharacterId, enemy: EnemyInstance, player_hp: u32, player_max_hp: u32) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: CombatSessionId::new(),
            character_id,
            enemy,
            player_hp,
            player_max_hp,
            defending: false,
            turn: 1,
            status: SessionStatus::Active,
            dungeon: None,
            effects: Vec::new(),
            log: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        session.announce_enemy();
        session
    }

    pub fn for_dungeon(mut self, dungeon_id: DungeonId, encounter_count: usize) -> Self {
        self.dungeon = Some(DungeonProgress {
            dungeon_id,
            encounter_index: 0,
            encounter_count,
            completion: None,
        });
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn dungeon_id(&self) -> Option<&DungeonId> {
        self.dungeon.as_ref().map(|d| &d.dungeon_id)
    }

    /// Append an entry, stamping the current turn and HP snapshot
    pub fn push_log(&mut self, mut entry: CombatLogEntry) {
        entry.turn = self.turn;
        entry.player_hp = self.player_hp;
        entry.enemy_hp = self.enemy.current_hp;
        self.log.push(entry);
    }

    /// Log the arrival of the current enemy
    pub fn announce_enemy(&mut self) {
        let message = format!(
            "A level {} {} appears! ({} HP)",
            self.enemy.level, self.enemy.name, self.enemy.max_hp
        );
        self.push_log(CombatLogEntry::new(Actor::System, "enemy_appears", message));
    }

    /// Sum of active effect percentages of one kind
    pub fn empower_percent(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                EffectKind::Empower { percent } => percent,
                _ => 0,
            })
            .sum()
    }

    pub fn guard_percent(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                EffectKind::Guard { percent } => percent,
                _ => 0,
            })
            .sum::<u32>()
            .min(100)
    }

    pub fn is_poisoned(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::Poison { .. }))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RewardRates;

    fn rat() -> EnemyInstance {
        EnemyInstance {
            template_id: "rat".into(),
            name: "Giant Rat".to_string(),
            tier: 1,
            level: 1,
            current_hp: 30,
            max_hp: 30,
            damage: 4,
            defense: 0,
            mana: 0,
            rewards: RewardRates {
                experience: 10,
                currency: 5,
                forging_drop_chance: 0.15,
            },
            poison: None,
        }
    }

    #[test]
    fn test_new_session_announces_enemy() {
        let session = CombatSession::new(CharacterId::new(), rat(), 100, 100);
        assert!(session.is_active());
        assert_eq!(session.turn, 1);
        assert_eq!(session.log.len(), 1);
        assert_eq!(session.log[0].action, "enemy_appears");
        assert_eq!(session.log[0].enemy_hp, 30);
    }

    #[test]
    fn test_effect_totals() {
        let mut session = CombatSession::new(CharacterId::new(), rat(), 100, 100);
        session.effects.push(ActiveEffect {
            kind: EffectKind::Guard { percent: 70 },
            remaining_turns: 2,
            source: "a".to_string(),
        });
        session.effects.push(ActiveEffect {
            kind: EffectKind::Guard { percent: 50 },
            remaining_turns: 2,
            source: "b".to_string(),
        });
        assert_eq!(session.guard_percent(), 100);
        assert_eq!(session.empower_percent(), 0);
        assert!(!session.is_poisoned());
    }
}
