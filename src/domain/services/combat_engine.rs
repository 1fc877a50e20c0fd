//! Combat turn engine - Resolves one player action against an active session
//!
//! A call validates the action, resolves the player's step, then (unless the
//! action was a free item use or the enemy fell) resolves exactly one enemy
//! turn. Validation happens before any mutation, so an `Err` leaves both the
//! character and the session unchanged.
//!
//! Player HP lives on the character; the session keeps a mirrored snapshot
//! that is refreshed before every log entry.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    ActiveEffect, Actor, BuffEffect, Character, CombatLogEntry, CombatSession, EffectKind,
    ItemType, SessionStatus, SkillDefinition, SkillKind, EXECUTE_THRESHOLD,
};
use crate::domain::errors::EngineError;
use crate::domain::services::attribute_calculator::{
    apply_crit, crit_chance, damage_for_style, magical_damage, BASE_ATTACK_DAMAGE,
};
use crate::domain::services::lookup::{ItemLookup, SkillLookup};
use crate::domain::services::progression::{self, VictoryRewards};
use crate::domain::value_objects::{Attributes, DamageStyle, ItemInstanceId, SkillId};

/// Exclusive upper bound of the random bonus added to every enemy attack
pub const ENEMY_DAMAGE_VARIANCE: u32 = 5;

/// A player-submitted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CombatAction {
    Attack,
    Defend,
    UseItem { item_id: ItemInstanceId },
    Skill { skill_id: SkillId },
}

impl CombatAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defend => "defend",
            Self::UseItem { .. } => "use_item",
            Self::Skill { .. } => "skill",
        }
    }
}

/// Result of one resolved action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub action: String,
    pub status: SessionStatus,
    /// False for free actions that did not advance the turn
    pub turn_consumed: bool,
    pub rewards: Option<VictoryRewards>,
    pub currency_lost: Option<u64>,
    /// Index of the first log entry written by this action
    pub log_start: usize,
}

/// Per-action roll state shared by the damage resolvers
struct Striker {
    style: DamageStyle,
    total: Attributes,
    crit_chance: f64,
    empower_percent: u32,
}

impl Striker {
    fn new(character: &Character, session: &CombatSession) -> Self {
        let total = character.total_attributes();
        Self {
            style: DamageStyle::dominant(&total),
            crit_chance: crit_chance(&total),
            empower_percent: session.empower_percent(),
            total,
        }
    }

    fn base_damage(&self) -> u32 {
        damage_for_style(self.style, BASE_ATTACK_DAMAGE, &self.total)
    }

    /// Finish a pre-crit amount: empower, then the critical roll
    fn finish<R: Rng + ?Sized>(&self, damage: u32, rng: &mut R) -> (u32, bool) {
        let damage = percent_of(damage, 100 + self.empower_percent);
        let critical = roll_crit(self.crit_chance, rng);
        if critical {
            (apply_crit(damage), true)
        } else {
            (damage, false)
        }
    }
}

/// `floor(value × percent / 100)`
fn percent_of(value: u32, percent: u32) -> u32 {
    u32::try_from((value as u64 * percent as u64) / 100).unwrap_or(u32::MAX)
}

/// Roll a critical hit against a chance expressed in percent
pub fn roll_crit<R: Rng + ?Sized>(chance_percent: f64, rng: &mut R) -> bool {
    rng.gen_range(0.0..100.0) < chance_percent
}

/// Incoming enemy damage after defend halving and guard reduction
pub fn mitigate_enemy_damage(raw: u32, defending: bool, guard_percent: u32) -> u32 {
    let after_defend = if defending { raw / 2 } else { raw };
    percent_of(after_defend, 100 - guard_percent.min(100))
}

fn sync_player(character: &Character, session: &mut CombatSession) {
    session.player_hp = character.combat.current_hp;
    session.player_max_hp = character.combat.max_hp;
}

fn damage_player(character: &mut Character, session: &mut CombatSession, amount: u32) -> u32 {
    let dealt = amount.min(character.combat.current_hp);
    character.combat.current_hp -= dealt;
    sync_player(character, session);
    dealt
}

fn style_verb(style: DamageStyle) -> &'static str {
    match style {
        DamageStyle::Physical => "strike",
        DamageStyle::Magical => "blast",
    }
}

/// Resolve one action against an active session
pub fn resolve_action<I, S, R>(
    character: &mut Character,
    session: &mut CombatSession,
    action: &CombatAction,
    items: &I,
    skills: &S,
    rng: &mut R,
) -> Result<ActionReport, EngineError>
where
    I: ItemLookup + ?Sized,
    S: SkillLookup + ?Sized,
    R: Rng + ?Sized,
{
    if session.character_id != character.id {
        return Err(EngineError::SessionNotOwned {
            session_id: session.id,
            character_id: character.id,
        });
    }
    if !session.is_active() {
        return Err(EngineError::SessionNotActive(session.id));
    }

    let log_start = session.log.len();
    sync_player(character, session);

    match action {
        CombatAction::UseItem { item_id } => {
            use_item(character, session, *item_id, items)?;
            session.touch();
            return Ok(ActionReport {
                action: action.label().to_string(),
                status: session.status,
                turn_consumed: false,
                rewards: None,
                currency_lost: None,
                log_start,
            });
        }
        CombatAction::Attack => attack(character, session, rng),
        CombatAction::Defend => defend(session),
        CombatAction::Skill { skill_id } => {
            let skill = skills
                .skill(skill_id)
                .ok_or_else(|| EngineError::UnknownSkill(skill_id.clone()))?;
            if character.combat.current_mana < skill.mana_cost {
                return Err(EngineError::InsufficientMana {
                    required: skill.mana_cost,
                    available: character.combat.current_mana,
                });
            }
            character.combat.current_mana -= skill.mana_cost;
            cast_skill(character, session, skill, rng);
        }
    }

    let mut report = ActionReport {
        action: action.label().to_string(),
        status: SessionStatus::Active,
        turn_consumed: true,
        rewards: None,
        currency_lost: None,
        log_start,
    };

    if session.enemy.is_defeated() {
        report.rewards = Some(win(character, session, rng));
    } else {
        enemy_turn(character, session, rng);
        if session.enemy.is_defeated() {
            report.rewards = Some(win(character, session, rng));
        } else if character.combat.current_hp == 0 {
            report.currency_lost = Some(lose(character, session));
        } else {
            session.turn += 1;
        }
    }

    report.status = session.status;
    session.touch();
    Ok(report)
}

fn attack<R: Rng + ?Sized>(character: &Character, session: &mut CombatSession, rng: &mut R) {
    session.defending = false;
    let striker = Striker::new(character, session);
    let (damage, critical) = striker.finish(striker.base_damage(), rng);
    let dealt = session.enemy.take_damage(damage);

    let message = if critical {
        format!(
            "Critical {}! You hit the {} for {} damage.",
            style_verb(striker.style),
            session.enemy.name,
            dealt
        )
    } else {
        format!("You {} the {} for {} damage.", style_verb(striker.style), session.enemy.name, dealt)
    };
    session.push_log(
        CombatLogEntry::new(Actor::Player, "attack", message).with_damage(dealt, critical),
    );
}

fn defend(session: &mut CombatSession) {
    session.defending = true;
    session.push_log(CombatLogEntry::new(
        Actor::Player,
        "defend",
        "You brace yourself for the next attack.",
    ));
}

fn use_item<I: ItemLookup + ?Sized>(
    character: &mut Character,
    session: &mut CombatSession,
    item_id: ItemInstanceId,
    items: &I,
) -> Result<(), EngineError> {
    let item = character
        .item(item_id)
        .ok_or(EngineError::ItemNotOwned(item_id))?;
    let template = items
        .item_template(&item.template_id)
        .ok_or_else(|| EngineError::ItemTemplateNotFound(item.template_id.clone()))?;
    if template.item_type != ItemType::Consumable || !template.effects.restores_anything() {
        return Err(EngineError::ItemNotUsable(format!(
            "{} cannot be used in combat",
            template.name
        )));
    }
    let effects = template.effects.clone();
    let name = template.name.clone();

    character.consume_one(item_id)?;
    session.defending = false;

    let max_hp = character.combat.max_hp;
    let max_mana = character.combat.max_mana;
    let healed = character.heal(effects.heal.saturating_add(percent_of(max_hp, effects.heal_percent)));
    let restored =
        character.restore_mana(effects.mana.saturating_add(percent_of(max_mana, effects.mana_percent)));
    let cured = effects.cure_poison && session.is_poisoned();
    if cured {
        session
            .effects
            .retain(|e| !matches!(e.kind, EffectKind::Poison { .. }));
    }
    sync_player(character, session);

    let mut parts = Vec::new();
    if healed > 0 {
        parts.push(format!("restore {} HP", healed));
    }
    if restored > 0 {
        parts.push(format!("recover {} mana", restored));
    }
    if cured {
        parts.push("cure the poison".to_string());
    }
    let message = if parts.is_empty() {
        format!("You use the {}, but nothing happens.", name)
    } else {
        format!("You use the {} and {}.", name, parts.join(", "))
    };
    session.push_log(CombatLogEntry::new(Actor::Player, "use_item", message).with_healed(healed));
    Ok(())
}

fn cast_skill<R: Rng + ?Sized>(
    character: &mut Character,
    session: &mut CombatSession,
    skill: &SkillDefinition,
    rng: &mut R,
) {
    session.defending = false;
    match skill.kind {
        SkillKind::Damage { multiplier_percent } => {
            resolve_damage_skill(character, session, skill, multiplier_percent, None, rng)
        }
        SkillKind::Finisher {
            multiplier_percent,
            execute_multiplier_percent,
        } => resolve_damage_skill(
            character,
            session,
            skill,
            multiplier_percent,
            Some(execute_multiplier_percent),
            rng,
        ),
        SkillKind::Chain {
            multiplier_percent,
            hits,
        } => resolve_chain_skill(character, session, skill, multiplier_percent, hits, rng),
        SkillKind::Dot {
            multiplier_percent,
            tick_percent,
            turns,
        } => resolve_dot_skill(character, session, skill, multiplier_percent, tick_percent, turns, rng),
        SkillKind::Heal { base } => resolve_heal_skill(character, session, skill, base),
        SkillKind::Buff { effect, turns } => resolve_buff_skill(session, skill, effect, turns),
    }
}

fn resolve_damage_skill<R: Rng + ?Sized>(
    character: &Character,
    session: &mut CombatSession,
    skill: &SkillDefinition,
    multiplier_percent: u32,
    execute_multiplier_percent: Option<u32>,
    rng: &mut R,
) {
    let striker = Striker::new(character, session);
    let mut damage = percent_of(striker.base_damage(), multiplier_percent);
    let executing = match execute_multiplier_percent {
        Some(execute) if session.enemy.hp_fraction() < EXECUTE_THRESHOLD => {
            damage = percent_of(damage, execute);
            true
        }
        _ => false,
    };
    let (damage, critical) = striker.finish(damage, rng);
    let dealt = session.enemy.take_damage(damage);

    let mut message = format!("You use {} on the {} for {} damage", skill.name, session.enemy.name, dealt);
    if executing {
        message.push_str(", exploiting its weakness");
    }
    if critical {
        message.push_str(" (critical)");
    }
    message.push('.');
    session.push_log(
        CombatLogEntry::new(Actor::Player, format!("skill:{}", skill.id), message)
            .with_damage(dealt, critical),
    );
}

fn resolve_chain_skill<R: Rng + ?Sized>(
    character: &Character,
    session: &mut CombatSession,
    skill: &SkillDefinition,
    multiplier_percent: u32,
    hits: u32,
    rng: &mut R,
) {
    let striker = Striker::new(character, session);
    let per_hit = percent_of(striker.base_damage(), multiplier_percent);
    for hit in 1..=hits.max(1) {
        if session.enemy.is_defeated() {
            break;
        }
        let (damage, critical) = striker.finish(per_hit, rng);
        let dealt = session.enemy.take_damage(damage);
        let message = format!(
            "{} hit {} strikes the {} for {} damage{}.",
            skill.name,
            hit,
            session.enemy.name,
            dealt,
            if critical { " (critical)" } else { "" }
        );
        session.push_log(
            CombatLogEntry::new(Actor::Player, format!("skill:{}", skill.id), message)
                .with_damage(dealt, critical),
        );
    }
}

fn resolve_dot_skill<R: Rng + ?Sized>(
    character: &Character,
    session: &mut CombatSession,
    skill: &SkillDefinition,
    multiplier_percent: u32,
    tick_percent: u32,
    turns: u32,
    rng: &mut R,
) {
    let striker = Striker::new(character, session);
    let base = striker.base_damage();
    let (damage, critical) = striker.finish(percent_of(base, multiplier_percent), rng);
    let dealt = session.enemy.take_damage(damage);
    let per_turn = percent_of(base, tick_percent).max(1);

    if turns > 0 {
        session
            .effects
            .retain(|e| !(matches!(e.kind, EffectKind::Burn { .. }) && e.source == skill.name));
        session.effects.push(ActiveEffect {
            kind: EffectKind::Burn {
                damage_per_turn: per_turn,
            },
            remaining_turns: turns,
            source: skill.name.clone(),
        });
    }

    let message = format!(
        "You use {} on the {} for {} damage{}; it will suffer {} damage for {} turns.",
        skill.name,
        session.enemy.name,
        dealt,
        if critical { " (critical)" } else { "" },
        per_turn,
        turns
    );
    session.push_log(
        CombatLogEntry::new(Actor::Player, format!("skill:{}", skill.id), message)
            .with_damage(dealt, critical),
    );
}

fn resolve_heal_skill(
    character: &mut Character,
    session: &mut CombatSession,
    skill: &SkillDefinition,
    base: u32,
) {
    let amount = magical_damage(base, &character.total_attributes());
    let healed = character.heal(amount);
    sync_player(character, session);
    let message = format!("You cast {} and restore {} HP.", skill.name, healed);
    session.push_log(
        CombatLogEntry::new(Actor::Player, format!("skill:{}", skill.id), message).with_healed(healed),
    );
}

fn resolve_buff_skill(session: &mut CombatSession, skill: &SkillDefinition, effect: BuffEffect, turns: u32) {
    let (kind, description) = match effect {
        BuffEffect::Empower { percent } => (
            EffectKind::Empower { percent },
            format!("your damage rises by {}%", percent),
        ),
        BuffEffect::Guard { percent } => (
            EffectKind::Guard { percent },
            format!("incoming damage is reduced by {}%", percent),
        ),
    };
    // Recasting refreshes rather than stacks
    session.effects.retain(|e| e.source != skill.name);
    session.effects.push(ActiveEffect {
        kind,
        remaining_turns: turns,
        source: skill.name.clone(),
    });
    let message = format!("You cast {}: {} for {} turns.", skill.name, description, turns);
    session.push_log(CombatLogEntry::new(
        Actor::Player,
        format!("skill:{}", skill.id),
        message,
    ));
}

/// Effects ticking at the start of the enemy turn: burns on the enemy, poison on the player
fn tick_damage_effects(character: &mut Character, session: &mut CombatSession) {
    let ticks: Vec<(EffectKind, String)> = session
        .effects
        .iter()
        .filter(|e| matches!(e.kind, EffectKind::Burn { .. } | EffectKind::Poison { .. }))
        .map(|e| (e.kind, e.source.clone()))
        .collect();

    for (kind, source) in ticks {
        match kind {
            EffectKind::Burn { damage_per_turn } => {
                if session.enemy.is_defeated() {
                    continue;
                }
                let dealt = session.enemy.take_damage(damage_per_turn);
                let message = format!("The {} suffers {} damage from {}.", session.enemy.name, dealt, source);
                session.push_log(
                    CombatLogEntry::new(Actor::System, "burn", message).with_damage(dealt, false),
                );
            }
            EffectKind::Poison { damage_per_turn } => {
                if character.combat.current_hp == 0 {
                    continue;
                }
                let dealt = damage_player(character, session, damage_per_turn);
                let message = format!("Poison from the {} deals {} damage to you.", source, dealt);
                session.push_log(
                    CombatLogEntry::new(Actor::System, "poison", message).with_damage(dealt, false),
                );
            }
            _ => {}
        }
    }
}

/// Count every effect down by one enemy turn and drop the expired ones
fn expire_effects(session: &mut CombatSession) {
    let mut expired = Vec::new();
    for effect in session.effects.iter_mut() {
        effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        if effect.remaining_turns == 0 {
            expired.push(effect.source.clone());
        }
    }
    session.effects.retain(|e| e.remaining_turns > 0);
    for source in expired {
        session.push_log(CombatLogEntry::new(
            Actor::System,
            "effect_expired",
            format!("{} wears off.", source),
        ));
    }
}

fn enemy_turn<R: Rng + ?Sized>(character: &mut Character, session: &mut CombatSession, rng: &mut R) {
    tick_damage_effects(character, session);
    if session.enemy.is_defeated() || character.combat.current_hp == 0 {
        return;
    }

    let raw = session.enemy.damage + rng.gen_range(0..ENEMY_DAMAGE_VARIANCE);
    let defended = session.defending;
    let damage = mitigate_enemy_damage(raw, defended, session.guard_percent());
    session.defending = false;
    let dealt = damage_player(character, session, damage);

    let message = if defended {
        format!("The {} attacks! You block part of the blow and take {} damage.", session.enemy.name, dealt)
    } else {
        format!("The {} attacks you for {} damage.", session.enemy.name, dealt)
    };
    session.push_log(CombatLogEntry::new(Actor::Enemy, "attack", message).with_damage(dealt, false));

    // A poison inflicted below ticks on each of its next `turns` enemy turns
    expire_effects(session);

    if let Some(poison) = session.enemy.poison {
        if dealt > 0
            && poison.turns > 0
            && character.combat.current_hp > 0
            && !session.is_poisoned()
            && rng.gen_range(0..100) < poison.chance_percent
        {
            let source = session.enemy.name.clone();
            session.effects.push(ActiveEffect {
                kind: EffectKind::Poison {
                    damage_per_turn: poison.damage_per_turn,
                },
                remaining_turns: poison.turns,
                source: source.clone(),
            });
            session.push_log(CombatLogEntry::new(
                Actor::Enemy,
                "poison",
                format!("The {} poisons you!", source),
            ));
        }
    }
}

fn win<R: Rng + ?Sized>(character: &mut Character, session: &mut CombatSession, rng: &mut R) -> VictoryRewards {
    session.status = SessionStatus::Victory;
    session.defending = false;
    let rewards = progression::settle_victory(character, &session.enemy, rng);

    let mut message = format!(
        "The {} is defeated! You gain {} experience and {} gold.",
        session.enemy.name, rewards.experience, rewards.currency
    );
    if rewards.forging_currency > 0 {
        message.push_str(" You found a tetranuta!");
    }
    session.push_log(CombatLogEntry::new(Actor::System, "victory", message));
    if rewards.level_up.levels_gained > 0 {
        session.push_log(CombatLogEntry::new(
            Actor::System,
            "level_up",
            format!(
                "You reached level {} and gained {} skill points.",
                rewards.level_up.new_level, rewards.level_up.skill_points_gained
            ),
        ));
    }
    rewards
}

fn lose(character: &mut Character, session: &mut CombatSession) -> u64 {
    session.status = SessionStatus::Defeat;
    session.defending = false;
    session.effects.clear();
    session.push_log(CombatLogEntry::new(
        Actor::System,
        "defeat",
        format!("You were defeated by the {}.", session.enemy.name),
    ));
    let lost = progression::apply_defeat(character);
    if lost > 0 {
        session.push_log(CombatLogEntry::new(
            Actor::System,
            "penalty",
            format!("You dropped {} gold while fleeing.", lost),
        ));
    }
    lost
}
