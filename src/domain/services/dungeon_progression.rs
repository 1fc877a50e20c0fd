//! Dungeon progression controller
//!
//! A dungeon run is one session walked through the dungeon's encounters in
//! order. After each victory the controller either loads the next encounter
//! into the same session or closes the run as `DungeonComplete` and grants
//! the completion bundle. Both transitions validate everything they need
//! before touching the session or character.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::entities::{
    Actor, Character, CombatLogEntry, CombatSession, CompletionBundle, Dungeon, EffectKind,
    EnemyInstance, SessionStatus,
};
use crate::domain::errors::EngineError;
use crate::domain::services::enemy_scaler::scale_to_level;
use crate::domain::services::lookup::{EnemyLookup, ItemLookup};
use crate::domain::services::progression::{self, LevelUpReport};

/// What happened after a dungeon encounter was won
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum DungeonStep {
    /// The session is active again against the encounter at `encounter_index`
    NextEncounter { encounter_index: usize },
    /// The final encounter fell; the bundle was granted
    Completed {
        bundle: CompletionBundle,
        level_up: LevelUpReport,
    },
}

/// Check that every encounter of a dungeon resolves to an enemy template
pub fn validate_dungeon<E: EnemyLookup + ?Sized>(
    dungeon: &Dungeon,
    enemies: &E,
) -> Result<(), EngineError> {
    if dungeon.encounter_count() == 0 {
        return Err(EngineError::Catalog(format!(
            "dungeon {} has no encounters",
            dungeon.id
        )));
    }
    for encounter in dungeon.encounters() {
        if enemies.enemy_template(&encounter.enemy_template_id).is_none() {
            error!(
                dungeon = %dungeon.id,
                enemy = %encounter.enemy_template_id,
                position = encounter.position,
                "Dungeon references a missing enemy template"
            );
            return Err(EngineError::MissingEnemyTemplate(
                encounter.enemy_template_id.clone(),
            ));
        }
    }
    Ok(())
}

fn encounter_enemy<E: EnemyLookup + ?Sized>(
    dungeon: &Dungeon,
    index: usize,
    enemies: &E,
) -> Result<EnemyInstance, EngineError> {
    let encounter = dungeon.encounter(index).ok_or_else(|| {
        EngineError::Catalog(format!(
            "dungeon {} has no encounter at index {}",
            dungeon.id, index
        ))
    })?;
    let Some(template) = enemies.enemy_template(&encounter.enemy_template_id) else {
        error!(
            dungeon = %dungeon.id,
            enemy = %encounter.enemy_template_id,
            position = encounter.position,
            "Enemy template vanished mid-run"
        );
        return Err(EngineError::MissingEnemyTemplate(
            encounter.enemy_template_id.clone(),
        ));
    };
    Ok(scale_to_level(template, encounter.level))
}

/// Open a new run at encounter 0.
///
/// The caller is responsible for the single-active-session check.
pub fn start_run<E: EnemyLookup + ?Sized>(
    character: &Character,
    dungeon: &Dungeon,
    enemies: &E,
) -> Result<CombatSession, EngineError> {
    if character.progression.level < dungeon.required_level {
        return Err(EngineError::LevelTooLow {
            required: dungeon.required_level,
            current: character.progression.level,
        });
    }
    if character.combat.current_hp == 0 {
        return Err(EngineError::Incapacitated);
    }
    validate_dungeon(dungeon, enemies)?;

    let enemy = encounter_enemy(dungeon, 0, enemies)?;
    let session = CombatSession::new(
        character.id,
        enemy,
        character.combat.current_hp,
        character.combat.max_hp,
    )
    .for_dungeon(dungeon.id.clone(), dungeon.encounter_count());
    Ok(session)
}

/// Move a dungeon session past a won encounter
pub fn advance_after_victory<E, I>(
    character: &mut Character,
    session: &mut CombatSession,
    dungeon: &Dungeon,
    enemies: &E,
    items: &I,
) -> Result<DungeonStep, EngineError>
where
    E: EnemyLookup + ?Sized,
    I: ItemLookup + ?Sized,
{
    if session.status != SessionStatus::Victory {
        return Err(EngineError::SessionNotActive(session.id));
    }
    let index = match &session.dungeon {
        Some(progress) if progress.dungeon_id == dungeon.id && progress.completion.is_none() => {
            progress.encounter_index
        }
        _ => return Err(EngineError::SessionNotActive(session.id)),
    };

    if dungeon.is_final(index) {
        let bundle = dungeon.completion.clone();
        let level_up = progression::grant_completion(character, &bundle, items)?;
        session.status = SessionStatus::DungeonComplete;
        if let Some(progress) = session.dungeon.as_mut() {
            progress.completion = Some(bundle.clone());
        }
        session.push_log(CombatLogEntry::new(
            Actor::System,
            "dungeon_complete",
            format!(
                "{} cleared! You receive {} gold, {} experience and {} tetranuta.",
                dungeon.name, bundle.currency, bundle.experience, bundle.forging_currency
            ),
        ));
        session.touch();
        info!(
            character_id = %character.id,
            dungeon = %dungeon.id,
            levels_gained = level_up.levels_gained,
            "Dungeon complete"
        );
        return Ok(DungeonStep::Completed { bundle, level_up });
    }

    let next = index + 1;
    let enemy = encounter_enemy(dungeon, next, enemies)?;
    if let Some(progress) = session.dungeon.as_mut() {
        progress.encounter_index = next;
    }
    session.enemy = enemy;
    session.turn = 1;
    session.defending = false;
    session
        .effects
        .retain(|e| !matches!(e.kind, EffectKind::Burn { .. }));
    session.status = SessionStatus::Active;
    session.player_hp = character.combat.current_hp;
    session.player_max_hp = character.combat.max_hp;
    session.announce_enemy();
    session.touch();
    info!(
        character_id = %character.id,
        dungeon = %dungeon.id,
        encounter = next,
        "Advanced to next dungeon encounter"
    );
    Ok(DungeonStep::NextEncounter {
        encounter_index: next,
    })
}
