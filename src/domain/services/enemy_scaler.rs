//! Enemy scaling - Concrete enemy instances from static templates
//!
//! `scaled = floor(base × (1 + 0.15 × (target_level − base_level)))`, computed
//! in integer percent so identical inputs always give identical outputs.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::domain::entities::{EnemyInstance, EnemyTemplate, RewardRates};
use crate::domain::errors::EngineError;

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 5;

/// Scaling factor in percent; negative when the target is far below the base level
pub fn scaling_factor_percent(base_level: u32, target_level: u32) -> i64 {
    100 + 15 * (target_level as i64 - base_level as i64)
}

fn scale_stat(base: u64, factor_percent: i64) -> u64 {
    (base as i64 * factor_percent).div_euclid(100).max(0) as u64
}

/// Deterministically scale a template to `target_level`
pub fn scale_to_level(template: &EnemyTemplate, target_level: u32) -> EnemyInstance {
    let factor = scaling_factor_percent(template.base_level, target_level);
    if factor < 0 {
        warn!(
            enemy = %template.id,
            base_level = template.base_level,
            target_level,
            "Negative enemy scaling factor; stats clamped at zero"
        );
    }

    let stat = |base: u32| scale_stat(base as u64, factor) as u32;
    let max_hp = stat(template.stats.hp);

    EnemyInstance {
        template_id: template.id.clone(),
        name: template.name.clone(),
        tier: template.tier,
        level: target_level,
        current_hp: max_hp,
        max_hp,
        damage: stat(template.stats.strength),
        defense: stat(template.stats.defense),
        mana: stat(template.stats.mana),
        rewards: RewardRates {
            experience: scale_stat(template.rewards.experience, factor),
            currency: scale_stat(template.rewards.currency, factor),
            forging_drop_chance: template.rewards.forging_drop_chance,
        },
        poison: template.poison,
    }
}

/// `clamp(ceil(level / 5), 1, 5)`
pub fn tier_for_level(player_level: u32) -> u8 {
    let tier = player_level.div_ceil(5);
    tier.clamp(MIN_TIER as u32, MAX_TIER as u32) as u8
}

/// Pick a template of the player's tier uniformly at random and scale it to the player's level
pub fn random_for_player_level<R: Rng + ?Sized>(
    templates: &[EnemyTemplate],
    player_level: u32,
    rng: &mut R,
) -> Result<EnemyInstance, EngineError> {
    let tier = tier_for_level(player_level);
    let candidates: Vec<&EnemyTemplate> = templates.iter().filter(|t| t.tier == tier).collect();
    let template = candidates
        .choose(rng)
        .ok_or(EngineError::EmptyTier(tier))?;
    Ok(scale_to_level(template, player_level))
}
