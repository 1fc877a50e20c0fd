//! Reward & leveling resolver
//!
//! Converts victories, defeats and dungeon completions into experience,
//! currency, forging currency and level-ups.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Character, CompletionBundle, EnemyInstance, Progression};
use crate::domain::errors::EngineError;
use crate::domain::services::lookup::ItemLookup;

/// Share of held currency lost on defeat, in percent
pub const DEFEAT_CURRENCY_PENALTY_PERCENT: u64 = 10;

/// Share of max HP a defeated character is left with, in percent
pub const DEFEAT_REVIVE_HP_PERCENT: u32 = 10;

/// Every this many levels an extra skill point is granted
pub const BONUS_SKILL_POINT_INTERVAL: u32 = 5;

/// Experience needed to advance from `level` to `level + 1`
pub fn experience_threshold(level: u32) -> u64 {
    100 + 50 * (level.max(1) as u64 - 1)
}

pub fn victory_experience(enemy_level: u32) -> u64 {
    20 + 5 * enemy_level as u64
}

pub fn victory_currency(enemy_level: u32) -> u64 {
    10 + 3 * enemy_level as u64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub skill_points_gained: u32,
    pub new_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryRewards {
    pub experience: u64,
    pub currency: u64,
    pub forging_currency: u64,
    pub level_up: LevelUpReport,
}

/// Add experience and drain it through as many level-ups as it covers
pub fn grant_experience(progression: &mut Progression, experience: u64) -> LevelUpReport {
    progression.experience = progression.experience.saturating_add(experience);
    let mut report = LevelUpReport {
        new_level: progression.level,
        ..Default::default()
    };

    loop {
        let threshold = experience_threshold(progression.level);
        if progression.experience < threshold {
            break;
        }
        progression.experience -= threshold;
        progression.level += 1;
        let mut points = 1;
        if progression.level % BONUS_SKILL_POINT_INTERVAL == 0 {
            points += 1;
        }
        progression.skill_points += points;
        report.levels_gained += 1;
        report.skill_points_gained += points;
    }

    report.new_level = progression.level;
    report
}

/// Grant the rewards for defeating `enemy`
pub fn settle_victory<R: Rng + ?Sized>(
    character: &mut Character,
    enemy: &EnemyInstance,
    rng: &mut R,
) -> VictoryRewards {
    let experience = victory_experience(enemy.level);
    let currency = victory_currency(enemy.level);
    let chance = enemy.rewards.forging_drop_chance.clamp(0.0, 1.0);
    let forging_currency = u64::from(rng.gen_bool(chance));

    let progression = &mut character.progression;
    progression.currency = progression.currency.saturating_add(currency);
    progression.forging_currency += forging_currency;
    let level_up = grant_experience(progression, experience);
    character.combat.wins += 1;

    VictoryRewards {
        experience,
        currency,
        forging_currency,
        level_up,
    }
}

/// Record a loss: currency penalty, then revive with a sliver of HP.
///
/// Returns the currency lost.
pub fn apply_defeat(character: &mut Character) -> u64 {
    let penalty = character.progression.currency * DEFEAT_CURRENCY_PENALTY_PERCENT / 100;
    character.progression.currency -= penalty;
    character.combat.losses += 1;
    character.combat.current_hp = (character.combat.max_hp * DEFEAT_REVIVE_HP_PERCENT / 100).max(1);
    penalty
}

/// Grant a dungeon's completion bundle.
///
/// Every item template is resolved before anything is granted.
pub fn grant_completion<L: ItemLookup + ?Sized>(
    character: &mut Character,
    bundle: &CompletionBundle,
    items: &L,
) -> Result<LevelUpReport, EngineError> {
    let mut templates = Vec::with_capacity(bundle.items.len());
    for grant in &bundle.items {
        let template = items.item_template(&grant.template_id).ok_or_else(|| {
            EngineError::Catalog(format!(
                "completion reward references unknown item {}",
                grant.template_id
            ))
        })?;
        templates.push((template, grant.quantity));
    }

    for (template, quantity) in templates {
        character.add_item(template, quantity);
    }
    let progression = &mut character.progression;
    progression.currency = progression.currency.saturating_add(bundle.currency);
    progression.forging_currency += bundle.forging_currency;
    Ok(grant_experience(progression, bundle.experience))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::domain::entities::{ItemGrant, ItemTemplate, ItemType, RewardRates};
    use crate::domain::value_objects::{Attributes, CharacterClass, ItemTemplateId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hero() -> Character {
        Character::new("Ada", CharacterClass::Rogue, Attributes::new(5, 5, 5, 5, 5))
    }

    fn enemy(level: u32, forging_drop_chance: f64) -> EnemyInstance {
        EnemyInstance {
            template_id: "bandit".into(),
            name: "Bandit".to_string(),
            tier: 1,
            level,
            current_hp: 0,
            max_hp: 40,
            damage: 6,
            defense: 1,
            mana: 0,
            rewards: RewardRates {
                experience: 0,
                currency: 0,
                forging_drop_chance,
            },
            poison: None,
        }
    }

    #[test]
    fn test_thresholds_grow_with_level() {
        assert_eq!(experience_threshold(1), 100);
        assert_eq!(experience_threshold(2), 150);
        assert_eq!(experience_threshold(10), 550);
    }

    #[test]
    fn test_leveling_drains_across_multiple_levels() {
        let mut progression = Progression::default();
        let report = grant_experience(&mut progression, 260);
        assert_eq!(progression.level, 3);
        assert_eq!(progression.experience, 10);
        assert_eq!(report.levels_gained, 2);
        assert_eq!(report.skill_points_gained, 2);
        assert_eq!(progression.skill_points, 2);
    }

    #[test]
    fn test_every_fifth_level_grants_bonus_point() {
        let mut progression = Progression::default();
        // 100 + 150 + 200 + 250 reaches level 5 exactly
        let report = grant_experience(&mut progression, 700);
        assert_eq!(progression.level, 5);
        assert_eq!(progression.experience, 0);
        assert_eq!(report.skill_points_gained, 5);
    }

    #[test]
    fn test_no_level_below_threshold() {
        let mut progression = Progression::default();
        let report = grant_experience(&mut progression, 99);
        assert_eq!(report.levels_gained, 0);
        assert_eq!(report.new_level, 1);
        assert_eq!(progression.experience, 99);
    }

    #[test]
    fn test_victory_rewards_use_enemy_level() {
        let mut character = hero();
        let mut rng = StdRng::seed_from_u64(3);
        let rewards = settle_victory(&mut character, &enemy(4, 0.0), &mut rng);
        assert_eq!(rewards.experience, 40);
        assert_eq!(rewards.currency, 22);
        assert_eq!(rewards.forging_currency, 0);
        assert_eq!(character.progression.currency, 22);
        assert_eq!(character.progression.experience, 40);
        assert_eq!(character.combat.wins, 1);
    }

    #[test]
    fn test_forging_drop_follows_catalog_chance() {
        let mut character = hero();
        let mut rng = StdRng::seed_from_u64(3);
        let rewards = settle_victory(&mut character, &enemy(1, 1.0), &mut rng);
        assert_eq!(rewards.forging_currency, 1);
        assert_eq!(character.progression.forging_currency, 1);
    }

    #[test]
    fn test_defeat_penalty_floors() {
        let mut character = hero();
        character.progression.currency = 57;
        character.combat.current_hp = 0;
        let lost = apply_defeat(&mut character);
        assert_eq!(lost, 5);
        assert_eq!(character.progression.currency, 52);
        assert_eq!(character.combat.losses, 1);
        assert_eq!(character.combat.current_hp, 15);

        character.progression.currency = 0;
        assert_eq!(apply_defeat(&mut character), 0);
    }

    #[test]
    fn test_completion_bundle_is_validated_before_granting() {
        let potion = ItemTemplate::new("minor_health_potion", "Minor Health Potion", ItemType::Consumable);
        let items: HashMap<ItemTemplateId, ItemTemplate> =
            [(potion.id.clone(), potion)].into_iter().collect();
        let mut character = hero();

        let broken = CompletionBundle {
            currency: 100,
            experience: 0,
            items: vec![ItemGrant {
                template_id: "phantom_blade".into(),
                quantity: 1,
            }],
            forging_currency: 2,
        };
        assert!(grant_completion(&mut character, &broken, &items).is_err());
        assert_eq!(character.progression.currency, 0);

        let bundle = CompletionBundle {
            currency: 100,
            experience: 260,
            items: vec![ItemGrant {
                template_id: "minor_health_potion".into(),
                quantity: 3,
            }],
            forging_currency: 2,
        };
        let report = grant_completion(&mut character, &bundle, &items).unwrap();
        assert_eq!(report.new_level, 3);
        assert_eq!(character.progression.currency, 100);
        assert_eq!(character.progression.forging_currency, 2);
        assert_eq!(character.inventory[0].quantity, 3);
    }
}
