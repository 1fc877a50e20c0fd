//! Derived combat statistics from base attributes plus equipment bonuses.
//!
//! Every function here takes *total* attributes (base + equipment bonus)
//! and is pure.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Attributes, DamageStyle};

/// Base value of a plain attack before attribute scaling
pub const BASE_ATTACK_DAMAGE: u32 = 15;

/// Critical hits deal 150% damage
pub const CRIT_MULTIPLIER_PERCENT: u32 = 150;

/// Narrow a wide intermediate, saturating at `u32::MAX`
fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

pub fn max_hp(total: &Attributes) -> u32 {
    saturate(100 + 10 * total.vitality as u64)
}

pub fn max_mana(total: &Attributes) -> u32 {
    saturate(50 + 5 * total.intelligence as u64)
}

/// `floor(base × (1 + stat/20))`, computed exactly in integers
fn scale_by_stat(base: u32, stat: u32) -> u32 {
    saturate((base as u64 * (20 + stat as u64)) / 20)
}

pub fn physical_damage(base: u32, total: &Attributes) -> u32 {
    scale_by_stat(base, total.strength)
}

pub fn magical_damage(base: u32, total: &Attributes) -> u32 {
    scale_by_stat(base, total.intelligence)
}

pub fn damage_for_style(style: DamageStyle, base: u32, total: &Attributes) -> u32 {
    match style {
        DamageStyle::Physical => physical_damage(base, total),
        DamageStyle::Magical => magical_damage(base, total),
    }
}

/// Critical-hit chance in percent, clamped to [0, 100]
pub fn crit_chance(total: &Attributes) -> f64 {
    let chance = 5.0 + total.dexterity as f64 / 10.0 + total.luck as f64 / 20.0;
    chance.clamp(0.0, 100.0)
}

/// Apply the critical multiplier, flooring the result
pub fn apply_crit(damage: u32) -> u32 {
    saturate((damage as u64 * CRIT_MULTIPLIER_PERCENT as u64) / 100)
}

/// Snapshot of everything derived from a character's totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: u32,
    pub max_mana: u32,
    pub physical_damage: u32,
    pub magical_damage: u32,
    pub crit_chance: f64,
    pub damage_style: DamageStyle,
}

impl DerivedStats {
    pub fn from_totals(total: &Attributes) -> Self {
        Self {
            max_hp: max_hp(total),
            max_mana: max_mana(total),
            physical_damage: physical_damage(BASE_ATTACK_DAMAGE, total),
            magical_damage: magical_damage(BASE_ATTACK_DAMAGE, total),
            crit_chance: crit_chance(total),
            damage_style: DamageStyle::dominant(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vitals_formulas() {
        let total = Attributes::new(0, 6, 12, 0, 0);
        assert_eq!(max_hp(&total), 220);
        assert_eq!(max_mana(&total), 80);
        assert_eq!(max_hp(&Attributes::default()), 100);
        assert_eq!(max_mana(&Attributes::default()), 50);
    }

    #[test]
    fn test_damage_floors() {
        let total = Attributes::new(20, 10, 0, 0, 0);
        assert_eq!(physical_damage(15, &total), 30);
        // 15 × 1.5 = 22.5
        assert_eq!(magical_damage(15, &total), 22);
        // 15 × 1.05 = 15.75
        assert_eq!(physical_damage(15, &Attributes::new(1, 0, 0, 0, 0)), 15);
    }

    #[test]
    fn test_crit_chance() {
        assert_eq!(crit_chance(&Attributes::default()), 5.0);
        assert_eq!(crit_chance(&Attributes::new(0, 0, 0, 15, 10)), 7.0);
        assert_eq!(crit_chance(&Attributes::new(0, 0, 0, 5000, 0)), 100.0);
    }

    #[test]
    fn test_apply_crit() {
        assert_eq!(apply_crit(30), 45);
        assert_eq!(apply_crit(15), 22);
    }

    #[test]
    fn test_huge_attributes_saturate() {
        let total = Attributes::new(u32::MAX, u32::MAX, 500_000_000, 0, 0);
        assert_eq!(max_hp(&total), u32::MAX);
        assert_eq!(max_mana(&total), u32::MAX);
        assert_eq!(physical_damage(15, &total), u32::MAX);
        assert_eq!(magical_damage(15, &total), u32::MAX);
        assert_eq!(apply_crit(u32::MAX), u32::MAX);
        assert_eq!(max_hp(&Attributes::new(0, 0, 400_000_000, 0, 0)), 4_000_000_100);
    }

    #[test]
    fn test_derived_stats_use_dominant_style() {
        let stats = DerivedStats::from_totals(&Attributes::new(20, 0, 0, 0, 0));
        assert_eq!(stats.damage_style, DamageStyle::Physical);
        assert_eq!(stats.physical_damage, 30);
        assert_eq!(stats.magical_damage, 15);
    }
}
