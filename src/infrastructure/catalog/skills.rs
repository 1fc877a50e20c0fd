//! Skill table: six skills per archetype

use crate::domain::entities::{BuffEffect, SkillDefinition, SkillKind};
use crate::domain::value_objects::CharacterClass::{self, Mage, Rogue, Warrior};

fn skill(id: &str, name: &str, class: CharacterClass, cost: u32, kind: SkillKind, about: &str) -> SkillDefinition {
    SkillDefinition::new(id, name, class, cost, kind).with_description(about)
}

pub fn skill_table() -> Vec<SkillDefinition> {
    vec![
        // Warrior
        skill(
            "power_strike",
            "Power Strike",
            Warrior,
            10,
            SkillKind::Damage {
                multiplier_percent: 150,
            },
            "A heavy blow dealing 150% damage.",
        ),
        skill(
            "cleave",
            "Cleave",
            Warrior,
            14,
            SkillKind::Chain {
                multiplier_percent: 70,
                hits: 2,
            },
            "Two sweeping strikes at 70% damage each.",
        ),
        skill(
            "execute",
            "Execute",
            Warrior,
            15,
            SkillKind::Finisher {
                multiplier_percent: 100,
                execute_multiplier_percent: 200,
            },
            "Double damage against enemies below 30% health.",
        ),
        skill(
            "shield_wall",
            "Shield Wall",
            Warrior,
            12,
            SkillKind::Buff {
                effect: BuffEffect::Guard { percent: 50 },
                turns: 2,
            },
            "Halve incoming damage for two enemy turns.",
        ),
        skill(
            "battle_cry",
            "Battle Cry",
            Warrior,
            10,
            SkillKind::Buff {
                effect: BuffEffect::Empower { percent: 30 },
                turns: 3,
            },
            "Deal 30% more damage for three turns.",
        ),
        skill(
            "second_wind",
            "Second Wind",
            Warrior,
            15,
            SkillKind::Heal { base: 25 },
            "Recover health, scaling with intelligence.",
        ),
        // Mage
        skill(
            "fireball",
            "Fireball",
            Mage,
            15,
            SkillKind::Damage {
                multiplier_percent: 180,
            },
            "A blast of flame dealing 180% damage.",
        ),
        skill(
            "ignite",
            "Ignite",
            Mage,
            12,
            SkillKind::Dot {
                multiplier_percent: 80,
                tick_percent: 25,
                turns: 3,
            },
            "Scorch the enemy, then burn it for three turns.",
        ),
        skill(
            "arcane_missiles",
            "Arcane Missiles",
            Mage,
            18,
            SkillKind::Chain {
                multiplier_percent: 60,
                hits: 3,
            },
            "Three missiles at 60% damage each.",
        ),
        skill(
            "frost_armor",
            "Frost Armor",
            Mage,
            12,
            SkillKind::Buff {
                effect: BuffEffect::Guard { percent: 35 },
                turns: 3,
            },
            "Reduce incoming damage by 35% for three turns.",
        ),
        skill(
            "mend",
            "Mend",
            Mage,
            14,
            SkillKind::Heal { base: 30 },
            "Knit wounds closed, scaling with intelligence.",
        ),
        skill(
            "arcane_surge",
            "Arcane Surge",
            Mage,
            16,
            SkillKind::Buff {
                effect: BuffEffect::Empower { percent: 40 },
                turns: 2,
            },
            "Deal 40% more damage for two turns.",
        ),
        // Rogue
        skill(
            "backstab",
            "Backstab",
            Rogue,
            10,
            SkillKind::Damage {
                multiplier_percent: 160,
            },
            "A precise stab dealing 160% damage.",
        ),
        skill(
            "flurry",
            "Flurry",
            Rogue,
            12,
            SkillKind::Chain {
                multiplier_percent: 50,
                hits: 3,
            },
            "Three quick cuts at 50% damage each.",
        ),
        skill(
            "assassinate",
            "Assassinate",
            Rogue,
            18,
            SkillKind::Finisher {
                multiplier_percent: 100,
                execute_multiplier_percent: 250,
            },
            "Two and a half times damage against enemies below 30% health.",
        ),
        skill(
            "poison_blade",
            "Poison Blade",
            Rogue,
            12,
            SkillKind::Dot {
                multiplier_percent: 60,
                tick_percent: 30,
                turns: 3,
            },
            "A venomous cut that keeps hurting for three turns.",
        ),
        skill(
            "evasion",
            "Evasion",
            Rogue,
            10,
            SkillKind::Buff {
                effect: BuffEffect::Guard { percent: 60 },
                turns: 1,
            },
            "Dodge most of the next enemy attack.",
        ),
        skill(
            "adrenaline",
            "Adrenaline",
            Rogue,
            8,
            SkillKind::Buff {
                effect: BuffEffect::Empower { percent: 25 },
                turns: 3,
            },
            "Deal 25% more damage for three turns.",
        ),
    ]
}
