//! Enemy templates, three per tier

use crate::domain::entities::{EnemyStats, EnemyTemplate, PoisonSpec};

const fn stats(hp: u32, strength: u32, defense: u32, mana: u32) -> EnemyStats {
    EnemyStats {
        hp,
        strength,
        defense,
        mana,
    }
}

pub fn enemy_templates() -> Vec<EnemyTemplate> {
    vec![
        // Tier 1
        EnemyTemplate::new("giant_rat", "Giant Rat", 1, 1, stats(30, 4, 1, 0)).with_rewards(10, 5),
        EnemyTemplate::new("goblin", "Goblin", 1, 2, stats(45, 6, 2, 0)).with_rewards(14, 8),
        EnemyTemplate::new("cave_spider", "Cave Spider", 1, 3, stats(50, 7, 2, 0))
            .with_rewards(18, 9)
            .with_poison(PoisonSpec {
                chance_percent: 25,
                damage_per_turn: 3,
                turns: 3,
            }),
        // Tier 2
        EnemyTemplate::new("grey_wolf", "Grey Wolf", 2, 6, stats(90, 12, 4, 0)).with_rewards(30, 15),
        EnemyTemplate::new("bandit", "Bandit", 2, 7, stats(100, 14, 5, 10))
            .with_rewards(34, 22)
            .with_forging_drop_chance(0.20),
        EnemyTemplate::new("skeleton", "Skeleton", 2, 8, stats(110, 15, 7, 0)).with_rewards(38, 18),
        // Tier 3
        EnemyTemplate::new("orc_warrior", "Orc Warrior", 3, 11, stats(180, 22, 10, 0))
            .with_rewards(60, 30),
        EnemyTemplate::new("dark_mage", "Dark Mage", 3, 12, stats(150, 26, 6, 80))
            .with_rewards(65, 35),
        EnemyTemplate::new("venom_serpent", "Venom Serpent", 3, 13, stats(170, 24, 8, 0))
            .with_rewards(70, 32)
            .with_poison(PoisonSpec {
                chance_percent: 35,
                damage_per_turn: 8,
                turns: 3,
            }),
        // Tier 4
        EnemyTemplate::new("troll", "Troll", 4, 16, stats(300, 34, 15, 0)).with_rewards(100, 50),
        EnemyTemplate::new("wraith", "Wraith", 4, 17, stats(240, 38, 10, 120))
            .with_rewards(110, 55)
            .with_forging_drop_chance(0.20),
        EnemyTemplate::new("basilisk", "Basilisk", 4, 18, stats(280, 36, 18, 0))
            .with_rewards(120, 60)
            .with_poison(PoisonSpec {
                chance_percent: 30,
                damage_per_turn: 14,
                turns: 4,
            }),
        // Tier 5
        EnemyTemplate::new("wyvern", "Wyvern", 5, 21, stats(420, 48, 20, 0)).with_rewards(160, 80),
        EnemyTemplate::new("lich", "Lich", 5, 22, stats(380, 54, 16, 200))
            .with_rewards(175, 90)
            .with_forging_drop_chance(0.25),
        EnemyTemplate::new("ancient_dragon", "Ancient Dragon", 5, 23, stats(600, 60, 28, 100))
            .with_rewards(220, 120)
            .with_forging_drop_chance(0.30),
    ]
}
