//! Dungeon definitions

use crate::domain::entities::{CompletionBundle, Dungeon, ItemGrant};

fn grant(template_id: &str, quantity: u32) -> ItemGrant {
    ItemGrant {
        template_id: template_id.into(),
        quantity,
    }
}

pub fn dungeon_table() -> Vec<Dungeon> {
    vec![
        Dungeon::new("goblin_warren", "Goblin Warren", 1)
            .with_encounter("giant_rat", 1)
            .with_encounter("goblin", 2)
            .with_encounter("goblin", 3)
            .with_completion(CompletionBundle {
                currency: 100,
                experience: 150,
                items: vec![grant("health_potion", 2)],
                forging_currency: 2,
            }),
        Dungeon::new("forgotten_crypt", "Forgotten Crypt", 8)
            .with_encounter("skeleton", 8)
            .with_encounter("bandit", 9)
            .with_encounter("skeleton", 10)
            .with_encounter("dark_mage", 11)
            .with_completion(CompletionBundle {
                currency: 300,
                experience: 600,
                items: vec![grant("mana_potion", 2), grant("amber_amulet", 1)],
                forging_currency: 4,
            }),
        Dungeon::new("dragons_lair", "Dragon's Lair", 18)
            .with_encounter("basilisk", 18)
            .with_encounter("wyvern", 20)
            .with_encounter("lich", 21)
            .with_encounter("ancient_dragon", 22)
            .with_completion(CompletionBundle {
                currency: 1000,
                experience: 2500,
                items: vec![grant("elixir", 3), grant("lucky_ring", 1)],
                forging_currency: 10,
            }),
    ]
}
