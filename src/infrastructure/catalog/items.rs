//! Item templates: consumables, weapons, armor and accessories

use crate::domain::entities::{ClassTag, ItemEffects, ItemTemplate, ItemType, Rarity};
use crate::domain::value_objects::{Attributes, EquipmentSlot};

fn restore(heal: u32, heal_percent: u32, mana: u32, mana_percent: u32) -> ItemEffects {
    ItemEffects {
        heal,
        heal_percent,
        mana,
        mana_percent,
        ..Default::default()
    }
}

fn buffs(attributes: Attributes) -> ItemEffects {
    ItemEffects {
        attributes,
        ..Default::default()
    }
}

pub fn item_templates() -> Vec<ItemTemplate> {
    vec![
        // Consumables
        ItemTemplate::new("minor_health_potion", "Minor Health Potion", ItemType::Consumable)
            .with_effects(restore(30, 0, 0, 0))
            .with_rarity(Rarity::Common, 10),
        ItemTemplate::new("health_potion", "Health Potion", ItemType::Consumable)
            .with_effects(restore(0, 40, 0, 0))
            .with_rarity(Rarity::Uncommon, 30),
        ItemTemplate::new("minor_mana_potion", "Minor Mana Potion", ItemType::Consumable)
            .with_effects(restore(0, 0, 25, 0))
            .with_rarity(Rarity::Common, 10),
        ItemTemplate::new("mana_potion", "Mana Potion", ItemType::Consumable)
            .with_effects(restore(0, 0, 0, 40))
            .with_rarity(Rarity::Uncommon, 30),
        ItemTemplate::new("antidote", "Antidote", ItemType::Consumable)
            .with_effects(ItemEffects {
                cure_poison: true,
                ..Default::default()
            })
            .with_rarity(Rarity::Common, 15),
        ItemTemplate::new("elixir", "Elixir", ItemType::Consumable)
            .with_effects(ItemEffects {
                cure_poison: true,
                ..restore(0, 50, 0, 50)
            })
            .with_rarity(Rarity::Rare, 120),
        // Weapons
        ItemTemplate::new("iron_sword", "Iron Sword", ItemType::Weapon)
            .with_slot(EquipmentSlot::MainHand)
            .with_classes([ClassTag::Warrior])
            .with_effects(buffs(Attributes::new(5, 0, 0, 0, 0)))
            .with_rarity(Rarity::Common, 50),
        ItemTemplate::new("oak_staff", "Oak Staff", ItemType::Weapon)
            .with_slot(EquipmentSlot::MainHand)
            .with_classes([ClassTag::Mage])
            .with_effects(buffs(Attributes::new(0, 5, 0, 0, 0)))
            .with_rarity(Rarity::Common, 50),
        ItemTemplate::new("steel_dagger", "Steel Dagger", ItemType::Weapon)
            .with_classes([ClassTag::Rogue])
            .with_effects(buffs(Attributes::new(2, 0, 0, 4, 0)))
            .with_rarity(Rarity::Common, 50),
        ItemTemplate::new("wooden_shield", "Wooden Shield", ItemType::Weapon)
            .with_slot(EquipmentSlot::OffHand)
            .with_classes([ClassTag::Warrior])
            .with_effects(buffs(Attributes::new(0, 0, 4, 0, 0)))
            .with_rarity(Rarity::Common, 40),
        // Armor
        ItemTemplate::new("leather_cap", "Leather Cap", ItemType::Armor)
            .with_slot(EquipmentSlot::Head)
            .with_effects(buffs(Attributes::new(0, 0, 2, 0, 0)))
            .with_rarity(Rarity::Common, 25),
        ItemTemplate::new("chainmail", "Chainmail", ItemType::Armor)
            .with_slot(EquipmentSlot::Chest)
            .with_classes([ClassTag::Warrior])
            .with_effects(buffs(Attributes::new(0, 0, 6, 0, 0)))
            .with_rarity(Rarity::Uncommon, 90),
        ItemTemplate::new("silk_robe", "Silk Robe", ItemType::Armor)
            .with_slot(EquipmentSlot::Chest)
            .with_classes([ClassTag::Mage])
            .with_effects(buffs(Attributes::new(0, 4, 2, 0, 0)))
            .with_rarity(Rarity::Uncommon, 90),
        ItemTemplate::new("soft_boots", "Soft Boots", ItemType::Armor)
            .with_slot(EquipmentSlot::Feet)
            .with_effects(buffs(Attributes::new(0, 0, 0, 3, 1)))
            .with_rarity(Rarity::Common, 30),
        // Accessories
        ItemTemplate::new("lucky_ring", "Lucky Ring", ItemType::Accessory)
            .with_effects(buffs(Attributes::new(0, 0, 0, 0, 5)))
            .with_rarity(Rarity::Rare, 150),
        ItemTemplate::new("amber_amulet", "Amber Amulet", ItemType::Accessory)
            .with_slot(EquipmentSlot::Neck)
            .with_effects(buffs(Attributes::new(0, 2, 2, 0, 0)))
            .with_rarity(Rarity::Uncommon, 110),
    ]
}
