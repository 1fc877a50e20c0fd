//! Equipment resolver - Equip, unequip and enhance transitions
//!
//! The character's `equipment_bonus` is the sum of `enhanced_bonus(template,
//! level)` over every equipped item. Each transition validates everything
//! first, then applies the whole bonus change in one step, so a failed call
//! leaves the character untouched.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    enhanced_bonus, enhancement_cost, Character, ItemTemplate, ItemType, MAX_ENHANCEMENT_LEVEL,
};
use crate::domain::errors::EngineError;
use crate::domain::services::lookup::ItemLookup;
use crate::domain::value_objects::{Attributes, EquipmentSlot, ItemInstanceId, ItemTemplateId};

/// What to take off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum UnequipTarget {
    Slot(EquipmentSlot),
    Item(ItemInstanceId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipOutcome {
    pub item_id: ItemInstanceId,
    pub slot: EquipmentSlot,
    /// Item that previously occupied the slot, now back in the bag
    pub replaced: Option<ItemInstanceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceOutcome {
    pub item_id: ItemInstanceId,
    pub new_level: u8,
    pub cost: u64,
    /// Change applied to the equipment bonus (zero when not equipped)
    pub bonus_delta: Attributes,
}

fn template_for<'a, L: ItemLookup + ?Sized>(
    lookup: &'a L,
    id: &ItemTemplateId,
) -> Result<&'a ItemTemplate, EngineError> {
    lookup
        .item_template(id)
        .ok_or_else(|| EngineError::ItemTemplateNotFound(id.clone()))
}

/// Slots an item of this template may occupy
pub fn valid_slots(template: &ItemTemplate) -> Vec<EquipmentSlot> {
    match template.item_type {
        ItemType::Consumable => Vec::new(),
        ItemType::Weapon => EquipmentSlot::WEAPON_SLOTS.to_vec(),
        ItemType::Armor => match template.slot {
            Some(slot) if EquipmentSlot::ARMOR_SLOTS.contains(&slot) => vec![slot],
            _ => vec![EquipmentSlot::Chest],
        },
        ItemType::Accessory => match template.slot {
            Some(slot) if !slot.is_ring() => vec![slot],
            _ => EquipmentSlot::RING_SLOTS.to_vec(),
        },
    }
}

/// Pick the slot for an equip request.
///
/// An explicit slot wins when it is valid for the item; otherwise the slot is
/// inferred from the template (weapons go to the declared hand or main hand,
/// armor to its declared slot, rings to the first free ring slot).
pub fn resolve_slot(
    character: &Character,
    template: &ItemTemplate,
    requested: Option<EquipmentSlot>,
) -> Result<EquipmentSlot, EngineError> {
    let valid = valid_slots(template);

    if let Some(slot) = requested {
        if valid.contains(&slot) {
            return Ok(slot);
        }
        return Err(EngineError::SlotMismatch {
            item: template.name.clone(),
            slot: slot.to_string(),
        });
    }

    let inferred = match template.item_type {
        ItemType::Weapon => template
            .slot
            .filter(|slot| valid.contains(slot))
            .unwrap_or(EquipmentSlot::MainHand),
        ItemType::Accessory if valid.len() > 1 => valid
            .iter()
            .copied()
            .find(|slot| character.equipped_in(*slot).is_none())
            .unwrap_or(EquipmentSlot::Ring1),
        _ => valid[0],
    };
    Ok(inferred)
}

/// Equip an owned item, swapping out whatever occupies the target slot
pub fn equip<L: ItemLookup + ?Sized>(
    character: &mut Character,
    lookup: &L,
    item_id: ItemInstanceId,
    requested_slot: Option<EquipmentSlot>,
) -> Result<EquipOutcome, EngineError> {
    let item = character
        .item(item_id)
        .ok_or(EngineError::ItemNotOwned(item_id))?;
    let template = template_for(lookup, &item.template_id)?;

    if !template.is_equippable() {
        return Err(EngineError::ItemNotUsable(format!(
            "{} cannot be equipped",
            template.name
        )));
    }
    if !template.allows_class(character.class) {
        return Err(EngineError::ClassMismatch {
            class: character.class.to_string(),
            item: template.name.clone(),
        });
    }

    let slot = resolve_slot(character, template, requested_slot)?;
    if item.equipped && item.slot == Some(slot) {
        return Ok(EquipOutcome {
            item_id,
            slot,
            replaced: None,
        });
    }

    // Contribution currently counted for this item if it is worn elsewhere
    let moving_out = if item.equipped {
        enhanced_bonus(template, item.enhancement_level)
    } else {
        Attributes::default()
    };
    let incoming = enhanced_bonus(template, item.enhancement_level);

    let occupant = match character.equipped_in(slot) {
        Some(current) => {
            let current_template = template_for(lookup, &current.template_id)?;
            Some((
                current.id,
                enhanced_bonus(current_template, current.enhancement_level),
            ))
        }
        None => None,
    };

    let mut bonus = character.equipment_bonus.minus(&moving_out);
    if let Some((occupant_id, outgoing)) = occupant {
        bonus = bonus.minus(&outgoing);
        if let Some(previous) = character.item_mut(occupant_id) {
            previous.equipped = false;
            previous.slot = None;
        }
    }
    bonus = bonus.plus(&incoming);

    if let Some(item) = character.item_mut(item_id) {
        item.equipped = true;
        item.slot = Some(slot);
    }
    character.equipment_bonus = bonus;
    character.recompute_vitals();

    Ok(EquipOutcome {
        item_id,
        slot,
        replaced: occupant.map(|(id, _)| id),
    })
}

/// Take an item off, reversing its bonus contribution
pub fn unequip<L: ItemLookup + ?Sized>(
    character: &mut Character,
    lookup: &L,
    target: UnequipTarget,
) -> Result<ItemInstanceId, EngineError> {
    let item = match target {
        UnequipTarget::Slot(slot) => character
            .equipped_in(slot)
            .ok_or_else(|| EngineError::SlotEmpty(slot.to_string()))?,
        UnequipTarget::Item(id) => {
            let item = character.item(id).ok_or(EngineError::ItemNotOwned(id))?;
            if !item.equipped {
                return Err(EngineError::ItemNotUsable("item is not equipped".to_string()));
            }
            item
        }
    };
    let item_id = item.id;
    let template = template_for(lookup, &item.template_id)?;
    let outgoing = enhanced_bonus(template, item.enhancement_level);

    character.equipment_bonus = character.equipment_bonus.minus(&outgoing);
    if let Some(item) = character.item_mut(item_id) {
        item.equipped = false;
        item.slot = None;
    }
    character.recompute_vitals();

    Ok(item_id)
}

/// Raise an item's enhancement level by one, paying in forging currency.
///
/// The level increment and the bonus adjustment of an equipped item happen
/// together or not at all.
pub fn enhance<L: ItemLookup + ?Sized>(
    character: &mut Character,
    lookup: &L,
    item_id: ItemInstanceId,
) -> Result<EnhanceOutcome, EngineError> {
    let item = character
        .item(item_id)
        .ok_or(EngineError::ItemNotOwned(item_id))?;
    let template = template_for(lookup, &item.template_id)?;

    if template.item_type == ItemType::Consumable {
        return Err(EngineError::ItemNotUsable(format!(
            "{} cannot be enhanced",
            template.name
        )));
    }
    let current_level = item.enhancement_level;
    if current_level >= MAX_ENHANCEMENT_LEVEL {
        return Err(EngineError::EnhancementCapped(MAX_ENHANCEMENT_LEVEL));
    }
    let new_level = current_level + 1;
    let cost = enhancement_cost(new_level).ok_or(EngineError::EnhancementCapped(MAX_ENHANCEMENT_LEVEL))?;
    let available = character.progression.forging_currency;
    if available < cost {
        return Err(EngineError::InsufficientForgingCurrency {
            required: cost,
            available,
        });
    }

    let old_bonus = enhanced_bonus(template, current_level);
    let new_bonus = enhanced_bonus(template, new_level);
    let bonus_delta = if item.equipped {
        new_bonus.minus(&old_bonus)
    } else {
        Attributes::default()
    };
    let equipped = item.equipped;

    character.progression.forging_currency -= cost;
    if equipped {
        character.equipment_bonus = character
            .equipment_bonus
            .minus(&old_bonus)
            .plus(&new_bonus);
    }
    if let Some(item) = character.item_mut(item_id) {
        item.enhancement_level = new_level;
    }
    if equipped {
        character.recompute_vitals();
    }

    Ok(EnhanceOutcome {
        item_id,
        new_level,
        cost,
        bonus_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::domain::entities::{ClassTag, ItemEffects};
    use crate::domain::value_objects::CharacterClass;

    fn catalog() -> HashMap<ItemTemplateId, ItemTemplate> {
        let templates = vec![
            ItemTemplate::new("iron_sword", "Iron Sword", ItemType::Weapon).with_effects(
                ItemEffects {
                    attributes: Attributes::new(5, 0, 0, 0, 0),
                    ..Default::default()
                },
            ),
            ItemTemplate::new("steel_sword", "Steel Sword", ItemType::Weapon).with_effects(
                ItemEffects {
                    attributes: Attributes::new(10, 0, 0, 2, 0),
                    ..Default::default()
                },
            ),
            ItemTemplate::new("bone_dagger", "Bone Dagger", ItemType::Weapon).with_effects(
                ItemEffects {
                    attributes: Attributes::new(3, 0, 0, 0, 0),
                    ..Default::default()
                },
            ),
            ItemTemplate::new("chainmail", "Chainmail", ItemType::Armor)
                .with_classes([ClassTag::Warrior])
                .with_effects(ItemEffects {
                    attributes: Attributes::new(0, 0, 5, 0, 0),
                    ..Default::default()
                }),
            ItemTemplate::new("leather_cap", "Leather Cap", ItemType::Armor)
                .with_slot(EquipmentSlot::Head),
            ItemTemplate::new("copper_ring", "Copper Ring", ItemType::Accessory).with_effects(
                ItemEffects {
                    attributes: Attributes::new(0, 0, 0, 0, 2),
                    ..Default::default()
                },
            ),
            ItemTemplate::new("minor_health_potion", "Minor Health Potion", ItemType::Consumable),
        ];
        templates.into_iter().map(|t| (t.id.clone(), t)).collect()
    }

    fn warrior() -> Character {
        Character::new("Brom", CharacterClass::Warrior, Attributes::new(10, 2, 4, 3, 1))
    }

    fn give(character: &mut Character, catalog: &HashMap<ItemTemplateId, ItemTemplate>, id: &str) -> ItemInstanceId {
        let template = &catalog[&ItemTemplateId::new(id)];
        character.add_item(template, 1);
        character
            .inventory
            .iter()
            .rev()
            .find(|i| i.template_id == template.id)
            .map(|i| i.id)
            .unwrap()
    }

    #[test]
    fn test_equip_then_unequip_restores_everything() {
        let catalog = catalog();
        let mut character = warrior();
        let mail = give(&mut character, &catalog, "chainmail");
        let before_bonus = character.equipment_bonus;
        let before_max = (character.combat.max_hp, character.combat.max_mana);

        let outcome = equip(&mut character, &catalog, mail, None).unwrap();
        assert_eq!(outcome.slot, EquipmentSlot::Chest);
        assert_eq!(character.equipment_bonus.vitality, 5);
        assert_eq!(character.combat.max_hp, 190);

        unequip(&mut character, &catalog, UnequipTarget::Item(mail)).unwrap();
        assert_eq!(character.equipment_bonus, before_bonus);
        assert_eq!((character.combat.max_hp, character.combat.max_mana), before_max);
        assert!(!character.item(mail).unwrap().equipped);
    }

    #[test]
    fn test_swap_in_occupied_slot_is_atomic() {
        let catalog = catalog();
        let mut character = warrior();
        let iron = give(&mut character, &catalog, "iron_sword");
        let steel = give(&mut character, &catalog, "steel_sword");

        equip(&mut character, &catalog, iron, Some(EquipmentSlot::MainHand)).unwrap();
        let outcome = equip(&mut character, &catalog, steel, Some(EquipmentSlot::MainHand)).unwrap();

        assert_eq!(outcome.replaced, Some(iron));
        assert_eq!(character.equipment_bonus, Attributes::new(10, 0, 0, 2, 0));
        assert!(!character.item(iron).unwrap().equipped);
        assert_eq!(character.equipped_in(EquipmentSlot::MainHand).unwrap().id, steel);
    }

    #[test]
    fn test_second_weapon_can_go_off_hand() {
        let catalog = catalog();
        let mut character = warrior();
        let iron = give(&mut character, &catalog, "iron_sword");
        let steel = give(&mut character, &catalog, "steel_sword");

        equip(&mut character, &catalog, iron, None).unwrap();
        equip(&mut character, &catalog, steel, Some(EquipmentSlot::OffHand)).unwrap();
        assert_eq!(character.equipment_bonus.strength, 15);
    }

    #[test]
    fn test_rings_fill_free_slots() {
        let catalog = catalog();
        let mut character = warrior();
        let first = give(&mut character, &catalog, "copper_ring");
        let second = give(&mut character, &catalog, "copper_ring");

        assert_eq!(equip(&mut character, &catalog, first, None).unwrap().slot, EquipmentSlot::Ring1);
        assert_eq!(equip(&mut character, &catalog, second, None).unwrap().slot, EquipmentSlot::Ring2);
        assert_eq!(character.equipment_bonus.luck, 4);
    }

    #[test]
    fn test_equip_validation_leaves_character_untouched() {
        let catalog = catalog();
        let mut mage = Character::new("Ilsa", CharacterClass::Mage, Attributes::new(1, 12, 3, 2, 2));
        let mail = give(&mut mage, &catalog, "chainmail");
        let cap = give(&mut mage, &catalog, "leather_cap");
        let potion = give(&mut mage, &catalog, "minor_health_potion");

        assert!(matches!(
            equip(&mut mage, &catalog, mail, None),
            Err(EngineError::ClassMismatch { .. })
        ));
        assert!(matches!(
            equip(&mut mage, &catalog, cap, Some(EquipmentSlot::Chest)),
            Err(EngineError::SlotMismatch { .. })
        ));
        assert!(matches!(
            equip(&mut mage, &catalog, potion, None),
            Err(EngineError::ItemNotUsable(_))
        ));
        assert!(matches!(
            equip(&mut mage, &catalog, ItemInstanceId::new(), None),
            Err(EngineError::ItemNotOwned(_))
        ));
        assert!(mage.equipment_bonus.is_zero());
        assert!(mage.inventory.iter().all(|i| !i.equipped));
    }

    #[test]
    fn test_unequip_empty_slot() {
        let catalog = catalog();
        let mut character = warrior();
        assert!(matches!(
            unequip(&mut character, &catalog, UnequipTarget::Slot(EquipmentSlot::Head)),
            Err(EngineError::SlotEmpty(_))
        ));
    }

    #[test]
    fn test_enhance_equipped_item_adjusts_bonus_by_delta() {
        let catalog = catalog();
        let mut character = warrior();
        character.progression.forging_currency = 100;
        let iron = give(&mut character, &catalog, "iron_sword");
        equip(&mut character, &catalog, iron, None).unwrap();
        assert_eq!(character.equipment_bonus.strength, 5);

        // 1.0 -> 1.2 on a base of 5
        let outcome = enhance(&mut character, &catalog, iron).unwrap();
        assert_eq!(outcome.new_level, 1);
        assert_eq!(outcome.cost, 3);
        assert_eq!(outcome.bonus_delta.strength, 1);
        assert_eq!(character.equipment_bonus.strength, 6);
        assert_eq!(character.progression.forging_currency, 97);

        // Unequipping removes exactly the enhanced contribution
        unequip(&mut character, &catalog, UnequipTarget::Item(iron)).unwrap();
        assert!(character.equipment_bonus.is_zero());
    }

    #[test]
    fn test_enhance_delta_is_difference_of_floored_bonuses() {
        let catalog = catalog();
        let mut character = warrior();
        character.progression.forging_currency = 100;
        let dagger = give(&mut character, &catalog, "bone_dagger");
        equip(&mut character, &catalog, dagger, None).unwrap();
        assert_eq!(character.equipment_bonus.strength, 3);

        // floor(3 × 1.2) - floor(3 × 1.0) = 3 - 3
        let first = enhance(&mut character, &catalog, dagger).unwrap();
        assert_eq!(first.bonus_delta.strength, 0);
        assert_eq!(character.equipment_bonus.strength, 3);

        // floor(3 × 1.4) - floor(3 × 1.2) = 4 - 3, although floor(0.2 × 3) = 0
        let second = enhance(&mut character, &catalog, dagger).unwrap();
        assert_eq!(second.new_level, 2);
        assert_eq!(second.bonus_delta.strength, 1);
        assert_eq!(character.equipment_bonus.strength, 4);
        assert_eq!(
            character.equipment_bonus,
            enhanced_bonus(&catalog[&ItemTemplateId::new("bone_dagger")], 2)
        );

        unequip(&mut character, &catalog, UnequipTarget::Item(dagger)).unwrap();
        assert!(character.equipment_bonus.is_zero());
    }

    #[test]
    fn test_enhance_unequipped_item_changes_only_level() {
        let catalog = catalog();
        let mut character = warrior();
        character.progression.forging_currency = 3;
        let iron = give(&mut character, &catalog, "iron_sword");

        let outcome = enhance(&mut character, &catalog, iron).unwrap();
        assert!(outcome.bonus_delta.is_zero());
        assert!(character.equipment_bonus.is_zero());
        assert_eq!(character.item(iron).unwrap().enhancement_level, 1);

        // Equipping afterwards applies the enhanced value
        equip(&mut character, &catalog, iron, None).unwrap();
        assert_eq!(character.equipment_bonus.strength, 6);
    }

    #[test]
    fn test_enhance_failures() {
        let catalog = catalog();
        let mut character = warrior();
        let iron = give(&mut character, &catalog, "iron_sword");

        assert!(matches!(
            enhance(&mut character, &catalog, iron),
            Err(EngineError::InsufficientForgingCurrency { required: 3, available: 0 })
        ));

        character.progression.forging_currency = 1000;
        character.item_mut(iron).unwrap().enhancement_level = MAX_ENHANCEMENT_LEVEL;
        assert!(matches!(
            enhance(&mut character, &catalog, iron),
            Err(EngineError::EnhancementCapped(10))
        ));
        assert_eq!(character.progression.forging_currency, 1000);
    }
}
