//! Attribute block shared by characters, equipment bonuses and item buffs

use serde::{Deserialize, Serialize};

/// The five base attributes every combat formula is derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub strength: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub dexterity: u32,
    pub luck: u32,
}

impl Attributes {
    pub const fn new(strength: u32, intelligence: u32, vitality: u32, dexterity: u32, luck: u32) -> Self {
        Self {
            strength,
            intelligence,
            vitality,
            dexterity,
            luck,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Component-wise sum
    pub fn plus(&self, other: &Attributes) -> Attributes {
        Attributes {
            strength: self.strength.saturating_add(other.strength),
            intelligence: self.intelligence.saturating_add(other.intelligence),
            vitality: self.vitality.saturating_add(other.vitality),
            dexterity: self.dexterity.saturating_add(other.dexterity),
            luck: self.luck.saturating_add(other.luck),
        }
    }

    /// Component-wise difference, never dropping below zero
    pub fn minus(&self, other: &Attributes) -> Attributes {
        Attributes {
            strength: self.strength.saturating_sub(other.strength),
            intelligence: self.intelligence.saturating_sub(other.intelligence),
            vitality: self.vitality.saturating_sub(other.vitality),
            dexterity: self.dexterity.saturating_sub(other.dexterity),
            luck: self.luck.saturating_sub(other.luck),
        }
    }

    /// Scale every component by `percent / 100`, flooring each result
    pub fn scaled_percent(&self, percent: u32) -> Attributes {
        let scale = |v: u32| u32::try_from((v as u64 * percent as u64) / 100).unwrap_or(u32::MAX);
        Attributes {
            strength: scale(self.strength),
            intelligence: scale(self.intelligence),
            vitality: scale(self.vitality),
            dexterity: scale(self.dexterity),
            luck: scale(self.luck),
        }
    }
}

/// Character archetype; gates item usage and groups the skill table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

impl CharacterClass {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Mage => "Mage",
            Self::Rogue => "Rogue",
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warrior" => Ok(Self::Warrior),
            "mage" => Ok(Self::Mage),
            "rogue" => Ok(Self::Rogue),
            other => Err(format!("Unknown character class: {}", other)),
        }
    }
}

/// How a character's attacks scale: with strength or with intelligence.
///
/// Resolved once per action from the character's totals, independent of
/// the declared class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageStyle {
    Physical,
    Magical,
}

impl DamageStyle {
    /// Strength wins only when it strictly exceeds intelligence
    pub fn dominant(total: &Attributes) -> Self {
        if total.strength > total.intelligence {
            Self::Physical
        } else {
            Self::Magical
        }
    }
}

/// Slots an item can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Hands,
    Feet,
    Neck,
    Ring1,
    Ring2,
    Ring3,
    Ring4,
}

impl EquipmentSlot {
    pub const WEAPON_SLOTS: [EquipmentSlot; 2] = [Self::MainHand, Self::OffHand];
    pub const ARMOR_SLOTS: [EquipmentSlot; 5] =
        [Self::Head, Self::Chest, Self::Legs, Self::Hands, Self::Feet];
    pub const RING_SLOTS: [EquipmentSlot; 4] = [Self::Ring1, Self::Ring2, Self::Ring3, Self::Ring4];

    pub fn is_ring(&self) -> bool {
        Self::RING_SLOTS.contains(self)
    }
}

impl std::fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MainHand => "main hand",
            Self::OffHand => "off hand",
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Legs => "legs",
            Self::Hands => "hands",
            Self::Feet => "feet",
            Self::Neck => "neck",
            Self::Ring1 => "ring 1",
            Self::Ring2 => "ring 2",
            Self::Ring3 => "ring 3",
            Self::Ring4 => "ring 4",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_style_prefers_intelligence_on_tie() {
        let tied = Attributes::new(10, 10, 0, 0, 0);
        assert_eq!(DamageStyle::dominant(&tied), DamageStyle::Magical);

        let brute = Attributes::new(11, 10, 0, 0, 0);
        assert_eq!(DamageStyle::dominant(&brute), DamageStyle::Physical);
    }

    #[test]
    fn test_scaled_percent_floors() {
        let buff = Attributes::new(3, 5, 7, 0, 1);
        assert_eq!(buff.scaled_percent(120), Attributes::new(3, 6, 8, 0, 1));
        assert_eq!(buff.scaled_percent(100), buff);
    }

    #[test]
    fn test_minus_saturates() {
        let a = Attributes::new(2, 0, 0, 0, 0);
        let b = Attributes::new(5, 1, 0, 0, 0);
        assert_eq!(a.minus(&b), Attributes::default());
    }
}
