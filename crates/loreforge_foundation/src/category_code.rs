//! The fixed material/base category enumeration.
//!
//! Category codes are the stable identity space for base categories; every
//! cross-record reference uses the code rather than a table address, so the
//! template table can grow mid-parse without invalidating anything.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A material/base category code.
///
/// The reserved [`CategoryCode::None`] slot classifies synthetic objects
/// such as the affliction carrier template.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CategoryCode {
    /// Reserved non-category for synthetic objects.
    #[default]
    None,
    /// Containers found in the dungeon.
    Chest,
    /// Sling ammunition.
    Shot,
    /// Bow ammunition.
    Arrow,
    /// Crossbow ammunition.
    Bolt,
    /// Launchers of all kinds.
    Bow,
    /// Digging implements.
    Digger,
    /// Blunt weapons.
    Hafted,
    /// Pole-mounted weapons.
    Polearm,
    /// Edged weapons.
    Sword,
    /// Footwear.
    Boots,
    /// Hand armor.
    Gloves,
    /// Basic head armor.
    Helm,
    /// Ornate head armor.
    Crown,
    /// Off-hand armor.
    Shield,
    /// Back-worn armor.
    Cloak,
    /// Light body armor.
    SoftArmor,
    /// Heavy body armor.
    HardArmor,
    /// Scaled body armor.
    DragonArmor,
    /// Light sources.
    Light,
    /// Neck jewelry.
    Amulet,
    /// Finger jewelry.
    Ring,
    /// Magical staves.
    Staff,
    /// Magical wands.
    Wand,
    /// Magical rods.
    Rod,
    /// Readable magic.
    Scroll,
    /// Drinkable magic.
    Potion,
    /// Oil flasks.
    Flask,
    /// Ordinary food.
    Food,
    /// Gathered food.
    Mushroom,
    /// Currency.
    Gold,
}

impl CategoryCode {
    /// Every code, in table order.
    pub const ALL: [Self; 31] = [
        Self::None,
        Self::Chest,
        Self::Shot,
        Self::Arrow,
        Self::Bolt,
        Self::Bow,
        Self::Digger,
        Self::Hafted,
        Self::Polearm,
        Self::Sword,
        Self::Boots,
        Self::Gloves,
        Self::Helm,
        Self::Crown,
        Self::Shield,
        Self::Cloak,
        Self::SoftArmor,
        Self::HardArmor,
        Self::DragonArmor,
        Self::Light,
        Self::Amulet,
        Self::Ring,
        Self::Staff,
        Self::Wand,
        Self::Rod,
        Self::Scroll,
        Self::Potion,
        Self::Flask,
        Self::Food,
        Self::Mushroom,
        Self::Gold,
    ];

    /// Number of category codes; the size of the fixed category table.
    pub const COUNT: usize = Self::ALL.len();

    /// The code names as they appear in definition files.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "none",
        "chest",
        "shot",
        "arrow",
        "bolt",
        "bow",
        "digger",
        "hafted",
        "polearm",
        "sword",
        "boots",
        "gloves",
        "helm",
        "crown",
        "shield",
        "cloak",
        "soft-armor",
        "hard-armor",
        "dragon-armor",
        "light",
        "amulet",
        "ring",
        "staff",
        "wand",
        "rod",
        "scroll",
        "potion",
        "flask",
        "food",
        "mushroom",
        "gold",
    ];

    /// Returns the table index of this code.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the code at the given table index, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the file name of this code.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Looks a code up by its file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(Self::from_index)
    }
}
