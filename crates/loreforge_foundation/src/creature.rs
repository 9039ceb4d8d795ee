//! The fixed creature-category flag enumeration.
//!
//! Bane records select their targets either by one of these flags or by a
//! named creature category from the externally supplied directory; scourge
//! records use the immunity flags to mark what resists them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A creature-category flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)] // variant names mirror the data-file tokens
pub enum CreatureFlag {
    Unique,
    Questor,
    Animal,
    Evil,
    Undead,
    Demon,
    Orc,
    Troll,
    Giant,
    Dragon,
    Metal,
    Stone,
    Nonliving,
    ImAcid,
    ImElec,
    ImFire,
    ImCold,
    ImPoison,
    HurtFire,
    HurtCold,
    HurtLight,
    HurtRock,
}

impl CreatureFlag {
    /// Every flag, in enumeration order.
    pub const ALL: [Self; 22] = [
        Self::Unique,
        Self::Questor,
        Self::Animal,
        Self::Evil,
        Self::Undead,
        Self::Demon,
        Self::Orc,
        Self::Troll,
        Self::Giant,
        Self::Dragon,
        Self::Metal,
        Self::Stone,
        Self::Nonliving,
        Self::ImAcid,
        Self::ImElec,
        Self::ImFire,
        Self::ImCold,
        Self::ImPoison,
        Self::HurtFire,
        Self::HurtCold,
        Self::HurtLight,
        Self::HurtRock,
    ];

    /// The flag names as they appear in definition files.
    pub const NAMES: [&'static str; Self::ALL.len()] = [
        "UNIQUE",
        "QUESTOR",
        "ANIMAL",
        "EVIL",
        "UNDEAD",
        "DEMON",
        "ORC",
        "TROLL",
        "GIANT",
        "DRAGON",
        "METAL",
        "STONE",
        "NONLIVING",
        "IM_ACID",
        "IM_ELEC",
        "IM_FIRE",
        "IM_COLD",
        "IM_POIS",
        "HURT_FIRE",
        "HURT_COLD",
        "HURT_LIGHT",
        "HURT_ROCK",
    ];

    /// Returns the data-file name of this flag.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Looks a flag up by its data-file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }
}
