//! Plain numeric ranges for `rand`-typed directive fields.
//!
//! A [`Random`] is a dice value with no variables: `"10"`, `"1d4"`,
//! `"2+1d6M3"`. Directive fields like `time` and `to-h` parse into these.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use loreforge_foundation::{Error, ErrorKind};

use crate::dice::Dice;

/// A numeric range: `base + dice × d(sides) + bonus in 0..=m_bonus`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Random {
    /// Fixed part.
    pub base: i32,
    /// Number of dice.
    pub dice: i32,
    /// Sides per die.
    pub sides: i32,
    /// Upper bound of the uniform bonus.
    pub m_bonus: i32,
}

impl Random {
    /// The zero range.
    pub const ZERO: Self = Self {
        base: 0,
        dice: 0,
        sides: 0,
        m_bonus: 0,
    };

    /// A fixed value with no random part.
    #[must_use]
    pub const fn fixed(base: i32) -> Self {
        Self {
            base,
            dice: 0,
            sides: 0,
            m_bonus: 0,
        }
    }

    /// Parses a dice-or-number string with no variables.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidDice`] for malformed strings and for
    /// strings that carry `$NAME` variables.
    pub fn parse(source: &str) -> Result<Self, Error> {
        Dice::parse(source)?
            .to_random()
            .ok_or_else(|| Error::new(ErrorKind::InvalidDice(source.to_string())))
    }

    /// Rolls the range.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let mut total = self.base;
        if self.dice > 0 && self.sides > 0 {
            for _ in 0..self.dice {
                total += rng.gen_range(1..=self.sides);
            }
        }
        if self.m_bonus > 0 {
            total += rng.gen_range(0..=self.m_bonus);
        }
        total
    }
}

impl FromStr for Random {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
