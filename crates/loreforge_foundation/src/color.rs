//! Display color lookup.
//!
//! Graphics directives name a color either by its full name or by a single
//! glyph character; both resolve against this fixed palette.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A display color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)] // palette entries
pub enum Color {
    Dark,
    #[default]
    White,
    Slate,
    Orange,
    Red,
    Green,
    Blue,
    Umber,
    LightDark,
    LightSlate,
    Violet,
    Yellow,
    LightRed,
    LightGreen,
    LightBlue,
    LightUmber,
}

impl Color {
    const TABLE: [(Self, &'static str, char); 16] = [
        (Self::Dark, "dark", 'd'),
        (Self::White, "white", 'w'),
        (Self::Slate, "slate", 's'),
        (Self::Orange, "orange", 'o'),
        (Self::Red, "red", 'r'),
        (Self::Green, "green", 'g'),
        (Self::Blue, "blue", 'b'),
        (Self::Umber, "umber", 'u'),
        (Self::LightDark, "light-dark", 'D'),
        (Self::LightSlate, "light-slate", 'W'),
        (Self::Violet, "violet", 'v'),
        (Self::Yellow, "yellow", 'y'),
        (Self::LightRed, "light-red", 'R'),
        (Self::LightGreen, "light-green", 'G'),
        (Self::LightBlue, "light-blue", 'B'),
        (Self::LightUmber, "light-umber", 'U'),
    ];

    /// Looks a color up by its full name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(c, _, _)| *c)
    }

    /// Looks a color up by its single-character code.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, _, c)| *c == ch)
            .map(|(c, _, _)| *c)
    }

    /// Resolves a graphics-directive color token: a full name when longer
    /// than one character, otherwise a character code. Unknown tokens fall
    /// back to [`Color::White`], matching the collaborator this stands for.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch).unwrap_or_default(),
            _ => Self::from_name(token).unwrap_or_default(),
        }
    }
}
