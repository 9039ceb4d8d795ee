//! Flag sets, element tables, and the token resolvers that fill them.
//!
//! `flags` and `values` directives carry a stream of tokens separated by
//! whitespace or `|`. Each entity kind resolves a token through a chain of
//! grabbers; the first grabber that recognises the token wins, and a token
//! nothing in the chain accepts fails the whole directive.

use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::Random;

/// A flag enumeration usable in a [`FlagSet`].
pub trait Flag: Copy + Clone + std::fmt::Debug + PartialEq + Eq {
    /// Data-file token names, in bit order.
    const NAMES: &'static [&'static str];

    /// The flag's bit index.
    fn index(self) -> usize;

    /// The flag at a bit index.
    fn from_index(index: usize) -> Option<Self>;

    /// Resolves a data-file token name.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(Self::from_index)
    }

    /// The flag's data-file token name.
    #[must_use]
    fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

/// A bit set over one flag enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound = "")
)]
pub struct FlagSet<T: Flag> {
    bits: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    _flag: PhantomData<T>,
}

impl<T: Flag> Default for FlagSet<T> {
    fn default() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }
}

impl<T: Flag> FlagSet<T> {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no flag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Sets a flag.
    pub fn insert(&mut self, flag: T) {
        self.bits |= 1 << flag.index();
    }

    /// Tests a flag.
    #[must_use]
    pub fn contains(&self, flag: T) -> bool {
        self.bits & (1 << flag.index()) != 0
    }

    /// Merges another set into this one.
    pub fn union_with(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Resolves one token against this set's enumeration; returns false
    /// when the token is not one of its names.
    pub fn grab(&mut self, token: &str) -> bool {
        match T::from_name(token) {
            Some(flag) => {
                self.insert(flag);
                true
            }
            None => false,
        }
    }

    /// Iterates the flags set, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..T::NAMES.len())
            .filter(|i| self.bits & (1 << i) != 0)
            .filter_map(T::from_index)
    }
}

/// Capability flags: on/off properties an item can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Capability {
    /// Sustains strength.
    SustainStrength,
    /// Sustains intelligence.
    SustainIntelligence,
    /// Sustains wisdom.
    SustainWisdom,
    /// Sustains dexterity.
    SustainDexterity,
    /// Sustains constitution.
    SustainConstitution,
    /// Protects from fear.
    ProtectFear,
    /// Protects from blindness.
    ProtectBlind,
    /// Protects from confusion.
    ProtectConfusion,
    /// Protects from stunning.
    ProtectStun,
    /// Slows food consumption.
    SlowDigest,
    /// Slows falling.
    Feather,
    /// Speeds hit point recovery.
    Regenerate,
    /// Grants telepathy.
    Telepathy,
    /// Grants see-invisible.
    SeeInvisible,
    /// Prevents paralysis.
    FreeAction,
    /// Prevents experience drain.
    HoldLife,
    /// Impairs hit point recovery.
    ImpairHitpoints,
    /// Impairs mana recovery.
    ImpairMana,
    /// Makes the bearer afraid of combat.
    Afraid,
    /// Blocks teleportation.
    NoTeleport,
    /// Aggravates nearby creatures.
    Aggravate,
    /// Drains experience over time.
    DrainExperience,
    /// Cannot be taken off once worn.
    Sticky,
    /// May be destroyed by rough handling.
    Fragile,
    /// Extra light radius.
    Light2,
    /// Even more light radius.
    Light3,
    /// Grants burrowing strength.
    Tunnel1,
    /// Grants greater burrowing strength.
    Tunnel2,
}

impl Flag for Capability {
    const NAMES: &'static [&'static str] = &[
        "SUST_STR",
        "SUST_INT",
        "SUST_WIS",
        "SUST_DEX",
        "SUST_CON",
        "PROT_FEAR",
        "PROT_BLIND",
        "PROT_CONF",
        "PROT_STUN",
        "SLOW_DIGEST",
        "FEATHER",
        "REGEN",
        "TELEPATHY",
        "SEE_INVIS",
        "FREE_ACT",
        "HOLD_LIFE",
        "IMPAIR_HP",
        "IMPAIR_MANA",
        "AFRAID",
        "NO_TELEPORT",
        "AGGRAVATE",
        "DRAIN_EXP",
        "STICKY",
        "FRAGILE",
        "LIGHT_2",
        "LIGHT_3",
        "DIG_1",
        "DIG_2",
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        const ALL: [Capability; 28] = [
            Capability::SustainStrength,
            Capability::SustainIntelligence,
            Capability::SustainWisdom,
            Capability::SustainDexterity,
            Capability::SustainConstitution,
            Capability::ProtectFear,
            Capability::ProtectBlind,
            Capability::ProtectConfusion,
            Capability::ProtectStun,
            Capability::SlowDigest,
            Capability::Feather,
            Capability::Regenerate,
            Capability::Telepathy,
            Capability::SeeInvisible,
            Capability::FreeAction,
            Capability::HoldLife,
            Capability::ImpairHitpoints,
            Capability::ImpairMana,
            Capability::Afraid,
            Capability::NoTeleport,
            Capability::Aggravate,
            Capability::DrainExperience,
            Capability::Sticky,
            Capability::Fragile,
            Capability::Light2,
            Capability::Light3,
            Capability::Tunnel1,
            Capability::Tunnel2,
        ];
        ALL.get(index).copied()
    }
}

/// Kind flags: properties of a whole template rather than one item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KindFlag {
    /// Fully known on sight.
    EasyKnow,
    /// Counts as an inherently good drop.
    Good,
    /// Every generated instance becomes a relic.
    InstantRelic,
    /// Random high resist on magical instances.
    RandomHighResist,
    /// Random power on magical instances.
    RandomPower,
    /// Random sustain on magical instances.
    RandomSustain,
    /// Damage dice are shown in the name.
    ShowDice,
    /// Damage multiplier is shown in the name.
    ShowMultiplier,
    /// Requires both hands to wield.
    TwoHanded,
}

impl Flag for KindFlag {
    const NAMES: &'static [&'static str] = &[
        "EASY_KNOW",
        "GOOD",
        "INSTA_RELIC",
        "RAND_HI_RES",
        "RAND_POWER",
        "RAND_SUSTAIN",
        "SHOW_DICE",
        "SHOW_MULT",
        "TWO_HANDED",
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        const ALL: [KindFlag; 9] = [
            KindFlag::EasyKnow,
            KindFlag::Good,
            KindFlag::InstantRelic,
            KindFlag::RandomHighResist,
            KindFlag::RandomPower,
            KindFlag::RandomSustain,
            KindFlag::ShowDice,
            KindFlag::ShowMultiplier,
            KindFlag::TwoHanded,
        ];
        ALL.get(index).copied()
    }
}

/// The damage elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    /// Acid.
    Acid,
    /// Electricity.
    Electricity,
    /// Fire.
    Fire,
    /// Cold.
    Cold,
    /// Poison.
    Poison,
    /// Light.
    Light,
    /// Darkness.
    Dark,
    /// Sound.
    Sound,
    /// Shards.
    Shards,
    /// Nexus.
    Nexus,
    /// Nether.
    Nether,
    /// Chaos.
    Chaos,
    /// Disenchantment.
    Disenchantment,
}

impl Element {
    /// The number of elements.
    pub const COUNT: usize = 13;

    /// Every element, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Acid,
        Self::Electricity,
        Self::Fire,
        Self::Cold,
        Self::Poison,
        Self::Light,
        Self::Dark,
        Self::Sound,
        Self::Shards,
        Self::Nexus,
        Self::Nether,
        Self::Chaos,
        Self::Disenchantment,
    ];

    /// The four base elements every relic starts out ignoring.
    pub const BASE: [Self; 4] = [Self::Acid, Self::Electricity, Self::Fire, Self::Cold];

    /// Data-file token names, in table order.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "ACID", "ELEC", "FIRE", "COLD", "POIS", "LIGHT", "DARK", "SOUND", "SHARD", "NEXUS",
        "NETHER", "CHAOS", "DISEN",
    ];

    /// The element's table index.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves a data-file token name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }

    /// The element's data-file token name.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

/// Per-element interaction of one item or template.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementInfo {
    /// Resistance level; 0 is neutral, negative is vulnerability.
    pub res_level: i32,
    /// The item shrugs off this element's destruction.
    pub ignore: bool,
    /// This element can destroy the item.
    pub hates: bool,
}

/// The full per-element table of one record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementInfoSet {
    info: [ElementInfo; Element::COUNT],
}

impl ElementInfoSet {
    /// An all-neutral table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The info for one element.
    #[must_use]
    pub fn get(&self, element: Element) -> &ElementInfo {
        &self.info[element.index()]
    }

    /// The info for one element, mutably.
    #[must_use]
    pub fn get_mut(&mut self, element: Element) -> &mut ElementInfo {
        &mut self.info[element.index()]
    }

    /// Sets one element's resistance level.
    pub fn set_resist(&mut self, element: Element, level: i32) {
        self.info[element.index()].res_level = level;
    }

    /// Marks an element as ignored.
    pub fn set_ignore(&mut self, element: Element) {
        self.info[element.index()].ignore = true;
    }

    /// Resolves an `IGNORE_X` or `HATES_X` flag token; returns false when
    /// the token is neither.
    pub fn grab_flag(&mut self, token: &str) -> bool {
        if let Some(name) = token.strip_prefix("IGNORE_") {
            if let Some(element) = Element::from_name(name) {
                self.info[element.index()].ignore = true;
                return true;
            }
        }
        if let Some(name) = token.strip_prefix("HATES_") {
            if let Some(element) = Element::from_name(name) {
                self.info[element.index()].hates = true;
                return true;
            }
        }
        false
    }

    /// Resolves a `RES_X[n]` value token; returns false when the token is
    /// not a resistance.
    pub fn grab_resist(&mut self, token: &str) -> bool {
        let Some((name, payload)) = value_token(token) else {
            return false;
        };
        let Some(element) = name.strip_prefix("RES_").and_then(Element::from_name) else {
            return false;
        };
        let Ok(level) = payload.parse::<i32>() else {
            return false;
        };
        self.set_resist(element, level);
        true
    }

    /// Iterates `(element, info)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Element, &ElementInfo)> {
        Element::ALL.iter().map(move |e| (*e, &self.info[e.index()]))
    }
}

/// The numeric modifiers an item can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Modifier {
    /// Strength.
    Strength,
    /// Intelligence.
    Intelligence,
    /// Wisdom.
    Wisdom,
    /// Dexterity.
    Dexterity,
    /// Constitution.
    Constitution,
    /// Stealth.
    Stealth,
    /// Searching.
    Search,
    /// Infravision range.
    Infravision,
    /// Digging power.
    Tunnel,
    /// Movement speed.
    Speed,
    /// Extra blows.
    Blows,
    /// Extra shots.
    Shots,
    /// Shooting power.
    Might,
    /// Light radius.
    Light,
}

impl Modifier {
    /// The number of modifiers.
    pub const COUNT: usize = 14;

    /// Every modifier, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Strength,
        Self::Intelligence,
        Self::Wisdom,
        Self::Dexterity,
        Self::Constitution,
        Self::Stealth,
        Self::Search,
        Self::Infravision,
        Self::Tunnel,
        Self::Speed,
        Self::Blows,
        Self::Shots,
        Self::Might,
        Self::Light,
    ];

    /// Data-file token names, in table order.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "STR", "INT", "WIS", "DEX", "CON", "STEALTH", "SEARCH", "INFRA", "TUNNEL", "SPEED",
        "BLOWS", "SHOTS", "MIGHT", "LIGHT",
    ];

    /// The modifier's table index.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves a data-file token name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }
}

/// Splits a flag/value stream on whitespace and `|` and feeds each token to
/// the grabber chain.
///
/// # Errors
/// Returns the first token the chain rejected.
pub fn split_tokens<'a>(
    stream: &'a str,
    mut grab: impl FnMut(&str) -> bool,
) -> std::result::Result<(), &'a str> {
    for token in stream
        .split(|c: char| c.is_whitespace() || c == '|')
        .filter(|t| !t.is_empty())
    {
        if !grab(token) {
            return Err(token);
        }
    }
    Ok(())
}

/// Splits a `NAME[payload]` value token.
#[must_use]
pub fn value_token(token: &str) -> Option<(&str, &str)> {
    let open = token.find('[')?;
    if open == 0 || !token.ends_with(']') {
        return None;
    }
    Some((&token[..open], &token[open + 1..token.len() - 1]))
}

/// Resolves a `MOD[n]` token into an integer modifier table; returns false
/// when the token is not a known modifier.
pub fn grab_int_modifier(values: &mut [i32; Modifier::COUNT], token: &str) -> bool {
    let Some((name, payload)) = value_token(token) else {
        return false;
    };
    let Some(modifier) = Modifier::from_name(name) else {
        return false;
    };
    let Ok(value) = payload.parse::<i32>() else {
        return false;
    };
    values[modifier.index()] = value;
    true
}

/// Resolves a `MOD[range]` token into a random-range modifier table, where
/// the payload is dice notation; returns false when the token is not a
/// known modifier or the payload is not valid dice.
pub fn grab_rand_modifier(values: &mut [Random; Modifier::COUNT], token: &str) -> bool {
    let Some((name, payload)) = value_token(token) else {
        return false;
    };
    let Some(modifier) = Modifier::from_name(name) else {
        return false;
    };
    let Ok(value) = Random::parse(payload) else {
        return false;
    };
    values[modifier.index()] = value;
    true
}
