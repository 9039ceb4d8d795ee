//! Banes: damage-modifier tags against creature categories.
//!
//! A bane multiplies damage against creatures selected either by a creature
//! flag or by a named creature category, never both. Templates, suffixes,
//! and relics reference banes by their textual code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_foundation::{CreatureFlag, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::table::Table;

/// The mutually exclusive target selector of a bane.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaneTarget {
    /// Creatures carrying a flag.
    Flag(CreatureFlag),
    /// Creatures of a named category.
    Category(String),
}

/// One bane record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bane {
    /// Unique textual code; the cross-reference key.
    pub code: String,
    /// Display name.
    pub name: Option<String>,
    /// Damage multiplier.
    pub multiplier: u32,
    /// Power score for item evaluation.
    pub power: u32,
    /// Verb used in melee messages.
    pub melee_verb: Option<String>,
    /// Verb used in ranged messages.
    pub range_verb: Option<String>,
    /// Who the bane applies to; records with no target are accepted and
    /// inert.
    pub target: Option<BaneTarget>,
}

/// Builder state for the bane file.
///
/// Borrows the creature-category directory so `creature` directives can be
/// validated against it.
#[derive(Debug)]
pub struct Builder<'a> {
    directory: &'a [String],
    records: Vec<Bane>,
}

impl<'a> Builder<'a> {
    /// Creates a builder validating against the given creature directory.
    #[must_use]
    pub fn new(directory: &'a [String]) -> Self {
        Self {
            directory,
            records: Vec::new(),
        }
    }

    fn current(&mut self) -> Result<&mut Bane> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_code(&mut self, values: &Values) -> Result<()> {
        self.records.push(Bane {
            code: values.get_str("code")?.to_string(),
            ..Bane::default()
        });
        Ok(())
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let name = values.get_str("name")?.to_string();
        self.current()?.name = Some(name);
        Ok(())
    }

    fn on_creature_flag(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("flag")?;
        let flag =
            CreatureFlag::from_name(token).ok_or_else(|| Error::invalid_flag(token))?;

        let record = self.current()?;
        if matches!(record.target, Some(BaneTarget::Category(_))) {
            return Err(ErrorKind::InvalidBane.into());
        }
        record.target = Some(BaneTarget::Flag(flag));
        Ok(())
    }

    fn on_creature_base(&mut self, values: &Values) -> Result<()> {
        let name = values.get_sym("base")?;
        if !self.directory.iter().any(|b| b == name) {
            return Err(ErrorKind::UnrecognisedCreature(name.to_string()).into());
        }

        let name = name.to_string();
        let record = self.current()?;
        if matches!(record.target, Some(BaneTarget::Flag(_))) {
            return Err(ErrorKind::InvalidBane.into());
        }
        record.target = Some(BaneTarget::Category(name));
        Ok(())
    }

    fn on_multiplier(&mut self, values: &Values) -> Result<()> {
        let multiplier = crate::narrow_u(values.get_uint("multiplier")?);
        self.current()?.multiplier = multiplier;
        Ok(())
    }

    fn on_power(&mut self, values: &Values) -> Result<()> {
        let power = crate::narrow_u(values.get_uint("power")?);
        self.current()?.power = power;
        Ok(())
    }

    fn on_melee_verb(&mut self, values: &Values) -> Result<()> {
        let verb = values.get_str("verb")?.to_string();
        self.current()?.melee_verb = Some(verb);
        Ok(())
    }

    fn on_range_verb(&mut self, values: &Values) -> Result<()> {
        let verb = values.get_str("verb")?.to_string();
        self.current()?.range_verb = Some(verb);
        Ok(())
    }

    /// Freezes the build list into a sequential table.
    #[must_use]
    pub fn finalize(self) -> Table<Bane> {
        Table::sequential(self.records, |_, _| {})
    }
}

/// Builds the directive parser for the bane file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser(directory: &[String]) -> Result<Parser<Builder<'_>>> {
    let mut p = Parser::new(Builder::new(directory));
    p.register("code str code", Builder::on_code)?;
    p.register("name str name", Builder::on_name)?;
    p.register("creature-flag sym flag", Builder::on_creature_flag)?;
    p.register("creature sym base", Builder::on_creature_base)?;
    p.register("multiplier uint multiplier", Builder::on_multiplier)?;
    p.register("power uint power", Builder::on_power)?;
    p.register("melee-verb str verb", Builder::on_melee_verb)?;
    p.register("range-verb str verb", Builder::on_range_verb)?;
    Ok(p)
}

/// Resolves a bane code against a finalized table.
///
/// # Errors
/// Returns [`ErrorKind::UnrecognisedBane`] when no record carries the code.
pub fn find_code(table: &Table<Bane>, code: &str) -> Result<u32> {
    table
        .find(|b| b.code == code)
        .ok_or_else(|| ErrorKind::UnrecognisedBane(code.to_string()).into())
}
