//! Scourges: damage-modifier tags against creature materials.
//!
//! A scourge multiplies damage against creatures that do not resist its
//! element; the optional resist flag names the creature flag that negates
//! it. Templates, suffixes, and relics reference scourges by code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_foundation::{CreatureFlag, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::table::Table;

/// One scourge record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scourge {
    /// Unique textual code; the cross-reference key.
    pub code: String,
    /// Display name.
    pub name: Option<String>,
    /// Verb used in combat messages.
    pub verb: Option<String>,
    /// Damage multiplier.
    pub multiplier: u32,
    /// Power score for item evaluation.
    pub power: u32,
    /// The creature flag that negates this scourge.
    pub resist_flag: Option<CreatureFlag>,
}

/// Builder state for the scourge file.
#[derive(Debug, Default)]
pub struct Builder {
    records: Vec<Scourge>,
}

impl Builder {
    fn current(&mut self) -> Result<&mut Scourge> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_code(&mut self, values: &Values) -> Result<()> {
        self.records.push(Scourge {
            code: values.get_str("code")?.to_string(),
            ..Scourge::default()
        });
        Ok(())
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let name = values.get_str("name")?.to_string();
        self.current()?.name = Some(name);
        Ok(())
    }

    fn on_verb(&mut self, values: &Values) -> Result<()> {
        let verb = values.get_str("verb")?.to_string();
        self.current()?.verb = Some(verb);
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

    fn on_resist_flag(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("flag")?;
        let flag =
            CreatureFlag::from_name(token).ok_or_else(|| Error::invalid_flag(token))?;
        self.current()?.resist_flag = Some(flag);
        Ok(())
    }

    /// Freezes the build list into a sequential table.
    #[must_use]
    pub fn finalize(self) -> Table<Scourge> {
        Table::sequential(self.records, |_, _| {})
    }
}

/// Builds the directive parser for the scourge file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser() -> Result<Parser<Builder>> {
    let mut p = Parser::new(Builder::default());
    p.register("code str code", Builder::on_code)?;
    p.register("name str name", Builder::on_name)?;
    p.register("verb str verb", Builder::on_verb)?;
    p.register("multiplier uint multiplier", Builder::on_multiplier)?;
    p.register("power uint power", Builder::on_power)?;
    p.register("resist-flag sym flag", Builder::on_resist_flag)?;
    Ok(p)
}

/// Resolves a scourge code against a finalized table.
///
/// # Errors
/// Returns [`ErrorKind::UnrecognisedScourge`] when no record carries the
/// code.
pub fn find_code(table: &Table<Scourge>, code: &str) -> Result<u32> {
    table
        .find(|s| s.code == code)
        .ok_or_else(|| ErrorKind::UnrecognisedScourge(code.to_string()).into())
}
