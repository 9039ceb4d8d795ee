//! Special powers: named, reusable procedural effects bound to relics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_foundation::{Error, Result};
use loreforge_parser::{Parser, Values};

use crate::effect::{self, Effect};
use crate::table::Table;
use crate::{append_text, narrow_u};

/// One special power record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Power {
    /// Table slot, assigned at finalize.
    pub index: u32,
    /// Unique name; relics bind powers by it.
    pub name: String,
    /// Whether triggering the power requires aiming.
    pub aim: bool,
    /// Power score for item evaluation.
    pub power: u32,
    /// The effect chain.
    pub effects: Vec<Effect>,
    /// Message shown when the power triggers.
    pub message: Option<String>,
    /// Descriptive text.
    pub desc: Option<String>,
}

/// Builder state for the power file.
#[derive(Debug, Default)]
pub struct Builder {
    records: Vec<Power>,
}

impl Builder {
    fn current(&mut self) -> Result<&mut Power> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        self.records.push(Power {
            name: values.get_str("name")?.to_string(),
            ..Power::default()
        });
        Ok(())
    }

    fn on_aim(&mut self, values: &Values) -> Result<()> {
        let aim = values.get_uint("aim")? != 0;
        self.current()?.aim = aim;
        Ok(())
    }

    fn on_power(&mut self, values: &Values) -> Result<()> {
        let power = narrow_u(values.get_uint("power")?);
        self.current()?.power = power;
        Ok(())
    }

    fn on_effect(&mut self, values: &Values) -> Result<()> {
        effect::begin(&mut self.current()?.effects, values)
    }

    fn on_param(&mut self, values: &Values) -> Result<()> {
        effect::param(&mut self.current()?.effects, values)
    }

    fn on_dice(&mut self, values: &Values) -> Result<()> {
        effect::dice(&mut self.current()?.effects, values)
    }

    fn on_expr(&mut self, values: &Values) -> Result<()> {
        effect::expr(&mut self.current()?.effects, values)
    }

    fn on_msg(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("msg")?.to_string();
        append_text(&mut self.current()?.message, &text);
        Ok(())
    }

    fn on_desc(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("desc")?.to_string();
        append_text(&mut self.current()?.desc, &text);
        Ok(())
    }

    /// Freezes the build list into a sequential table, stamping each power
    /// with its slot.
    #[must_use]
    pub fn finalize(self) -> Table<Power> {
        Table::sequential(self.records, |power, index| power.index = index)
    }
}

/// Builds the directive parser for the power file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser() -> Result<Parser<Builder>> {
    let mut p = Parser::new(Builder::default());
    p.register("name str name", Builder::on_name)?;
    p.register("aim uint aim", Builder::on_aim)?;
    p.register("power uint power", Builder::on_power)?;
    p.register("effect sym eff ?sym type ?int xtra", Builder::on_effect)?;
    p.register("param int p2 ?int p3", Builder::on_param)?;
    p.register("dice str dice", Builder::on_dice)?;
    p.register("expr sym name sym base str expr", Builder::on_expr)?;
    p.register("msg str msg", Builder::on_msg)?;
    p.register("desc str desc", Builder::on_desc)?;
    Ok(p)
}

/// Resolves a power name against a finalized table.
///
/// Unknown names resolve to `None`; a relic binding a missing power is
/// silently left unbound.
#[must_use]
pub fn find_name(table: &Table<Power>, name: &str) -> Option<u32> {
    table.find(|p| p.name == name)
}
