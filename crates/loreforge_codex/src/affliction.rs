//! Afflictions: detrimental magical properties attachable to items.
//!
//! Each affliction carries an embedded bonus item with its own combat
//! bonuses, flags, and effect chain. After all relics finish loading, a
//! back-fill pass gives every embedded item the shared synthetic
//! classification and an owned known-state clone; see
//! [`crate::loader::backfill_affliction_items`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::Random;
use loreforge_foundation::{CategoryCode, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::effect::{self, Effect};
use crate::flags::{self, Capability, ElementInfoSet, FlagSet, Modifier};
use crate::table::Table;
use crate::{append_text, narrow};

/// The embedded bonus item an affliction applies to its carrier.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BonusItem {
    /// Category and variant, assigned by the back-fill pass.
    pub classification: Option<(CategoryCode, u32)>,
    /// To-hit bonus.
    pub to_hit: i32,
    /// To-damage bonus.
    pub to_damage: i32,
    /// To-armor bonus.
    pub to_armor: i32,
    /// Capability flags.
    pub flags: FlagSet<Capability>,
    /// Element markers and resistances.
    pub elements: ElementInfoSet,
    /// Fixed modifier values.
    pub modifiers: [i32; Modifier::COUNT],
    /// The effect chain.
    pub effects: Vec<Effect>,
    /// Message shown when the effect triggers.
    pub effect_msg: Option<String>,
    /// Recharge/trigger timing range.
    pub time: Random,
    /// Owned known-state clone, assigned by the back-fill pass.
    pub known: Option<Box<BonusItem>>,
}

/// One affliction record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Affliction {
    /// Unique name; the cross-reference key.
    pub name: String,
    /// Applicability per category code.
    pub possible: Vec<bool>,
    /// The embedded bonus item.
    pub item: BonusItem,
    /// Descriptive text.
    pub desc: Option<String>,
}

/// Builder state for the affliction file.
#[derive(Debug, Default)]
pub struct Builder {
    records: Vec<Affliction>,
}

impl Builder {
    fn current(&mut self) -> Result<&mut Affliction> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        self.records.push(Affliction {
            name: values.get_str("name")?.to_string(),
            possible: vec![false; CategoryCode::COUNT],
            ..Affliction::default()
        });
        Ok(())
    }

    fn on_type(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("tval")?;
        let code = CategoryCode::from_name(token)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(token.to_string()))?;
        self.current()?.possible[code.index()] = true;
        Ok(())
    }

    fn on_combat(&mut self, values: &Values) -> Result<()> {
        let to_hit = narrow(values.get_int("to-h")?);
        let to_damage = narrow(values.get_int("to-d")?);
        let to_armor = narrow(values.get_int("to-a")?);

        let item = &mut self.current()?.item;
        item.to_hit = to_hit;
        item.to_damage = to_damage;
        item.to_armor = to_armor;
        Ok(())
    }

    fn on_effect(&mut self, values: &Values) -> Result<()> {
        effect::begin(&mut self.current()?.item.effects, values)
    }

    fn on_param(&mut self, values: &Values) -> Result<()> {
        effect::param(&mut self.current()?.item.effects, values)
    }

    fn on_dice(&mut self, values: &Values) -> Result<()> {
        effect::dice(&mut self.current()?.item.effects, values)
    }

    fn on_expr(&mut self, values: &Values) -> Result<()> {
        effect::expr(&mut self.current()?.item.effects, values)
    }

    fn on_msg(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("text")?.to_string();
        append_text(&mut self.current()?.item.effect_msg, &text);
        Ok(())
    }

    fn on_time(&mut self, values: &Values) -> Result<()> {
        let time = values.get_rand("time")?;
        self.current()?.item.time = time;
        Ok(())
    }

    fn on_flags(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("flags")?;
        let item = &mut self.current()?.item;
        flags::split_tokens(stream, |token| {
            item.flags.grab(token) || item.elements.grab_flag(token)
        })
        .map_err(Error::invalid_flag)
    }

    fn on_values(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("values")?;
        let item = &mut self.current()?.item;
        flags::split_tokens(stream, |token| {
            flags::grab_int_modifier(&mut item.modifiers, token)
                || item.elements.grab_resist(token)
        })
        .map_err(Error::invalid_value)
    }

    fn on_desc(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("desc")?.to_string();
        append_text(&mut self.current()?.desc, &text);
        Ok(())
    }

    /// Freezes the build list into a sequential table.
    #[must_use]
    pub fn finalize(self) -> Table<Affliction> {
        Table::sequential(self.records, |_, _| {})
    }
}

/// Builds the directive parser for the affliction file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser() -> Result<Parser<Builder>> {
    let mut p = Parser::new(Builder::default());
    p.register("name str name", Builder::on_name)?;
    p.register("type sym tval", Builder::on_type)?;
    p.register("combat int to-h int to-d int to-a", Builder::on_combat)?;
    p.register("effect sym eff ?sym type ?int xtra", Builder::on_effect)?;
    p.register("param int p2 ?int p3", Builder::on_param)?;
    p.register("dice str dice", Builder::on_dice)?;
    p.register("expr sym name sym base str expr", Builder::on_expr)?;
    p.register("msg str text", Builder::on_msg)?;
    p.register("time rand time", Builder::on_time)?;
    p.register("flags str flags", Builder::on_flags)?;
    p.register("values str values", Builder::on_values)?;
    p.register("desc str desc", Builder::on_desc)?;
    Ok(p)
}

/// Resolves an affliction name against a finalized table.
///
/// # Errors
/// Returns [`ErrorKind::UnrecognisedAffliction`] when no record carries the
/// name.
pub fn find_name(table: &Table<Affliction>, name: &str) -> Result<u32> {
    table
        .find(|a| a.name == name)
        .ok_or_else(|| ErrorKind::UnrecognisedAffliction(name.to_string()).into())
}
