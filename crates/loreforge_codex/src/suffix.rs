//! Suffixes: magical modifier overlays applicable to one or more templates.
//!
//! A suffix's applicability list is built from `type` directives (every
//! template of a category) and `item` directives (one (category, variant)
//! pair resolved by display name). Both resolve against the already
//! finalized template table, so suffixes must load after templates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::Random;
use loreforge_foundation::{CategoryCode, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::affliction::{self, Affliction};
use crate::bane::{self, Bane};
use crate::effect::{self, Effect};
use crate::flags::{self, Capability, ElementInfoSet, FlagSet, KindFlag, Modifier};
use crate::scourge::{self, Scourge};
use crate::table::Table;
use crate::template::{self, Template};
use crate::{append_text, check_alloc_bounds, narrow, parse_alloc_range};

/// One suffix record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Suffix {
    /// Explicit identity from the file.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Added cost.
    pub cost: i32,
    /// Level rating.
    pub rating: i32,
    /// Allocation commonness.
    pub alloc_prob: i32,
    /// Minimum allocation depth.
    pub alloc_min: i32,
    /// Maximum allocation depth.
    pub alloc_max: i32,
    /// Identities of the templates this suffix may apply to.
    pub possible: Vec<u32>,
    /// To-hit bonus range.
    pub to_hit: Random,
    /// To-damage bonus range.
    pub to_damage: Random,
    /// To-armor bonus range.
    pub to_armor: Random,
    /// To-hit floor.
    pub min_to_hit: i32,
    /// To-damage floor.
    pub min_to_damage: i32,
    /// To-armor floor.
    pub min_to_armor: i32,
    /// The effect chain.
    pub effects: Vec<Effect>,
    /// Recharge timing range.
    pub time: Random,
    /// Capability flags switched on.
    pub flags: FlagSet<Capability>,
    /// Kind flags.
    pub kind_flags: FlagSet<KindFlag>,
    /// Capability flags switched off.
    pub flags_off: FlagSet<Capability>,
    /// Element markers and resistances.
    pub elements: ElementInfoSet,
    /// Modifier value ranges.
    pub modifiers: [Random; Modifier::COUNT],
    /// Modifier floors.
    pub min_modifiers: [i32; Modifier::COUNT],
    /// Applicable banes; empty until referenced.
    pub banes: Vec<bool>,
    /// Applicable scourges; empty until referenced.
    pub scourges: Vec<bool>,
    /// Affliction power per affliction slot; empty until referenced.
    pub afflictions: Vec<i32>,
    /// Descriptive text.
    pub desc: Option<String>,
}

/// Builder state for the suffix file.
pub struct Builder<'a> {
    templates: &'a Table<Template>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
    records: Vec<Suffix>,
}

impl<'a> Builder<'a> {
    /// Creates a builder over the earlier kinds' finished tables.
    #[must_use]
    pub fn new(
        templates: &'a Table<Template>,
        banes: &'a Table<Bane>,
        scourges: &'a Table<Scourge>,
        afflictions: &'a Table<Affliction>,
    ) -> Self {
        Self {
            templates,
            banes,
            scourges,
            afflictions,
            records: Vec::new(),
        }
    }

    fn current(&mut self) -> Result<&mut Suffix> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let id = u32::try_from(values.get_int("index")?).unwrap_or(0);
        self.records.push(Suffix {
            id,
            name: values.get_str("name")?.to_string(),
            ..Suffix::default()
        });
        Ok(())
    }

    fn on_info(&mut self, values: &Values) -> Result<()> {
        let cost = narrow(values.get_int("cost")?);
        let rating = narrow(values.get_int("rating")?);
        let record = self.current()?;
        record.cost = cost;
        record.rating = rating;
        Ok(())
    }

    fn on_alloc(&mut self, values: &Values) -> Result<()> {
        let prob = narrow(values.get_int("common")?);
        let text = values.get_str("minmax")?;
        let (min, max) = parse_alloc_range(text)?;
        check_alloc_bounds(min, max, text)?;

        let record = self.current()?;
        record.alloc_prob = prob;
        record.alloc_min = min;
        record.alloc_max = max;
        Ok(())
    }

    fn on_type(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("tval")?;
        let code = CategoryCode::from_name(token)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(token.to_string()))?;

        let ids: Vec<u32> = self
            .templates
            .iter_with_identity()
            .filter(|(_, t)| t.category == code)
            .map(|(id, _)| id)
            .collect();
        if ids.is_empty() {
            return Err(ErrorKind::NoTemplateForSuffix(token.to_string()).into());
        }
        self.current()?.possible.extend(ids);
        Ok(())
    }

    fn on_item(&mut self, values: &Values) -> Result<()> {
        let tval = values.get_sym("tval")?;
        let code = CategoryCode::from_name(tval)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(tval.to_string()))?;
        let sval = values.get_sym("sval")?;

        let invalid = || ErrorKind::InvalidTemplateRef {
            category: tval.to_string(),
            variant: sval.to_string(),
        };
        let variant =
            template::variant_by_display_name(self.templates, code, sval).ok_or_else(invalid)?;
        let id = self
            .templates
            .find(|t| t.category == code && t.variant == variant)
            .ok_or_else(invalid)?;

        self.current()?.possible.push(id);
        Ok(())
    }

    fn on_combat(&mut self, values: &Values) -> Result<()> {
        let to_hit = values.get_rand("th")?;
        let to_damage = values.get_rand("td")?;
        let to_armor = values.get_rand("ta")?;
        let record = self.current()?;
        record.to_hit = to_hit;
        record.to_damage = to_damage;
        record.to_armor = to_armor;
        Ok(())
    }

    fn on_min_combat(&mut self, values: &Values) -> Result<()> {
        let th = narrow(values.get_int("th")?);
        let td = narrow(values.get_int("td")?);
        let ta = narrow(values.get_int("ta")?);
        let record = self.current()?;
        record.min_to_hit = th;
        record.min_to_damage = td;
        record.min_to_armor = ta;
        Ok(())
    }

    fn on_effect(&mut self, values: &Values) -> Result<()> {
        effect::begin(&mut self.current()?.effects, values)
    }

    fn on_dice(&mut self, values: &Values) -> Result<()> {
        effect::dice(&mut self.current()?.effects, values)
    }

    fn on_time(&mut self, values: &Values) -> Result<()> {
        let time = values.get_rand("time")?;
        self.current()?.time = time;
        Ok(())
    }

    fn on_flags(&mut self, values: &Values) -> Result<()> {
        if !values.has("flags") {
            return Ok(());
        }
        let stream = values.get_str("flags")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            record.flags.grab(token)
                || record.kind_flags.grab(token)
                || record.elements.grab_flag(token)
        })
        .map_err(Error::invalid_flag)
    }

    fn on_flags_off(&mut self, values: &Values) -> Result<()> {
        if !values.has("flags") {
            return Ok(());
        }
        let stream = values.get_str("flags")?;
        let record = self.current()?;
        // Only capability flags may be switched off; anything else is an
        // immediate error.
        flags::split_tokens(stream, |token| record.flags_off.grab(token))
            .map_err(Error::invalid_flag)
    }

    fn on_values(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("values")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            flags::grab_rand_modifier(&mut record.modifiers, token)
                || record.elements.grab_resist(token)
        })
        .map_err(Error::invalid_value)
    }

    fn on_min_values(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("min_values")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            flags::grab_int_modifier(&mut record.min_modifiers, token)
        })
        .map_err(Error::invalid_value)
    }

    fn on_desc(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("text")?.to_string();
        append_text(&mut self.current()?.desc, &text);
        Ok(())
    }

    fn on_bane(&mut self, values: &Values) -> Result<()> {
        let slot = bane::find_code(self.banes, values.get_str("code")?)?;
        let size = self.banes.capacity();
        let record = self.current()?;
        if record.banes.is_empty() {
            record.banes = vec![false; size];
        }
        record.banes[slot as usize] = true;
        Ok(())
    }

    fn on_scourge(&mut self, values: &Values) -> Result<()> {
        let slot = scourge::find_code(self.scourges, values.get_str("code")?)?;
        let size = self.scourges.capacity();
        let record = self.current()?;
        if record.scourges.is_empty() {
            record.scourges = vec![false; size];
        }
        record.scourges[slot as usize] = true;
        Ok(())
    }

    fn on_affliction(&mut self, values: &Values) -> Result<()> {
        let slot = affliction::find_name(self.afflictions, values.get_sym("name")?)?;
        let power = narrow(values.get_int("power")?);
        let size = self.afflictions.capacity();
        let record = self.current()?;
        if record.afflictions.is_empty() {
            record.afflictions = vec![0; size];
        }
        record.afflictions[slot as usize] = power;
        Ok(())
    }

    /// Freezes the build list into an identity-indexed table.
    #[must_use]
    pub fn finalize(self) -> Table<Suffix> {
        Table::by_identity(self.records, |s| s.id)
    }
}

/// Builds the directive parser for the suffix file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser<'a>(
    templates: &'a Table<Template>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
) -> Result<Parser<Builder<'a>>> {
    let mut p = Parser::new(Builder::new(templates, banes, scourges, afflictions));
    p.register("name int index str name", Builder::on_name)?;
    p.register("info int cost int rating", Builder::on_info)?;
    p.register("alloc int common str minmax", Builder::on_alloc)?;
    p.register("type sym tval", Builder::on_type)?;
    p.register("item sym tval sym sval", Builder::on_item)?;
    p.register("combat rand th rand td rand ta", Builder::on_combat)?;
    p.register("min-combat int th int td int ta", Builder::on_min_combat)?;
    p.register("effect sym eff ?sym type ?int xtra", Builder::on_effect)?;
    p.register("dice str dice", Builder::on_dice)?;
    p.register("time rand time", Builder::on_time)?;
    p.register("flags ?str flags", Builder::on_flags)?;
    p.register("flags-off ?str flags", Builder::on_flags_off)?;
    p.register("values str values", Builder::on_values)?;
    p.register("min-values str min_values", Builder::on_min_values)?;
    p.register("desc str text", Builder::on_desc)?;
    p.register("bane str code", Builder::on_bane)?;
    p.register("scourge str code", Builder::on_scourge)?;
    p.register("curse sym name int power", Builder::on_affliction)?;
    Ok(p)
}
