//! Relics: unique artifacts.
//!
//! A relic's `base` directive resolves its (category, variant) pair against
//! the template table by display name; when the variant does not exist yet,
//! a dummy template is synthesized on the spot so that later directives in
//! the same record (the graphics override) can address it. Relics load
//! last, after every other kind.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::Random;
use loreforge_foundation::{CategoryCode, Color, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::affliction::{self, Affliction};
use crate::bane::{self, Bane};
use crate::category::Category;
use crate::flags::{self, Capability, Element, ElementInfoSet, FlagSet, KindFlag, Modifier};
use crate::power::{self, Power};
use crate::scourge::{self, Scourge};
use crate::table::Table;
use crate::template::{self, Template};
use crate::{append_text, check_alloc_bounds, narrow, parse_alloc_range};

/// One relic record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relic {
    /// Explicit identity from the file.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Base template category.
    pub category: CategoryCode,
    /// Base template variant within the category.
    pub variant: u32,
    /// Native depth.
    pub level: i32,
    /// Weight.
    pub weight: i32,
    /// Cost.
    pub cost: i32,
    /// Allocation commonness.
    pub alloc_prob: i32,
    /// Minimum allocation depth.
    pub alloc_min: i32,
    /// Maximum allocation depth.
    pub alloc_max: i32,
    /// Fixed armor class.
    pub armor_class: i32,
    /// Damage dice count.
    pub damage_dice: i32,
    /// Damage dice sides.
    pub damage_sides: i32,
    /// Fixed to-hit bonus.
    pub to_hit: i32,
    /// Fixed to-damage bonus.
    pub to_damage: i32,
    /// Fixed to-armor bonus.
    pub to_armor: i32,
    /// Capability flags.
    pub flags: FlagSet<Capability>,
    /// Element markers and resistances; the four base elements start out
    /// ignored.
    pub elements: ElementInfoSet,
    /// Bound special power, by table slot. Unknown power names leave this
    /// unbound.
    pub power: Option<u32>,
    /// Trigger timing range.
    pub time: Random,
    /// Alternate trigger message.
    pub alt_msg: Option<String>,
    /// Fixed modifier values.
    pub modifiers: [i32; Modifier::COUNT],
    /// Applicable banes; empty until referenced.
    pub banes: Vec<bool>,
    /// Applicable scourges; empty until referenced.
    pub scourges: Vec<bool>,
    /// Affliction power per affliction slot; empty until referenced.
    pub afflictions: Vec<i32>,
    /// Descriptive text.
    pub desc: Option<String>,
}

/// Builder state for the relic file.
///
/// Borrows the template table and category table mutably: resolving a base
/// reference may synthesize a dummy template, and the graphics override
/// rewrites the referenced template's glyph and color.
pub struct Builder<'a> {
    templates: &'a mut Table<Template>,
    categories: &'a mut Vec<Category>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
    powers: &'a Table<Power>,
    records: Vec<Relic>,
}

impl<'a> Builder<'a> {
    /// Creates a builder over the earlier kinds' finished tables.
    pub fn new(
        templates: &'a mut Table<Template>,
        categories: &'a mut Vec<Category>,
        banes: &'a Table<Bane>,
        scourges: &'a Table<Scourge>,
        afflictions: &'a Table<Affliction>,
        powers: &'a Table<Power>,
    ) -> Self {
        Self {
            templates,
            categories,
            banes,
            scourges,
            afflictions,
            powers,
            records: Vec::new(),
        }
    }

    fn current(&mut self) -> Result<&mut Relic> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let id = u32::try_from(values.get_int("index")?).unwrap_or(0);
        let mut elements = ElementInfoSet::new();
        for element in Element::BASE {
            elements.set_ignore(element);
        }
        self.records.push(Relic {
            id,
            name: values.get_str("name")?.to_string(),
            elements,
            ..Relic::default()
        });
        Ok(())
    }

    fn on_base(&mut self, values: &Values) -> Result<()> {
        let tval = values.get_sym("tval")?;
        let code = CategoryCode::from_name(tval)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(tval.to_string()))?;
        let sval = values.get_sym("sval")?;

        let variant = match template::variant_by_display_name(self.templates, code, sval) {
            Some(variant) => variant,
            None => {
                let (_, variant) =
                    template::synthesize_dummy(self.templates, self.categories, code, sval)?;
                variant
            }
        };

        let record = self
            .records
            .last_mut()
            .ok_or_else(Error::missing_record_header)?;
        record.category = code;
        record.variant = variant;
        Ok(())
    }

    fn on_graphics(&mut self, values: &Values) -> Result<()> {
        let glyph = values.get_char("glyph")?;
        let color = Color::from_token(values.get_sym("color")?);

        let (category, variant) = {
            let record = self
                .records
                .last_mut()
                .ok_or_else(Error::missing_record_header)?;
            (record.category, record.variant)
        };

        let id = self
            .templates
            .find(|t| t.category == category && t.variant == variant)
            .ok_or_else(|| Error::internal("graphics override before a base directive"))?;
        let base = self
            .templates
            .get_mut(id)
            .ok_or_else(|| Error::internal("template table slot vanished"))?;

        if !base.kind_flags.contains(KindFlag::InstantRelic) {
            return Err(ErrorKind::NotInstancedRelic.into());
        }
        base.glyph = glyph;
        base.color = color;
        Ok(())
    }

    fn on_info(&mut self, values: &Values) -> Result<()> {
        let level = narrow(values.get_int("level")?);
        let weight = narrow(values.get_int("weight")?);
        let cost = narrow(values.get_int("cost")?);
        let record = self.current()?;
        record.level = level;
        record.weight = weight;
        record.cost = cost;
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

    fn on_power(&mut self, values: &Values) -> Result<()> {
        let ac = narrow(values.get_int("ac")?);
        let hd = values.get_rand("hd")?;
        let to_hit = narrow(values.get_int("to-h")?);
        let to_damage = narrow(values.get_int("to-d")?);
        let to_armor = narrow(values.get_int("to-a")?);

        let record = self.current()?;
        record.armor_class = ac;
        record.damage_dice = hd.dice;
        record.damage_sides = hd.sides;
        record.to_hit = to_hit;
        record.to_damage = to_damage;
        record.to_armor = to_armor;
        Ok(())
    }

    fn on_flags(&mut self, values: &Values) -> Result<()> {
        if !values.has("flags") {
            return Ok(());
        }
        let stream = values.get_str("flags")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            record.flags.grab(token) || record.elements.grab_flag(token)
        })
        .map_err(Error::invalid_flag)
    }

    fn on_act(&mut self, values: &Values) -> Result<()> {
        let bound = power::find_name(self.powers, values.get_str("name")?);
        self.current()?.power = bound;
        Ok(())
    }

    fn on_time(&mut self, values: &Values) -> Result<()> {
        let time = values.get_rand("time")?;
        self.current()?.time = time;
        Ok(())
    }

    fn on_msg(&mut self, values: &Values) -> Result<()> {
        let text = values.get_str("text")?.to_string();
        append_text(&mut self.current()?.alt_msg, &text);
        Ok(())
    }

    fn on_values(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("values")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            flags::grab_int_modifier(&mut record.modifiers, token)
                || record.elements.grab_resist(token)
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
    pub fn finalize(self) -> Table<Relic> {
        Table::by_identity(self.records, |r| r.id)
    }
}

/// Builds the directive parser for the relic file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser<'a>(
    templates: &'a mut Table<Template>,
    categories: &'a mut Vec<Category>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
    powers: &'a Table<Power>,
) -> Result<Parser<Builder<'a>>> {
    let mut p = Parser::new(Builder::new(
        templates,
        categories,
        banes,
        scourges,
        afflictions,
        powers,
    ));
    p.register("name int index str name", Builder::on_name)?;
    p.register("base-object sym tval sym sval", Builder::on_base)?;
    p.register("graphics char glyph sym color", Builder::on_graphics)?;
    p.register("info int level int weight int cost", Builder::on_info)?;
    p.register("alloc int common str minmax", Builder::on_alloc)?;
    p.register(
        "power int ac rand hd int to-h int to-d int to-a",
        Builder::on_power,
    )?;
    p.register("flags ?str flags", Builder::on_flags)?;
    p.register("act str name", Builder::on_act)?;
    p.register("time rand time", Builder::on_time)?;
    p.register("msg str text", Builder::on_msg)?;
    p.register("values str values", Builder::on_values)?;
    p.register("desc str text", Builder::on_desc)?;
    p.register("bane str code", Builder::on_bane)?;
    p.register("scourge str code", Builder::on_scourge)?;
    p.register("curse sym name int power", Builder::on_affliction)?;
    Ok(p)
}
