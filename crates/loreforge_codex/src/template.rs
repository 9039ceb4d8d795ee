//! Item templates: the base unit of "kind of item".
//!
//! Templates declare explicit identities in the file, so the finalized
//! table is identity-indexed and may be sparse. Each template belongs to
//! exactly one category; its per-category variant number is assigned when
//! its `type` directive is seen and never changes afterwards. Category kind
//! flags are unioned in at finalize, not at parse time, because a category's
//! flags may still be updated after some of its templates exist.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_dice::Random;
use loreforge_foundation::{CategoryCode, Color, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::affliction::{self, Affliction};
use crate::bane::{self, Bane};
use crate::category::Category;
use crate::effect::{self, Effect};
use crate::flags::{self, Capability, ElementInfoSet, FlagSet, KindFlag, Modifier};
use crate::scourge::{self, Scourge};
use crate::table::Table;
use crate::{append_text, narrow, parse_alloc_range};

/// One item template record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Template {
    /// Explicit identity from the file.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub glyph: char,
    /// Display color.
    pub color: Color,
    /// Owning category.
    pub category: CategoryCode,
    /// Per-category variant number, assigned at `type` time.
    pub variant: u32,
    /// Native depth.
    pub level: i32,
    /// Weight.
    pub weight: i32,
    /// Base cost.
    pub cost: i32,
    /// Allocation commonness.
    pub alloc_prob: i32,
    /// Minimum allocation depth.
    pub alloc_min: i32,
    /// Maximum allocation depth.
    pub alloc_max: i32,
    /// Base armor class.
    pub armor_class: i32,
    /// Damage dice count.
    pub damage_dice: i32,
    /// Damage dice sides.
    pub damage_sides: i32,
    /// To-hit bonus range.
    pub to_hit: Random,
    /// To-damage bonus range.
    pub to_damage: Random,
    /// To-armor bonus range.
    pub to_armor: Random,
    /// Charge range, for usable items.
    pub charge: Random,
    /// Chance (percent) of generating a stack.
    pub stack_prob: i32,
    /// Stack size range.
    pub stack: Random,
    /// Capability flags.
    pub flags: FlagSet<Capability>,
    /// Kind flags; the owning category's are unioned in at finalize.
    pub kind_flags: FlagSet<KindFlag>,
    /// Breakage chance (percent), inherited from the category at finalize.
    pub break_chance: i32,
    /// Element markers and resistances.
    pub elements: ElementInfoSet,
    /// Power score for item evaluation.
    pub power_score: i32,
    /// The effect chain.
    pub effects: Vec<Effect>,
    /// Message shown when the effect triggers.
    pub effect_msg: Option<String>,
    /// Recharge timing range.
    pub time: Random,
    /// Primary value range.
    pub pval: Random,
    /// Modifier value ranges.
    pub modifiers: [Random; Modifier::COUNT],
    /// Applicable banes, sized to the bane table; empty until referenced.
    pub banes: Vec<bool>,
    /// Applicable scourges, sized to the scourge table; empty until
    /// referenced.
    pub scourges: Vec<bool>,
    /// Affliction power per affliction slot; empty until referenced.
    pub afflictions: Vec<i32>,
    /// Descriptive text.
    pub desc: Option<String>,
}

/// Builder state for the template file.
///
/// Borrows the finished tables of earlier kinds for cross-reference
/// resolution, and the category table mutably so `type` directives can bump
/// per-category variant counters.
pub struct Builder<'a> {
    categories: &'a mut Vec<Category>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
    records: Vec<Template>,
}

impl<'a> Builder<'a> {
    /// Creates a builder over the earlier kinds' finished tables.
    pub fn new(
        categories: &'a mut Vec<Category>,
        banes: &'a Table<Bane>,
        scourges: &'a Table<Scourge>,
        afflictions: &'a Table<Affliction>,
    ) -> Self {
        Self {
            categories,
            banes,
            scourges,
            afflictions,
            records: Vec::new(),
        }
    }

    fn current(&mut self) -> Result<&mut Template> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let id = u32::try_from(values.get_int("index")?).unwrap_or(0);
        self.records.push(Template {
            id,
            name: values.get_str("name")?.to_string(),
            ..Template::default()
        });
        Ok(())
    }

    fn on_graphics(&mut self, values: &Values) -> Result<()> {
        let glyph = values.get_char("glyph")?;
        let color = Color::from_token(values.get_sym("color")?);
        let record = self.current()?;
        record.glyph = glyph;
        record.color = color;
        Ok(())
    }

    fn on_type(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("tval")?;
        let code = CategoryCode::from_name(token)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(token.to_string()))?;

        let record = self
            .records
            .last_mut()
            .ok_or_else(Error::missing_record_header)?;
        let category = &mut self.categories[code.index()];
        category.num_variants += 1;
        record.category = code;
        record.variant = category.num_variants;
        Ok(())
    }

    fn on_properties(&mut self, values: &Values) -> Result<()> {
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
        let (min, max) = parse_alloc_range(values.get_str("minmax")?)?;

        let record = self.current()?;
        record.alloc_prob = prob;
        record.alloc_min = min;
        record.alloc_max = max;
        Ok(())
    }

    fn on_combat(&mut self, values: &Values) -> Result<()> {
        let ac = narrow(values.get_int("ac")?);
        let hd = values.get_rand("hd")?;
        let to_hit = values.get_rand("to-h")?;
        let to_damage = values.get_rand("to-d")?;
        let to_armor = values.get_rand("to-a")?;

        let record = self.current()?;
        record.armor_class = ac;
        record.damage_dice = hd.dice;
        record.damage_sides = hd.sides;
        record.to_hit = to_hit;
        record.to_damage = to_damage;
        record.to_armor = to_armor;
        Ok(())
    }

    fn on_charges(&mut self, values: &Values) -> Result<()> {
        let charge = values.get_rand("charges")?;
        self.current()?.charge = charge;
        Ok(())
    }

    fn on_pile(&mut self, values: &Values) -> Result<()> {
        let prob = narrow(values.get_int("prob")?);
        let stack = values.get_rand("stack")?;
        let record = self.current()?;
        record.stack_prob = prob;
        record.stack = stack;
        Ok(())
    }

    fn on_flags(&mut self, values: &Values) -> Result<()> {
        let stream = values.get_str("flags")?;
        let record = self.current()?;
        flags::split_tokens(stream, |token| {
            record.flags.grab(token)
                || record.kind_flags.grab(token)
                || record.elements.grab_flag(token)
        })
        .map_err(Error::invalid_flag)
    }

    fn on_power(&mut self, values: &Values) -> Result<()> {
        let power = narrow(values.get_int("power")?);
        self.current()?.power_score = power;
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
        let text = values.get_str("text")?.to_string();
        append_text(&mut self.current()?.effect_msg, &text);
        Ok(())
    }

    fn on_time(&mut self, values: &Values) -> Result<()> {
        let time = values.get_rand("time")?;
        self.current()?.time = time;
        Ok(())
    }

    fn on_pval(&mut self, values: &Values) -> Result<()> {
        let pval = values.get_rand("pval")?;
        self.current()?.pval = pval;
        Ok(())
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

    /// Freezes the build list into an identity-indexed table, unioning each
    /// template's kind flags with its owning category's and inheriting the
    /// category's breakage chance.
    #[must_use]
    pub fn finalize(self) -> Table<Template> {
        let mut table = Table::by_identity(self.records, |t| t.id);
        for template in table.iter_mut() {
            let category = &self.categories[template.category.index()];
            template.kind_flags.union_with(category.kind_flags);
            template.break_chance = category.break_chance;
        }
        table
    }
}

/// Builds the directive parser for the template file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser<'a>(
    categories: &'a mut Vec<Category>,
    banes: &'a Table<Bane>,
    scourges: &'a Table<Scourge>,
    afflictions: &'a Table<Affliction>,
) -> Result<Parser<Builder<'a>>> {
    let mut p = Parser::new(Builder::new(categories, banes, scourges, afflictions));
    p.register("name int index str name", Builder::on_name)?;
    p.register("graphics char glyph sym color", Builder::on_graphics)?;
    p.register("type sym tval", Builder::on_type)?;
    p.register("properties int level int weight int cost", Builder::on_properties)?;
    p.register("alloc int common str minmax", Builder::on_alloc)?;
    p.register(
        "combat int ac rand hd rand to-h rand to-d rand to-a",
        Builder::on_combat,
    )?;
    p.register("charges rand charges", Builder::on_charges)?;
    p.register("pile int prob rand stack", Builder::on_pile)?;
    p.register("flags str flags", Builder::on_flags)?;
    p.register("power int power", Builder::on_power)?;
    p.register("effect sym eff ?sym type ?int xtra", Builder::on_effect)?;
    p.register("param int p2 ?int p3", Builder::on_param)?;
    p.register("dice str dice", Builder::on_dice)?;
    p.register("expr sym name sym base str expr", Builder::on_expr)?;
    p.register("msg str text", Builder::on_msg)?;
    p.register("time rand time", Builder::on_time)?;
    p.register("pval rand pval", Builder::on_pval)?;
    p.register("values str values", Builder::on_values)?;
    p.register("desc str text", Builder::on_desc)?;
    p.register("bane str code", Builder::on_bane)?;
    p.register("scourge str code", Builder::on_scourge)?;
    p.register("curse sym name int power", Builder::on_affliction)?;
    Ok(p)
}

/// Looks up a template by (category, variant) pair.
#[must_use]
pub fn lookup(table: &Table<Template>, category: CategoryCode, variant: u32) -> Option<&Template> {
    table
        .iter()
        .find(|t| t.category == category && t.variant == variant)
}

/// Finds a variant number by category and display name.
#[must_use]
pub fn variant_by_display_name(
    table: &Table<Template>,
    category: CategoryCode,
    name: &str,
) -> Option<u32> {
    table
        .iter()
        .find(|t| t.category == category && t.name == name)
        .map(|t| t.variant)
}

/// Synthesizes a dummy template for a relic whose base names a variant that
/// does not exist yet.
///
/// The dummy copies the category, takes the category's next variant number,
/// is named after the requested variant, gets the default `*`/red graphics
/// (expected to be overridden by the same relic record), and is marked
/// [`KindFlag::InstantRelic`]. Returns the new template's identity and
/// variant. No dedup: a second relic naming the same missing pair gets a
/// second dummy.
///
/// # Errors
/// Returns [`ErrorKind::Internal`] when the owning category is absent from
/// the category table.
pub fn synthesize_dummy(
    table: &mut Table<Template>,
    categories: &mut [Category],
    code: CategoryCode,
    variant_name: &str,
) -> Result<(u32, u32)> {
    let category = categories
        .get_mut(code.index())
        .ok_or_else(|| Error::internal(format!("no category record for {}", code.name())))?;

    category.num_variants += 1;
    let variant = category.num_variants;
    let kind_flags = {
        let mut kf = category.kind_flags;
        kf.insert(KindFlag::InstantRelic);
        kf
    };

    let dummy = Template {
        name: format!("& {variant_name}~"),
        glyph: '*',
        color: Color::Red,
        category: code,
        variant,
        kind_flags,
        break_chance: category.break_chance,
        ..Template::default()
    };
    let id = table.push(dummy);
    if let Some(record) = table.get_mut(id) {
        record.id = id;
    }
    Ok((id, variant))
}
