//! Base categories: the material/class grouping every template belongs to.
//!
//! Categories supply shared defaults (breakage chance, display color, flags,
//! element markers) to their templates. The category table is fixed-size,
//! indexed by [`CategoryCode`], and kind flags recorded here are pushed down
//! into every owned template when the template table finalizes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use loreforge_foundation::{CategoryCode, Color, Error, ErrorKind, Result};
use loreforge_parser::{Parser, Values};

use crate::flags::{self, Capability, ElementInfoSet, FlagSet, KindFlag};
use crate::narrow;

/// One base category record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category {
    /// The fixed category code.
    pub code: CategoryCode,
    /// Display name, when the file supplies one.
    pub name: Option<String>,
    /// Chance (percent) that a thrown item of this category breaks.
    pub break_chance: i32,
    /// Display color.
    pub color: Color,
    /// Capability flags shared by the category.
    pub flags: FlagSet<Capability>,
    /// Kind flags, unioned into every owned template at finalize.
    pub kind_flags: FlagSet<KindFlag>,
    /// Per-element ignore/hate markers.
    pub elements: ElementInfoSet,
    /// Number of template variants seen under this category so far.
    pub num_variants: u32,
}

/// File-level defaults seeded into each new record.
#[derive(Clone, Copy, Debug, Default)]
struct Defaults {
    break_chance: i32,
}

/// Builder state for the category file.
#[derive(Debug, Default)]
pub struct Builder {
    defaults: Defaults,
    records: Vec<Category>,
}

impl Builder {
    fn current(&mut self) -> Result<&mut Category> {
        self.records.last_mut().ok_or_else(Error::missing_record_header)
    }

    fn on_default(&mut self, values: &Values) -> Result<()> {
        let label = values.get_sym("label")?;
        if label != "break-chance" {
            return Err(ErrorKind::UndefinedDirective(label.to_string()).into());
        }
        self.defaults.break_chance = narrow(values.get_int("value")?);
        Ok(())
    }

    fn on_name(&mut self, values: &Values) -> Result<()> {
        let token = values.get_sym("tval")?;
        let code = CategoryCode::from_name(token)
            .ok_or_else(|| ErrorKind::UnrecognisedCategory(token.to_string()))?;

        let name = if values.has("name") {
            Some(values.get_str("name")?.to_string())
        } else {
            None
        };

        self.records.push(Category {
            code,
            name,
            break_chance: self.defaults.break_chance,
            ..Category::default()
        });
        Ok(())
    }

    fn on_graphics(&mut self, values: &Values) -> Result<()> {
        let color = Color::from_token(values.get_sym("color")?);
        self.current()?.color = color;
        Ok(())
    }

    fn on_break(&mut self, values: &Values) -> Result<()> {
        let chance = narrow(values.get_int("breakage")?);
        self.current()?.break_chance = chance;
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

    /// Freezes the build list into the fixed-size, code-indexed table.
    ///
    /// A later record for the same code replaces an earlier one.
    #[must_use]
    pub fn finalize(self) -> Vec<Category> {
        let mut table: Vec<Category> = (0..CategoryCode::COUNT)
            .map(|_| Category::default())
            .collect();
        for record in self.records {
            let index = record.code.index();
            table[index] = record;
        }
        table
    }
}

/// Builds the directive parser for the category file.
///
/// # Errors
/// Registration strings are constants; an error here is a defect.
pub fn parser() -> Result<Parser<Builder>> {
    let mut p = Parser::new(Builder::default());
    p.register("default sym label int value", Builder::on_default)?;
    p.register("name sym tval ?str name", Builder::on_name)?;
    p.register("graphics sym color", Builder::on_graphics)?;
    p.register("break int breakage", Builder::on_break)?;
    p.register("flags str flags", Builder::on_flags)?;
    Ok(p)
}

/// Looks up a category record by code in a finalized table.
#[must_use]
pub fn by_code(table: &[Category], code: CategoryCode) -> &Category {
    &table[code.index()]
}

/// Finds a category code by display name in a finalized table.
#[must_use]
pub fn code_by_name(table: &[Category], name: &str) -> Option<CategoryCode> {
    table
        .iter()
        .find(|c| c.name.as_deref() == Some(name))
        .map(|c| c.code)
}
