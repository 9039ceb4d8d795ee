//! The load sequence and the frozen [`Codex`] registry.
//!
//! Kinds load in a fixed dependency order: categories, banes, scourges,
//! afflictions, powers, templates, suffixes, relics, then the affliction
//! back-fill. Each kind is fully parsed and finalized before the next
//! begins, because later builders resolve references against earlier
//! finished tables. Loading is single-shot: build once, freeze, read many;
//! dropping the `Codex` is the teardown.

use std::path::PathBuf;

use loreforge_foundation::{CategoryCode, Error, Result};

use crate::affliction::{self, Affliction, BonusItem};
use crate::bane::{self, Bane};
use crate::category::{self, Category};
use crate::power::{self, Power};
use crate::relic::{self, Relic};
use crate::scourge::{self, Scourge};
use crate::suffix::{self, Suffix};
use crate::table::Table;
use crate::template::{self, Template};

/// The display name of the reserved template afflictions classify under.
const AFFLICTION_OBJECT_NAME: &str = "<curse object>";

/// Configuration for one load sequence.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Directory holding the definition files.
    pub data_dir: PathBuf,
    /// The creature-category directory bane `creature` directives validate
    /// against.
    pub creatures: Vec<String>,
}

/// In-memory definition sources, for driving a load without a filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sources<'a> {
    /// Category definitions.
    pub category: &'a str,
    /// Bane definitions.
    pub bane: &'a str,
    /// Scourge definitions.
    pub scourge: &'a str,
    /// Affliction definitions.
    pub affliction: &'a str,
    /// Power definitions.
    pub power: &'a str,
    /// Template definitions.
    pub template: &'a str,
    /// Suffix definitions.
    pub suffix: &'a str,
    /// Relic definitions.
    pub relic: &'a str,
}

/// The frozen registry of all finished tables.
#[derive(Clone, Debug)]
pub struct Codex {
    /// Fixed-size category table, indexed by [`CategoryCode`].
    pub categories: Vec<Category>,
    /// Sequential bane table.
    pub banes: Table<Bane>,
    /// Sequential scourge table.
    pub scourges: Table<Scourge>,
    /// Sequential affliction table.
    pub afflictions: Table<Affliction>,
    /// Sequential power table.
    pub powers: Table<Power>,
    /// Identity-indexed template table.
    pub templates: Table<Template>,
    /// Identity-indexed suffix table.
    pub suffixes: Table<Suffix>,
    /// Identity-indexed relic table.
    pub relics: Table<Relic>,
}

impl Codex {
    /// Runs the full load sequence from a data directory.
    ///
    /// # Errors
    /// A missing file is the fatal [`FileNotFound`]; any grammar or
    /// semantic error aborts the sequence, decorated with file and line.
    ///
    /// [`FileNotFound`]: loreforge_foundation::ErrorKind::FileNotFound
    pub fn load(config: &LoadConfig) -> Result<Self> {
        let file = |name: &str| config.data_dir.join(format!("{name}.txt"));

        let mut categories = {
            let mut p = category::parser()?;
            p.parse_file(&file("category"))?;
            p.into_state().finalize()
        };

        let banes = {
            let mut p = bane::parser(&config.creatures)?;
            p.parse_file(&file("bane"))?;
            p.into_state().finalize()
        };

        let scourges = {
            let mut p = scourge::parser()?;
            p.parse_file(&file("scourge"))?;
            p.into_state().finalize()
        };

        let mut afflictions = {
            let mut p = affliction::parser()?;
            p.parse_file(&file("curse"))?;
            p.into_state().finalize()
        };

        let powers = {
            let mut p = power::parser()?;
            p.parse_file(&file("power"))?;
            p.into_state().finalize()
        };

        let mut templates = {
            let mut p = template::parser(&mut categories, &banes, &scourges, &afflictions)?;
            p.parse_file(&file("template"))?;
            p.into_state().finalize()
        };

        let suffixes = {
            let mut p = suffix::parser(&templates, &banes, &scourges, &afflictions)?;
            p.parse_file(&file("suffix"))?;
            p.into_state().finalize()
        };

        let relics = {
            let mut p = relic::parser(
                &mut templates,
                &mut categories,
                &banes,
                &scourges,
                &afflictions,
                &powers,
            )?;
            p.parse_file(&file("relic"))?;
            p.into_state().finalize()
        };

        backfill_affliction_items(&mut afflictions, &templates)?;

        Ok(Self {
            categories,
            banes,
            scourges,
            afflictions,
            powers,
            templates,
            suffixes,
            relics,
        })
    }

    /// Runs the full load sequence from in-memory sources.
    ///
    /// # Errors
    /// Same as [`Codex::load`], minus the file I/O failures.
    pub fn load_from_sources(creatures: &[String], sources: Sources<'_>) -> Result<Self> {
        let mut categories = {
            let mut p = category::parser()?;
            p.parse_str(sources.category)?;
            p.into_state().finalize()
        };

        let banes = {
            let mut p = bane::parser(creatures)?;
            p.parse_str(sources.bane)?;
            p.into_state().finalize()
        };

        let scourges = {
            let mut p = scourge::parser()?;
            p.parse_str(sources.scourge)?;
            p.into_state().finalize()
        };

        let mut afflictions = {
            let mut p = affliction::parser()?;
            p.parse_str(sources.affliction)?;
            p.into_state().finalize()
        };

        let powers = {
            let mut p = power::parser()?;
            p.parse_str(sources.power)?;
            p.into_state().finalize()
        };

        let mut templates = {
            let mut p = template::parser(&mut categories, &banes, &scourges, &afflictions)?;
            p.parse_str(sources.template)?;
            p.into_state().finalize()
        };

        let suffixes = {
            let mut p = suffix::parser(&templates, &banes, &scourges, &afflictions)?;
            p.parse_str(sources.suffix)?;
            p.into_state().finalize()
        };

        let relics = {
            let mut p = relic::parser(
                &mut templates,
                &mut categories,
                &banes,
                &scourges,
                &afflictions,
                &powers,
            )?;
            p.parse_str(sources.relic)?;
            p.into_state().finalize()
        };

        backfill_affliction_items(&mut afflictions, &templates)?;

        Ok(Self {
            categories,
            banes,
            scourges,
            afflictions,
            powers,
            templates,
            suffixes,
            relics,
        })
    }

    /// Looks up a template by (category, variant) pair.
    #[must_use]
    pub fn template_by_pair(&self, category: CategoryCode, variant: u32) -> Option<&Template> {
        template::lookup(&self.templates, category, variant)
    }

    /// Finds a category code by display name.
    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<CategoryCode> {
        category::code_by_name(&self.categories, name)
    }

    /// Finds a variant number by category and template display name.
    #[must_use]
    pub fn variant_by_display_name(&self, category: CategoryCode, name: &str) -> Option<u32> {
        template::variant_by_display_name(&self.templates, category, name)
    }

    /// The category record for a code.
    #[must_use]
    pub fn category(&self, code: CategoryCode) -> &Category {
        category::by_code(&self.categories, code)
    }
}

/// Gives every affliction's embedded item the shared synthetic
/// classification and an owned known-state clone.
///
/// The classification is the reserved `none` category's affliction-object
/// variant, which the template file must define when any afflictions exist.
///
/// # Errors
/// Returns [`Internal`] when afflictions exist but the reserved template
/// does not.
///
/// [`Internal`]: loreforge_foundation::ErrorKind::Internal
pub fn backfill_affliction_items(
    afflictions: &mut Table<Affliction>,
    templates: &Table<Template>,
) -> Result<()> {
    if afflictions.count() == 0 {
        return Ok(());
    }

    let variant = template::variant_by_display_name(
        templates,
        CategoryCode::None,
        AFFLICTION_OBJECT_NAME,
    )
    .ok_or_else(|| Error::internal("no reserved affliction-object template"))?;
    let classification = Some((CategoryCode::None, variant));

    for affliction in afflictions.iter_mut() {
        affliction.item.classification = classification;
        affliction.item.known = Some(Box::new(BonusItem {
            classification,
            ..BonusItem::default()
        }));
    }
    Ok(())
}
