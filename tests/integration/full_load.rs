//! Full load-sequence tests, from definition files on disk to the frozen
//! registry.

use std::fs;
use std::path::PathBuf;

use loreforge::codex::{bane, Codex, LoadConfig};
use loreforge::foundation::{CategoryCode, Color, ErrorKind};

const CATEGORY: &str = "\
default break-chance 10
name sword Sword
flags SHOW_DICE
name light Light
break 50
name ring Ring
name none
";

const BANE: &str = "\
code ORC_2x
name orcs
creature-flag ORC
multiplier 2
power 10
melee-verb smite
code DRAGON_3x
creature-flag DRAGON
multiplier 3
power 20
";

const SCOURGE: &str = "\
code FIRE
name burns
verb burn
multiplier 2
power 15
resist-flag IM_FIRE
";

const CURSE: &str = "\
name Teleportation
type sword
type ring
combat -5 0 0
effect TELEPORT
dice 10
time 1d100
desc teleports you randomly.
name Rust
type sword
";

const POWER: &str = "\
name CLAIRVOYANCE
power 10
effect MAP_AREA
msg The world comes into view.
name FIRE_BOLT
aim 1
effect BOLT FIRE
dice 9d8
";

const TEMPLATE: &str = "\
name 1 <curse object>
type none
name 2 Dagger
type sword
graphics | w
properties 1 1 10
combat 0 1d4 0 0 0
alloc 20 1 to 10
bane ORC_2x
curse Rust 5
name 3 Longsword
type sword
properties 10 30 300
name 4 Gold
type ring
";

const SUFFIX: &str = "\
name 1 of Slay Dragon
info 1000 18
alloc 30 10 to 100
type sword
combat 1d5 1d5 0
bane DRAGON_3x
name 2 of Burning
item sword Dagger
scourge FIRE
";

const RELIC: &str = "\
name 1 Ringil
base-object sword Longsword
info 20 30 50000
alloc 5 20 to 127
flags SUST_STR | IGNORE_COLD
act FIRE_BOLT
time 1d30
name 2 Phial
base-object light Phial
graphics ~ y
";

fn write_data_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("loreforge-data-{}-{tag}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    for (name, source) in [
        ("category", CATEGORY),
        ("bane", BANE),
        ("scourge", SCOURGE),
        ("curse", CURSE),
        ("power", POWER),
        ("template", TEMPLATE),
        ("suffix", SUFFIX),
        ("relic", RELIC),
    ] {
        fs::write(dir.join(format!("{name}.txt")), source).unwrap();
    }
    dir
}

fn load(tag: &str) -> Codex {
    let data_dir = write_data_dir(tag);
    let config = LoadConfig {
        data_dir: data_dir.clone(),
        creatures: vec!["kobold".to_string()],
    };
    let codex = Codex::load(&config).unwrap();
    fs::remove_dir_all(&data_dir).ok();
    codex
}

// =============================================================================
// The Whole Sequence
// =============================================================================

#[test]
fn all_tables_load() {
    let codex = load("all-tables");

    assert_eq!(codex.banes.count(), 2);
    assert_eq!(codex.scourges.count(), 1);
    assert_eq!(codex.afflictions.count(), 2);
    assert_eq!(codex.powers.count(), 2);
    // Three explicit templates, the affliction carrier, and the Phial dummy.
    assert_eq!(codex.templates.count(), 5);
    assert_eq!(codex.suffixes.count(), 2);
    assert_eq!(codex.relics.count(), 2);
}

#[test]
fn cross_references_resolve_by_table_slot() {
    let codex = load("cross-refs");

    let orc_slot = bane::find_code(&codex.banes, "ORC_2x").unwrap();
    let dagger = codex.template_by_pair(CategoryCode::Sword, 1).unwrap();
    assert!(dagger.banes[orc_slot as usize]);

    // "curse Rust 5" lands in Rust's affliction slot.
    let rust_slot = codex
        .afflictions
        .iter_with_identity()
        .find(|(_, a)| a.name == "Rust")
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(dagger.afflictions[rust_slot as usize], 5);
}

#[test]
fn suffix_applicability_lists() {
    let codex = load("suffix-lists");

    // "type sword" admits every sword template by identity.
    let slay_dragon = codex.suffixes.get(1).unwrap();
    assert_eq!(slay_dragon.possible, vec![2, 3]);

    // "item sword Dagger" admits exactly that template.
    let burning = codex.suffixes.get(2).unwrap();
    assert_eq!(burning.possible, vec![2]);
}

#[test]
fn relics_bind_powers_and_instance_dummies() {
    let codex = load("relics");

    let ringil = codex.relics.get(1).unwrap();
    assert_eq!(ringil.category, CategoryCode::Sword);
    assert_eq!(ringil.variant, 2);
    assert_eq!(ringil.power, Some(1));

    // The Phial had no template, so one was instanced and its graphics
    // overridden by the relic record.
    let phial = codex.template_by_pair(CategoryCode::Light, 1).unwrap();
    assert_eq!(phial.name, "& Phial~");
    assert_eq!(phial.glyph, '~');
    assert_eq!(phial.color, Color::Yellow);
    assert_eq!(phial.break_chance, 50);
}

#[test]
fn afflictions_are_backfilled_with_the_carrier() {
    let codex = load("backfill");

    let carrier = codex
        .variant_by_display_name(CategoryCode::None, "<curse object>")
        .unwrap();
    for (_, affliction) in codex.afflictions.iter_with_identity() {
        assert_eq!(
            affliction.item.classification,
            Some((CategoryCode::None, carrier))
        );
        let known = affliction.item.known.as_deref().unwrap();
        assert_eq!(known.classification, Some((CategoryCode::None, carrier)));
    }
}

#[test]
fn templates_inherit_category_state_at_finalize() {
    let codex = load("inherit");

    let dagger = codex.template_by_pair(CategoryCode::Sword, 1).unwrap();
    assert_eq!(dagger.break_chance, 10);
    assert!(dagger
        .kind_flags
        .contains(loreforge::codex::KindFlag::ShowDice));

    let gold = codex.template_by_pair(CategoryCode::Ring, 1).unwrap();
    assert_eq!(gold.break_chance, 10);
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn bad_lines_report_file_and_line() {
    let data_dir = write_data_dir("bad-line");
    fs::write(
        data_dir.join("scourge.txt"),
        "code FIRE\nmultiplier nine\n",
    )
    .unwrap();

    let config = LoadConfig {
        data_dir: data_dir.clone(),
        creatures: Vec::new(),
    };
    let err = Codex::load(&config).unwrap_err();
    fs::remove_dir_all(&data_dir).ok();

    assert!(matches!(err.kind, ErrorKind::FieldTypeMismatch { .. }));
    let ctx = err.context.expect("context was attached");
    assert!(ctx.file.unwrap().ends_with("scourge.txt"));
    assert_eq!(ctx.line, Some(2));
}

#[test]
fn out_of_range_allocation_is_rejected() {
    let data_dir = write_data_dir("bad-alloc");
    let mut relic = RELIC.to_string();
    relic = relic.replace("alloc 5 20 to 127", "alloc 5 20 to 300");
    fs::write(data_dir.join("relic.txt"), relic).unwrap();

    let config = LoadConfig {
        data_dir: data_dir.clone(),
        creatures: Vec::new(),
    };
    let err = Codex::load(&config).unwrap_err();
    fs::remove_dir_all(&data_dir).ok();

    assert!(matches!(err.kind, ErrorKind::OutOfBounds(_)));
}
