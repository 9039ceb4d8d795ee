//! Template building and cross-reference tests.

use loreforge_codex::{
    affliction, bane, category, scourge, template, Affliction, Bane, Capability, Category,
    Scourge, Table,
};
use loreforge_foundation::{CategoryCode, ErrorKind};

struct Kinds {
    categories: Vec<Category>,
    banes: Table<Bane>,
    scourges: Table<Scourge>,
    afflictions: Table<Affliction>,
}

fn kinds() -> Kinds {
    let mut cp = category::parser().unwrap();
    cp.parse_str(
        "default break-chance 10\n\
         name sword Sword\n\
         name shield Shield\n\
         break 2\n\
         name none\n",
    )
    .unwrap();
    let categories = cp.into_state().finalize();

    let banes = {
        let mut p = bane::parser(&[]).unwrap();
        p.parse_str("code EVIL_2x\ncode UNDEAD_3x\n").unwrap();
        p.into_state().finalize()
    };
    let scourges = {
        let mut p = scourge::parser().unwrap();
        p.parse_str("code FIRE\n").unwrap();
        p.into_state().finalize()
    };
    let afflictions = {
        let mut p = affliction::parser().unwrap();
        p.parse_str("name Rust\ntype sword\n").unwrap();
        p.into_state().finalize()
    };

    Kinds {
        categories,
        banes,
        scourges,
        afflictions,
    }
}

// =============================================================================
// The Dagger Example
// =============================================================================

#[test]
fn dagger_end_to_end() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 5 Dagger\ntype sword\nproperties 1 1 10\n")
        .unwrap();
    let table = p.into_state().finalize();

    let dagger = table.get(5).unwrap();
    assert_eq!(dagger.name, "Dagger");
    assert_eq!(dagger.category, CategoryCode::Sword);
    assert_eq!(dagger.variant, 1);
    assert_eq!((dagger.level, dagger.weight, dagger.cost), (1, 1, 10));

    // Breakage comes down from the category when the table freezes.
    assert_eq!(dagger.break_chance, 10);
}

#[test]
fn per_record_break_overrides_the_default() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 1 Buckler\ntype shield\n").unwrap();
    let table = p.into_state().finalize();

    assert_eq!(table.get(1).unwrap().break_chance, 2);
}

// =============================================================================
// Variant Numbering
// =============================================================================

#[test]
fn variants_count_up_per_category() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str(
        "name 1 Dagger\ntype sword\n\
         name 2 Buckler\ntype shield\n\
         name 3 Rapier\ntype sword\n\
         name 4 Claymore\ntype sword\n",
    )
    .unwrap();
    let table = p.into_state().finalize();

    assert_eq!(table.get(1).unwrap().variant, 1);
    assert_eq!(table.get(3).unwrap().variant, 2);
    assert_eq!(table.get(4).unwrap().variant, 3);
    assert_eq!(table.get(2).unwrap().variant, 1);

    assert_eq!(k.categories[CategoryCode::Sword.index()].num_variants, 3);
    assert_eq!(k.categories[CategoryCode::Shield.index()].num_variants, 1);
}

// =============================================================================
// Cross-References
// =============================================================================

#[test]
fn affliction_reference_sets_the_power_slot() {
    let mut k = kinds();
    let rust_slot = affliction::find_name(&k.afflictions, "Rust").unwrap();

    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 1 Dagger\ntype sword\ncurse Rust 5\n")
        .unwrap();
    let table = p.into_state().finalize();

    let dagger = table.get(1).unwrap();
    assert_eq!(dagger.afflictions.len(), k.afflictions.capacity());
    assert_eq!(dagger.afflictions[rust_slot as usize], 5);
    for (slot, power) in dagger.afflictions.iter().enumerate() {
        if slot != rust_slot as usize {
            assert_eq!(*power, 0);
        }
    }
}

#[test]
fn unknown_affliction_reference_fails() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 1 Dagger\ntype sword\n").unwrap();
    let err = p.parse_line("curse Tarnish 5").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnrecognisedAffliction(_)));
}

#[test]
fn bane_references_mark_the_slot() {
    let mut k = kinds();
    let evil = bane::find_code(&k.banes, "EVIL_2x").unwrap();

    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 1 Dagger\ntype sword\nbane EVIL_2x\n")
        .unwrap();
    let table = p.into_state().finalize();

    let dagger = table.get(1).unwrap();
    assert_eq!(dagger.banes.len(), k.banes.capacity());
    assert!(dagger.banes[evil as usize]);

    // No scourge was referenced, so that set stays unallocated.
    assert!(dagger.scourges.is_empty());
}

// =============================================================================
// Flag Streams
// =============================================================================

#[test]
fn flag_stream_stops_at_the_first_unknown_token() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str("name 1 Dagger\ntype sword\n").unwrap();

    let err = p
        .parse_line("flags SUST_STR | WIBBLE | SUST_DEX")
        .unwrap_err();
    match err.kind {
        ErrorKind::InvalidFlag(token) => assert_eq!(token, "WIBBLE"),
        other => panic!("unexpected error kind {other:?}"),
    }

    // Retrying the same malformed line yields the same error.
    let retry = p
        .parse_line("flags SUST_STR | WIBBLE | SUST_DEX")
        .unwrap_err();
    match retry.kind {
        ErrorKind::InvalidFlag(token) => assert_eq!(token, "WIBBLE"),
        other => panic!("unexpected error kind {other:?}"),
    }

    // Tokens before the failure point were applied; tokens after were not.
    let table = p.into_state().finalize();
    let dagger = table.get(1).unwrap();
    assert!(dagger.flags.contains(Capability::SustainStrength));
    assert!(!dagger.flags.contains(Capability::SustainDexterity));
}

// =============================================================================
// Effect Chains
// =============================================================================

#[test]
fn expr_before_dice_is_a_quiet_no_op() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str(
        "name 1 Wand of Wonder\ntype sword\n\
         effect HEAL_HP\n\
         expr B PLAYER_HP / 100\n",
    )
    .unwrap();
    let table = p.into_state().finalize();

    let wand = table.get(1).unwrap();
    assert_eq!(wand.effects.len(), 1);
    assert!(wand.effects[0].dice.is_none());
}

#[test]
fn expr_after_dice_binds() {
    let mut k = kinds();
    let mut p =
        template::parser(&mut k.categories, &k.banes, &k.scourges, &k.afflictions).unwrap();
    p.parse_str(
        "name 1 Wand of Wonder\ntype sword\n\
         effect HEAL_HP\n\
         dice $Bd4\n\
         expr B PLAYER_HP / 100\n",
    )
    .unwrap();
    let table = p.into_state().finalize();

    let dice = table.get(1).unwrap().effects[0].dice.as_ref().unwrap();
    assert!(dice.has_variables());
}
