//! Bane target-selection tests.
//!
//! A bane targets either a creature flag or a named creature category,
//! never both; a bane with neither is accepted but matches nothing.

use loreforge_codex::bane::{self, BaneTarget};
use loreforge_foundation::{CreatureFlag, ErrorKind};

fn directory() -> Vec<String> {
    vec!["kobold".to_string(), "wyrm".to_string()]
}

#[test]
fn flag_target() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code EVIL_2x\ncreature-flag EVIL\nmultiplier 2\n")
        .unwrap();
    let table = p.into_state().finalize();

    let bane = table.get(1).unwrap();
    assert_eq!(bane.target, Some(BaneTarget::Flag(CreatureFlag::Evil)));
    assert_eq!(bane.multiplier, 2);
}

#[test]
fn creature_category_target() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code KOBOLD_3x\ncreature kobold\n").unwrap();
    let table = p.into_state().finalize();

    assert_eq!(
        table.get(1).unwrap().target,
        Some(BaneTarget::Category("kobold".to_string()))
    );
}

#[test]
fn both_selectors_is_an_error() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code EVIL_2x\ncreature-flag EVIL\n").unwrap();
    let err = p.parse_line("creature kobold").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidBane));

    // The same error in the other order.
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code KOBOLD_3x\ncreature kobold\n").unwrap();
    let err = p.parse_line("creature-flag EVIL").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidBane));
}

#[test]
fn neither_selector_is_accepted_but_inert() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code BLUNT_2x\nmultiplier 2\npower 8\n").unwrap();
    let table = p.into_state().finalize();

    let bane = table.get(1).unwrap();
    assert!(bane.target.is_none());
    assert_eq!(bane.power, 8);
}

#[test]
fn unknown_creature_category_is_rejected() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code DODO_5x\n").unwrap();
    let err = p.parse_line("creature dodo").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnrecognisedCreature(_)));
}

#[test]
fn codes_resolve_against_the_finished_table() {
    let directory = directory();
    let mut p = bane::parser(&directory).unwrap();
    p.parse_str("code EVIL_2x\ncode UNDEAD_3x\n").unwrap();
    let table = p.into_state().finalize();

    assert_eq!(bane::find_code(&table, "EVIL_2x").unwrap(), 2);
    assert_eq!(bane::find_code(&table, "UNDEAD_3x").unwrap(), 1);
    assert!(bane::find_code(&table, "DRAGON_5x").is_err());
}
