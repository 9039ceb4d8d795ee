//! Relic loading and dummy-template synthesis tests.

use loreforge_codex::{Codex, Element, KindFlag, Sources};
use loreforge_foundation::{CategoryCode, Color};

const CATEGORIES: &str = "name sword Sword\nname light Light\nname none\n";
const TEMPLATES: &str = "name 1 Dagger\ntype sword\n";

// =============================================================================
// Existing Bases
// =============================================================================

#[test]
fn relic_binds_to_an_existing_template() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Sting\nbase-object sword Dagger\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    let sting = codex.relics.get(1).unwrap();
    assert_eq!(sting.category, CategoryCode::Sword);
    assert_eq!(sting.variant, 1);
    assert_eq!(codex.templates.count(), 1);
}

// =============================================================================
// Dummy Synthesis
// =============================================================================

#[test]
fn missing_base_synthesizes_one_dummy() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Grond\nbase-object sword Greathammer\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    assert_eq!(codex.templates.count(), 2);
    let grond = codex.relics.get(1).unwrap();
    assert_eq!(grond.variant, 2);

    let dummy = codex
        .template_by_pair(CategoryCode::Sword, 2)
        .expect("dummy exists");
    assert_eq!(dummy.name, "& Greathammer~");
    assert_eq!(dummy.glyph, '*');
    assert_eq!(dummy.color, Color::Red);
    assert!(dummy.kind_flags.contains(KindFlag::InstantRelic));
    assert_eq!(codex.categories[CategoryCode::Sword.index()].num_variants, 2);
}

#[test]
fn repeated_missing_base_synthesizes_again() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Grond\nbase-object sword Whirlwind\n\
                name 2 Gromp\nbase-object sword Whirlwind\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    // No dedup: each reference to the missing pair makes its own template.
    assert_eq!(codex.templates.count(), 3);
    assert_eq!(codex.relics.get(1).unwrap().variant, 2);
    assert_eq!(codex.relics.get(2).unwrap().variant, 3);
    assert_eq!(codex.categories[CategoryCode::Sword.index()].num_variants, 3);
}

#[test]
fn graphics_override_rewrites_the_dummy() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Phial\nbase-object light Phial\ngraphics ~ y\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    let dummy = codex
        .template_by_pair(CategoryCode::Light, 1)
        .expect("dummy exists");
    assert_eq!(dummy.glyph, '~');
    assert_eq!(dummy.color, Color::Yellow);
}

#[test]
fn graphics_override_requires_an_instanced_template() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Sting\nbase-object sword Dagger\ngraphics | w\n",
        ..Sources::default()
    };
    let err = Codex::load_from_sources(&[], sources).unwrap_err();
    assert!(matches!(
        err.kind,
        loreforge_foundation::ErrorKind::NotInstancedRelic
    ));
}

// =============================================================================
// Header Defaults
// =============================================================================

#[test]
fn base_elements_start_out_ignored() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        relic: "name 1 Sting\nbase-object sword Dagger\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    let sting = codex.relics.get(1).unwrap();
    for element in Element::BASE {
        assert!(sting.elements.get(element).ignore, "{element:?}");
    }
    assert!(!sting.elements.get(Element::Poison).ignore);
}

#[test]
fn unknown_power_name_is_left_unbound() {
    let sources = Sources {
        category: CATEGORIES,
        template: TEMPLATES,
        power: "name FIRE_BOLT\n",
        relic: "name 1 Sting\nbase-object sword Dagger\nact GLOW\n\
                name 2 Narsil\nbase-object sword Dagger\nact FIRE_BOLT\n",
        ..Sources::default()
    };
    let codex = Codex::load_from_sources(&[], sources).unwrap();

    assert!(codex.relics.get(1).unwrap().power.is_none());
    assert_eq!(codex.relics.get(2).unwrap().power, Some(1));
}
