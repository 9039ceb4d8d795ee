//! Directive registration and dispatch tests.

use loreforge_dice::Random;
use loreforge_foundation::{ErrorKind, Result};
use loreforge_parser::{Parser, Values};

/// A sink state that records what each handler saw.
#[derive(Default)]
struct Sink {
    names: Vec<String>,
    levels: Vec<i64>,
    glyphs: Vec<char>,
    ranges: Vec<Random>,
    notes: Vec<String>,
}

impl Sink {
    fn on_name(&mut self, values: &Values) -> Result<()> {
        self.names.push(values.get_str("name")?.to_string());
        Ok(())
    }

    fn on_depth(&mut self, values: &Values) -> Result<()> {
        self.levels.push(values.get_int("level")?);
        Ok(())
    }

    fn on_glyph(&mut self, values: &Values) -> Result<()> {
        self.glyphs.push(values.get_char("glyph")?);
        Ok(())
    }

    fn on_dice(&mut self, values: &Values) -> Result<()> {
        self.ranges.push(values.get_rand("hd")?);
        Ok(())
    }

    fn on_note(&mut self, values: &Values) -> Result<()> {
        let kind = values.get_sym("kind")?;
        let text = if values.has("text") {
            values.get_str("text")?
        } else {
            ""
        };
        self.notes.push(format!("{kind}:{text}"));
        Ok(())
    }
}

fn parser() -> Parser<Sink> {
    let mut p = Parser::new(Sink::default());
    p.register("name str name", Sink::on_name).unwrap();
    p.register("depth int level", Sink::on_depth).unwrap();
    p.register("glyph char glyph", Sink::on_glyph).unwrap();
    p.register("dice rand hd", Sink::on_dice).unwrap();
    p.register("note sym kind ?str text", Sink::on_note).unwrap();
    p
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn lines_dispatch_to_their_handlers() {
    let mut p = parser();
    p.parse_line("name Long Sword").unwrap();
    p.parse_line("depth 12").unwrap();
    p.parse_line("glyph |").unwrap();

    let sink = p.into_state();
    assert_eq!(sink.names, vec!["Long Sword"]);
    assert_eq!(sink.levels, vec![12]);
    assert_eq!(sink.glyphs, vec!['|']);
}

#[test]
fn unknown_keyword_is_undefined() {
    let mut p = parser();
    let err = p.parse_line("weight 3").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndefinedDirective(_)));
}

// =============================================================================
// Field Typing
// =============================================================================

#[test]
fn str_fields_consume_the_rest_of_the_line() {
    let mut p = parser();
    p.parse_line("name Ring of Speed: the fast one").unwrap();
    assert_eq!(p.into_state().names, vec!["Ring of Speed: the fast one"]);
}

#[test]
fn int_fields_reject_non_numbers() {
    let mut p = parser();
    let err = p.parse_line("depth deep").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::FieldTypeMismatch { expected: "int", .. }
    ));
}

#[test]
fn char_fields_are_exactly_one_character() {
    let mut p = parser();
    assert!(p.parse_line("glyph ab").is_err());
    assert!(p.parse_line("glyph *").is_ok());
}

#[test]
fn rand_fields_parse_dice_strings() {
    let mut p = parser();
    p.parse_line("dice 2d6").unwrap();
    let r = p.into_state().ranges[0];
    assert_eq!((r.base, r.dice, r.sides), (0, 2, 6));
}

#[test]
fn missing_required_field_is_an_error() {
    let mut p = parser();
    let err = p.parse_line("depth").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField(_)));
}

#[test]
fn optional_fields_may_be_absent() {
    let mut p = parser();
    p.parse_line("note warning the floor is lava").unwrap();
    p.parse_line("note warning").unwrap();

    let sink = p.into_state();
    assert_eq!(sink.notes, vec!["warning:the floor is lava", "warning:"]);
}
