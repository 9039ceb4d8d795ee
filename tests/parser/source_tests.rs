//! Whole-source and whole-file parsing tests.

use std::fs;
use std::path::PathBuf;

use loreforge_foundation::{ErrorKind, Result};
use loreforge_parser::{Parser, Values};

#[derive(Default)]
struct Sink {
    codes: Vec<String>,
}

impl Sink {
    fn on_code(&mut self, values: &Values) -> Result<()> {
        self.codes.push(values.get_str("code")?.to_string());
        Ok(())
    }
}

fn parser() -> Parser<Sink> {
    let mut p = Parser::new(Sink::default());
    p.register("code str code", Sink::on_code).unwrap();
    p
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("loreforge-test-{}-{name}", std::process::id()))
}

// =============================================================================
// Source Parsing
// =============================================================================

#[test]
fn blank_lines_and_comments_are_skipped() {
    let mut p = parser();
    p.parse_str("# header comment\n\ncode ORC\n   \n# trailing\ncode TROLL\n")
        .unwrap();
    assert_eq!(p.into_state().codes, vec!["ORC", "TROLL"]);
}

#[test]
fn errors_carry_the_line_number() {
    let mut p = parser();
    let err = p.parse_str("code ORC\ncode TROLL\nbogus 1\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UndefinedDirective(_)));
    assert_eq!(err.context.and_then(|c| c.line), Some(3));
}

#[test]
fn indented_lines_are_trimmed() {
    let mut p = parser();
    p.parse_str("  code ORC\n").unwrap();
    assert_eq!(p.into_state().codes, vec!["ORC"]);
}

// =============================================================================
// File Parsing
// =============================================================================

#[test]
fn missing_file_is_file_not_found() {
    let mut p = parser();
    let err = p
        .parse_file(&temp_path("does-not-exist.txt"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FileNotFound(_)));
}

#[test]
fn file_errors_carry_file_and_line() {
    let path = temp_path("decoration.txt");
    fs::write(&path, "code ORC\nbogus 1\n").unwrap();

    let mut p = parser();
    let err = p.parse_file(&path).unwrap_err();
    fs::remove_file(&path).ok();

    let ctx = err.context.expect("context was attached");
    assert!(ctx.file.expect("file name").ends_with("decoration.txt"));
    assert_eq!(ctx.line, Some(2));
}

#[test]
fn whole_file_parses() {
    let path = temp_path("whole.txt");
    fs::write(&path, "# comment\ncode ORC\ncode TROLL\n").unwrap();

    let mut p = parser();
    p.parse_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(p.into_state().codes, vec!["ORC", "TROLL"]);
}
