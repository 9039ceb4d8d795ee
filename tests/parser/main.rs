//! Integration tests for the loreforge_parser crate.
//!
//! Tests for the directive-grammar engine:
//! - Registration and dispatch
//! - Field typing and optional fields
//! - Whole-source and whole-file parsing with error decoration

mod directive_tests;
mod source_tests;
