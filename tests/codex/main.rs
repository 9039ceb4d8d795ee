//! Integration tests for the loreforge_codex crate.
//!
//! Tests for the record builders and finalized tables:
//! - Table shape invariants (sentinel slot, numbering)
//! - Bane target selection rules
//! - Template building, cross-references, and finalize-time inheritance
//! - Relic dummy-template synthesis

mod bane_tests;
mod relic_tests;
mod template_tests;
