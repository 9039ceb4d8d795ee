//! Loreforge - declarative game-entity definition loader
//!
//! This crate re-exports all layers of the Loreforge system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: loreforge_codex      — Record builders, finalized tables, Codex
//! Layer 1: loreforge_parser     — Directive-grammar engine
//!          loreforge_dice       — Dice and named-expression mini-languages
//! Layer 0: loreforge_foundation — Errors, fixed enumerations, colors
//! ```
//!
//! The typical entry point is [`codex::Codex::load`], which parses every
//! definition file in a data directory in the fixed dependency order and
//! returns the frozen, cross-referenced tables.

pub use loreforge_codex as codex;
pub use loreforge_dice as dice;
pub use loreforge_foundation as foundation;
pub use loreforge_parser as parser;
