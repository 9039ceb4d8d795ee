//! Integration tests for the loreforge_dice crate.
//!
//! Tests for the two mini-languages:
//! - Dice strings with `$NAME` variables and bound expressions
//! - Plain numeric ranges as used by `rand`-typed directive fields

mod dice_tests;
mod random_tests;
