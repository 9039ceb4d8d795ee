//! Dice-expression and named-variable-expression mini-languages.
//!
//! This crate provides:
//! - [`Dice`] - The dice mini-language with `$NAME` variables and bound
//!   expressions (`"$B+$Dd$S"`, `"1+2d4"`, `"1d6M10"`)
//! - [`Expression`] - A base-value function plus arithmetic operations,
//!   bindable to a dice variable
//! - [`Random`] - The plain numeric-range type used by `rand`-typed
//!   directive fields

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dice;
pub mod expression;
pub mod random;

pub use dice::Dice;
pub use expression::{BaseValue, EvalContext, Expression, NullContext};
pub use random::Random;
