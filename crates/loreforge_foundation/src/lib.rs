//! Error types and fixed enumerations for Loreforge.
//!
//! This crate provides:
//! - [`Error`] / [`ErrorKind`] - Rich error types with file/line context
//! - [`CategoryCode`] - The fixed material/base category enumeration
//! - [`CreatureFlag`] - The fixed creature-category flag enumeration
//! - [`Color`] - Display color lookup by name or glyph character

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod category_code;
pub mod color;
pub mod creature;
pub mod error;

pub use category_code::CategoryCode;
pub use color::Color;
pub use creature::CreatureFlag;
pub use error::{Error, ErrorContext, ErrorKind, Result};
