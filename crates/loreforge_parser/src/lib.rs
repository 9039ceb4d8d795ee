//! Directive-grammar engine for Loreforge definition files.
//!
//! Definition files are line-oriented: a directive keyword followed by
//! positional typed fields. Each entity kind registers its grammar as
//! registration strings like `"name int index str name"` together with a
//! handler that mutates the kind's builder state:
//!
//! ```text
//! name 5 Dagger          → handler gets index = 5, name = "Dagger"
//! type sword             → handler gets code = "sword"
//! combat 0 1d4 0 0 0     → handler gets ac = 0, hd = 1d4, ...
//! ```
//!
//! Blank lines and `#` comment lines are skipped. A parse error aborts the
//! file, decorated with the file name and line number.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod parser;
pub mod spec;

pub use parser::{Handler, Parser, Values};
pub use spec::{DirectiveSpec, FieldSpec, FieldType};
