//! Directive registration strings and their parsed specs.
//!
//! A registration string names the directive keyword and its positional
//! fields: `"alloc int common str minmax"`. Field types are `int`, `uint`,
//! `sym` (one token), `str` (the rest of the line), `char`, and `rand`
//! (dice-or-number). A `?` prefix marks a field optional; optional fields
//! must come last, and a `str` field consumes the rest of the line so it
//! must be last too.

use loreforge_foundation::{Error, ErrorKind, Result};

/// The type of one positional field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// A single whitespace-delimited token.
    Sym,
    /// The rest of the line.
    Str,
    /// A single character.
    Char,
    /// A dice-or-number range.
    Rand,
}

impl FieldType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "uint" => Some(Self::Uint),
            "sym" => Some(Self::Sym),
            "str" => Some(Self::Str),
            "char" => Some(Self::Char),
            "rand" => Some(Self::Rand),
            _ => None,
        }
    }

    /// The name used in error reporting.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Sym => "sym",
            Self::Str => "str",
            Self::Char => "char",
            Self::Rand => "rand",
        }
    }
}

/// One positional field of a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used by handlers to fetch the value.
    pub name: String,
    /// Field type.
    pub ty: FieldType,
    /// Whether the field may be absent.
    pub optional: bool,
}

/// A parsed directive registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveSpec {
    /// The directive keyword, the first token of matching lines.
    pub keyword: String,
    /// The positional fields, in line order.
    pub fields: Vec<FieldSpec>,
}

impl DirectiveSpec {
    /// Parses a registration string such as `"name int index str name"`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidDirective`] for malformed registrations:
    /// missing keyword, unknown field type, a required field after an
    /// optional one, or a non-final `str` field.
    pub fn parse(registration: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::InvalidDirective(registration.to_string()));

        let mut tokens = registration.split_whitespace();
        let keyword = tokens.next().ok_or_else(invalid)?.to_string();

        let mut fields = Vec::new();
        let mut seen_optional = false;
        while let Some(ty_token) = tokens.next() {
            let optional = ty_token.starts_with('?');
            let ty_name = ty_token.trim_start_matches('?');
            let ty = FieldType::from_name(ty_name).ok_or_else(invalid)?;
            let name = tokens.next().ok_or_else(invalid)?.to_string();

            if seen_optional && !optional {
                return Err(invalid());
            }
            seen_optional |= optional;

            fields.push(FieldSpec { name, ty, optional });
        }

        // `str` swallows the rest of the line; nothing may follow it.
        if let Some(pos) = fields.iter().position(|f| f.ty == FieldType::Str) {
            if pos + 1 != fields.len() {
                return Err(invalid());
            }
        }

        Ok(Self { keyword, fields })
    }
}
