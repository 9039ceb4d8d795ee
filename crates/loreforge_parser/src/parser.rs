//! The directive parser: handler dispatch and typed field access.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use loreforge_dice::Random;
use loreforge_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::spec::{DirectiveSpec, FieldType};

/// A parsed field value.
#[derive(Clone, Debug, PartialEq)]
enum FieldValue {
    Int(i64),
    Uint(u64),
    Sym(String),
    Str(String),
    Char(char),
    Rand(Random),
}

/// The typed field values of one directive line.
#[derive(Clone, Debug, Default)]
pub struct Values {
    fields: HashMap<String, FieldValue>,
}

impl Values {
    fn missing(name: &str) -> Error {
        Error::new(ErrorKind::MissingField(name.to_string()))
    }

    fn mismatch(name: &str, expected: &'static str) -> Error {
        Error::internal(format!("field {name} fetched as {expected}"))
    }

    /// Returns whether the (optional) field was present on the line.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fetches an `int` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.fields.get(name) {
            Some(FieldValue::Int(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "int")),
            None => Err(Self::missing(name)),
        }
    }

    /// Fetches a `uint` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_uint(&self, name: &str) -> Result<u64> {
        match self.fields.get(name) {
            Some(FieldValue::Uint(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "uint")),
            None => Err(Self::missing(name)),
        }
    }

    /// Fetches a `sym` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_sym(&self, name: &str) -> Result<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Sym(v)) => Ok(v),
            Some(_) => Err(Self::mismatch(name, "sym")),
            None => Err(Self::missing(name)),
        }
    }

    /// Fetches a `str` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Str(v)) => Ok(v),
            Some(_) => Err(Self::mismatch(name, "str")),
            None => Err(Self::missing(name)),
        }
    }

    /// Fetches a `char` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_char(&self, name: &str) -> Result<char> {
        match self.fields.get(name) {
            Some(FieldValue::Char(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "char")),
            None => Err(Self::missing(name)),
        }
    }

    /// Fetches a `rand` field.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MissingField`] when the field is absent.
    pub fn get_rand(&self, name: &str) -> Result<Random> {
        match self.fields.get(name) {
            Some(FieldValue::Rand(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(name, "rand")),
            None => Err(Self::missing(name)),
        }
    }
}

/// A directive handler: mutates the builder state from the line's values.
pub type Handler<S> = fn(&mut S, &Values) -> Result<()>;

/// The directive parser for one entity kind.
///
/// Owns the kind's builder state; registered handlers mutate it as lines
/// arrive. When the file is done, [`Parser::into_state`] surrenders the
/// builder for finalizing.
pub struct Parser<S> {
    directives: Vec<(DirectiveSpec, Handler<S>)>,
    state: S,
}

impl<S> Parser<S> {
    /// Creates a parser around the given builder state.
    pub fn new(state: S) -> Self {
        Self {
            directives: Vec::new(),
            state,
        }
    }

    /// Registers a directive grammar and its handler.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidDirective`] for a malformed registration
    /// string; registrations are compile-time constants, so an error here is
    /// a defect.
    pub fn register(&mut self, registration: &str, handler: Handler<S>) -> Result<()> {
        let spec = DirectiveSpec::parse(registration)?;
        self.directives.push((spec, handler));
        Ok(())
    }

    /// Returns the builder state.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Parses a single directive line and dispatches its handler.
    ///
    /// # Errors
    /// Grammar errors ([`ErrorKind::UndefinedDirective`],
    /// [`ErrorKind::MissingField`], [`ErrorKind::FieldTypeMismatch`]) or
    /// whatever semantic error the handler raises.
    pub fn parse_line(&mut self, line: &str) -> Result<()> {
        let (keyword, rest) = next_token(line);
        let index = self
            .directives
            .iter()
            .position(|(spec, _)| spec.keyword == keyword)
            .ok_or_else(|| ErrorKind::UndefinedDirective(keyword.to_string()))?;

        let handler = self.directives[index].1;
        let values = read_values(&self.directives[index].0, rest)?;
        handler(&mut self.state, &values)
    }

    /// Parses a whole source text, skipping blanks and `#` comments.
    ///
    /// Errors are decorated with the 1-based line number.
    ///
    /// # Errors
    /// The first grammar or semantic error aborts the parse.
    pub fn parse_str(&mut self, source: &str) -> Result<()> {
        for (number, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.parse_line(line)
                .map_err(|e| e.with_context(ErrorContext::new().with_line(number + 1)))?;
        }
        Ok(())
    }

    /// Parses a definition file.
    ///
    /// Errors are decorated with the file name; a missing file is the fatal
    /// [`ErrorKind::FileNotFound`].
    ///
    /// # Errors
    /// I/O failures, or the first grammar/semantic error in the file.
    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        let display = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::new(ErrorKind::FileNotFound(display.clone()))
            } else {
                Error::new(ErrorKind::FileRead {
                    path: display.clone(),
                    message: e.to_string(),
                })
            }
        })?;
        self.parse_str(&source)
            .map_err(|e| e.with_context(ErrorContext::new().with_file(display)))
    }
}

/// Splits the next whitespace-delimited token off the front of `s`.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn read_values(spec: &DirectiveSpec, mut rest: &str) -> Result<Values> {
    let mut values = Values::default();

    for field in &spec.fields {
        // `str` consumes the remainder of the line.
        if field.ty == FieldType::Str {
            let text = rest.trim();
            rest = "";
            if text.is_empty() {
                if field.optional {
                    continue;
                }
                return Err(ErrorKind::MissingField(field.name.clone()).into());
            }
            values
                .fields
                .insert(field.name.clone(), FieldValue::Str(text.to_string()));
            continue;
        }

        let (token, remainder) = next_token(rest);
        if token.is_empty() {
            if field.optional {
                continue;
            }
            return Err(ErrorKind::MissingField(field.name.clone()).into());
        }
        rest = remainder;

        let mismatch = || ErrorKind::FieldTypeMismatch {
            field: field.name.clone(),
            expected: field.ty.name(),
        };

        let value = match field.ty {
            FieldType::Int => FieldValue::Int(token.parse().map_err(|_| mismatch())?),
            FieldType::Uint => FieldValue::Uint(token.parse().map_err(|_| mismatch())?),
            FieldType::Sym => FieldValue::Sym(token.to_string()),
            FieldType::Char => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => FieldValue::Char(c),
                    _ => return Err(mismatch().into()),
                }
            }
            FieldType::Rand => FieldValue::Rand(Random::parse(token)?),
            FieldType::Str => unreachable!("str handled above"),
        };
        values.fields.insert(field.name.clone(), value);
    }

    Ok(values)
}
