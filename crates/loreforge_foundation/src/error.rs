//! Error types for the Loreforge load sequence.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Convenience result type used throughout Loreforge.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Loreforge operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    ///
    /// Context attached closer to the failure wins; outer layers only fill
    /// in fields the inner layers left empty, so a line number attached by
    /// the source parser survives the file name attached above it.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        match &mut self.context {
            None => self.context = Some(context),
            Some(existing) => {
                if existing.file.is_none() {
                    existing.file = context.file;
                }
                if existing.line.is_none() {
                    existing.line = context.line;
                }
            }
        }
        self
    }

    /// Creates a missing-record-header error (body directive before any
    /// identity directive).
    #[must_use]
    pub fn missing_record_header() -> Self {
        Self::new(ErrorKind::MissingRecordHeader)
    }

    /// Creates an invalid flag/value-token error for the offending token.
    #[must_use]
    pub fn invalid_flag(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFlag(token.into()))
    }

    /// Creates an invalid value-token error for the offending token.
    #[must_use]
    pub fn invalid_value(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue(token.into()))
    }

    /// Creates an internal (defect, not user input) error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Categorized error kinds for pattern matching.
///
/// Grammar errors come from the directive engine, semantic errors from the
/// record builders, and [`ErrorKind::Internal`] marks invariant violations
/// that are defects rather than bad input.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A definition file could not be found. Fatal for the load sequence.
    #[error("data file not found: {0}")]
    FileNotFound(String),

    /// A definition file could not be read.
    #[error("failed to read {path}: {message}")]
    FileRead {
        /// The path that failed.
        path: String,
        /// The underlying I/O error message.
        message: String,
    },

    /// A directive keyword with no registered handler.
    #[error("undefined directive: {0}")]
    UndefinedDirective(String),

    /// A malformed directive registration or line.
    #[error("invalid directive: {0}")]
    InvalidDirective(String),

    /// A required field was absent from the directive line.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A field failed to parse as its registered type.
    #[error("field {field} is not a valid {expected}")]
    FieldTypeMismatch {
        /// The field name from the registration string.
        field: String,
        /// The registered type name.
        expected: &'static str,
    },

    /// A body directive arrived before any record header.
    #[error("missing record header")]
    MissingRecordHeader,

    /// A category code that is not in the fixed enumeration.
    #[error("unrecognised category: {0}")]
    UnrecognisedCategory(String),

    /// A bane code with no matching record in the finished bane table.
    #[error("unrecognised bane: {0}")]
    UnrecognisedBane(String),

    /// A scourge code with no matching record in the finished scourge table.
    #[error("unrecognised scourge: {0}")]
    UnrecognisedScourge(String),

    /// An affliction name with no matching record in the finished table.
    #[error("unrecognised affliction: {0}")]
    UnrecognisedAffliction(String),

    /// An effect name that is not in the fixed effect list.
    #[error("unrecognised effect: {0}")]
    UnrecognisedEffect(String),

    /// A creature-category name absent from the configured directory.
    #[error("unrecognised creature category: {0}")]
    UnrecognisedCreature(String),

    /// A flag token no resolver in the chain accepted.
    #[error("invalid flag token: {0}")]
    InvalidFlag(String),

    /// A value token no resolver in the chain accepted.
    #[error("invalid value token: {0}")]
    InvalidValue(String),

    /// A dice string that failed to parse.
    #[error("invalid dice string: {0}")]
    InvalidDice(String),

    /// An expression operations string that failed to parse.
    #[error("bad expression string: {0}")]
    BadExpressionString(String),

    /// An expression bound to a variable the dice value does not carry.
    #[error("unbound expression variable: {0}")]
    UnboundExpression(String),

    /// An allocation range that is not of the form "N to M".
    #[error("invalid allocation range: {0}")]
    InvalidAllocation(String),

    /// An allocation bound outside 0..=255.
    #[error("allocation bound out of range: {0}")]
    OutOfBounds(String),

    /// A bane with both a creature flag and a named creature category.
    #[error("bane selects both a creature flag and a creature category")]
    InvalidBane,

    /// A suffix `type` directive naming a category with no templates.
    #[error("no template exists for suffix category: {0}")]
    NoTemplateForSuffix(String),

    /// A suffix `item` directive naming a template that does not exist.
    #[error("no template for category {category}, variant {variant}")]
    InvalidTemplateRef {
        /// The category code as written in the file.
        category: String,
        /// The variant display name as written in the file.
        variant: String,
    },

    /// A graphics override on a template that was not instanced by a relic.
    #[error("graphics override on a template not instanced by a relic")]
    NotInstancedRelic,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Definition file name.
    pub file: Option<String>,
    /// Line number in the file (1-indexed).
    pub line: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file name.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "at {file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        } else if let Some(line) = self.line {
            write!(f, "at line {line}")?;
        }
        Ok(())
    }
}
