use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::kind::Coercion;

/// Error raised while resolving the columns of a record type.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("record {type_name} has no bindable fields")]
    NoFields { type_name: &'static str },

    #[error("column {name:?} is bound by the fields at {first:?} and {second:?}")]
    DuplicateColumn {
        name: &'static str,
        first: Vec<usize>,
        second: Vec<usize>,
    },
}

/// Error raised while converting a single cell to or from its field.
#[derive(Debug, Error)]
pub enum CellError {
    #[error("invalid integer {value:?}: {source}")]
    Integer {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid integer {value:?}: misplaced sign")]
    MisplacedSign { value: String },

    #[error("invalid float {value:?}: {source}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("invalid boolean {value:?}")]
    Boolean { value: String },

    #[error("{value:?} does not fit in {target}")]
    OutOfRange { value: String, target: Coercion },

    #[error("{0}")]
    Custom(String),
}

impl CellError {
    /// Creates an error for a user-supplied conversion.
    pub fn custom(message: impl fmt::Display) -> Self {
        CellError::Custom(message.to_string())
    }
}

/// Direction of a conversion, used to report missing capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decoded"),
            Direction::Encode => f.write_str("encoded"),
        }
    }
}

/// Error type for decoding and encoding.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("header is empty")]
    EmptyHeader,

    #[error("input contains no records")]
    EmptyInput,

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: expected {expected} values, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: closing quote without an open field or a previous record")]
    OrphanContinuation { line: usize },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },

    #[error("line {line}, column {column:?}: {source}")]
    Decode {
        line: usize,
        column: String,
        #[source]
        source: CellError,
    },

    #[error("record {record}, column {column:?}: {source}")]
    Encode {
        record: usize,
        column: String,
        #[source]
        source: CellError,
    },

    #[error("column {column:?} of type {type_name} cannot be {direction}")]
    Unsupported {
        column: String,
        type_name: &'static str,
        direction: Direction,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
