//! Csvane is a CSV codec with two modes.
//!
//! Core concepts:
//! - **Document**: schema-less table whose cells are typed by inference
//!   (integer, float, boolean, else string)
//! - **Record**: a struct whose fields bind to columns, flattening nested
//!   records and delegating custom types to their own conversions
//! - **Shape**: the resolved, ordered columns of a record type
//! - **Reader/Writer**: the quoting layer, turning physical lines into
//!   logical records and back
//!
//! # Example
//!
//! ```
//! use csvane_core::{Decoder, Encoder, Record};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Person {
//!     #[csv(rename = "name")]
//!     name: String,
//!     #[csv(rename = "age")]
//!     age: u32,
//! }
//!
//! let input = "name,age\n\"Doe, Jane\",23\n";
//! let people: Vec<Person> = Decoder::new(input.as_bytes()).header(true).decode().unwrap();
//! assert_eq!(people[0].name, "Doe, Jane");
//!
//! let mut encoder = Encoder::new(Vec::new());
//! encoder.encode(&people).unwrap();
//! assert_eq!(encoder.into_inner().into_inner(), input.as_bytes());
//! ```

extern crate self as csvane_core;

mod cell;
mod config;
mod decoder;
mod document;
mod encoder;
mod error;
mod kind;
mod quoting;
mod reader;
mod shape;
mod value;
mod writer;

pub use cell::{FromCell, ToCell};
pub use config::Config;
pub use decoder::Decoder;
pub use document::Document;
pub use encoder::Encoder;
pub use error::{CellError, Direction, Error, ShapeError};
pub use kind::{Coercion, FloatType, IntType};
pub use quoting::{FieldMerger, Merge, QUOTE, escape, quote};
pub use reader::{RawRecord, Reader, RecordSource};
pub use shape::{Bind, Binding, FieldDef, FieldSpec, FormatFn, IGNORE_TAG, Leaf, ParseFn, Record, Shape};
pub use value::{Row, Value};
pub use writer::{RecordSink, Writer};

#[cfg(feature = "derive")]
pub use csvane_derive::{Cell, Record};
