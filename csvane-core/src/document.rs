use serde::Serialize;

use crate::error::Error;
use crate::value::{Row, Value};

/// A schema-less table: an optional header and rows of inferred values.
///
/// With a header, every row has exactly one value per column name; the
/// width is checked as each row is added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
}

impl Document {
    /// Creates a document without a header.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: Vec<String>) -> Self {
        Document {
            header: Some(header),
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Appends a row, rejecting it if its width differs from the header's.
    pub fn push(&mut self, row: impl Into<Row>) -> Result<(), Error> {
        let row = row.into();
        if let Some(header) = &self.header {
            if header.len() != row.len() {
                return Err(Error::RowWidth {
                    row: self.rows.len(),
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the values of the named column.
    ///
    /// Returns `None` without a header or when no column has that name.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let index = self.header.as_ref()?.iter().position(|column| column == name)?;
        Some(self.rows.iter().filter_map(move |row| row.get(index)))
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
