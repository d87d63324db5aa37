use std::io::BufRead;

use tracing::debug;

use crate::config::Config;
use crate::document::Document;
use crate::error::{Direction, Error};
use crate::reader::{RawRecord, Reader, RecordSource};
use crate::shape::Record;
use crate::value::Row;

/// Turns logical records into a [`Document`] or into typed records.
pub struct Decoder<S> {
    source: S,
    header: bool,
}

impl<R: BufRead> Decoder<Reader<R>> {
    /// Creates a decoder with the default configuration.
    pub fn new(input: R) -> Self {
        Decoder {
            source: Reader::new(input),
            header: false,
        }
    }

    pub fn with_config(input: R, config: &Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Decoder {
            source: Reader::with_config(input, config),
            header: config.header,
        })
    }
}

impl<S: RecordSource> Decoder<S> {
    /// Decodes from any record source.
    pub fn from_source(source: S, header: bool) -> Self {
        Decoder { source, header }
    }

    /// Whether the first logical record is a header.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    fn read_header(&mut self) -> Result<Option<RawRecord>, Error> {
        let Some(record) = self.source.read_record()? else {
            return Ok(None);
        };
        if record.fields.is_empty() {
            return Err(Error::EmptyHeader);
        }
        debug!(line = record.line, columns = record.fields.len(), "resolved header");
        Ok(Some(record))
    }

    /// Decodes every record with inferred cell types.
    ///
    /// Empty input is an empty document. With a header, every row must have
    /// one value per header column.
    pub fn decode_document(mut self) -> Result<Document, Error> {
        let mut document = if self.header {
            match self.read_header()? {
                Some(header) => Document::with_header(header.fields),
                None => return Ok(Document::new()),
            }
        } else {
            Document::new()
        };

        for record in self.source.read_all()? {
            if let Some(header) = document.header() {
                if header.len() != record.fields.len() {
                    return Err(Error::FieldCount {
                        line: record.line,
                        expected: header.len(),
                        found: record.fields.len(),
                    });
                }
            }
            document.push(Row::from_raw(&record.fields))?;
        }

        debug!(rows = document.len(), "decoded document");
        Ok(document)
    }

    /// Decodes every record into a `T`.
    ///
    /// Columns bind by position, in the order of `T`'s resolved shape. A
    /// header line is read and consumed but only its width is checked. Input
    /// without any data record is an error.
    pub fn decode<T: Record>(mut self) -> Result<Vec<T>, Error> {
        let shape = T::shape()?;
        let parsers = shape
            .fields()
            .map(|field| {
                field.parser().ok_or_else(|| Error::Unsupported {
                    column: field.name().to_string(),
                    type_name: field.type_name(),
                    direction: Direction::Decode,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let width = if self.header {
            let header = self.read_header()?.ok_or(Error::EmptyInput)?;
            if header.fields.len() != shape.len() {
                return Err(Error::FieldCount {
                    line: header.line,
                    expected: shape.len(),
                    found: header.fields.len(),
                });
            }
            header.fields.len()
        } else {
            shape.len()
        };

        let records = self.source.read_all()?;
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut decoded = Vec::with_capacity(records.len());
        for record in records {
            if record.fields.len() != width {
                return Err(Error::FieldCount {
                    line: record.line,
                    expected: width,
                    found: record.fields.len(),
                });
            }

            let mut value = T::default();
            for ((parse, field), raw) in parsers.iter().zip(shape.fields()).zip(&record.fields) {
                parse(&mut value, raw.as_str()).map_err(|source| Error::Decode {
                    line: record.line,
                    column: field.name().to_string(),
                    source,
                })?;
            }
            decoded.push(value);
        }

        debug!(record = shape.type_name(), rows = decoded.len(), "decoded records");
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn document_with_header() {
        let input = "name,age\r\n\"John, Michael\",25\r\nJane,23\r\n";
        let doc = Decoder::new(input.as_bytes()).header(true).decode_document().unwrap();

        assert_eq!(doc.header().unwrap(), ["name", "age"]);
        assert_eq!(
            doc.rows()[0].values(),
            &[Value::from("John, Michael"), Value::Integer(25)]
        );
        assert_eq!(doc.rows()[1].values(), &[Value::from("Jane"), Value::Integer(23)]);
    }

    #[test]
    fn document_without_header() {
        let doc = Decoder::new("a,b,c,\"d\ne\"\n1,2,3,4\n".as_bytes())
            .decode_document()
            .unwrap();

        assert!(doc.header().is_none());
        assert_eq!(doc.rows()[0].get(3), Some(&Value::from("d\ne")));
        assert_eq!(
            doc.rows()[1].values(),
            &[1i64, 2, 3, 4].map(Value::Integer)
        );
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = Decoder::new("".as_bytes()).header(true).decode_document().unwrap();
        assert!(doc.is_empty());
        assert!(doc.header().is_none());

        let doc = Decoder::new("# only a comment\n\n".as_bytes()).decode_document().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn width_mismatch_reports_line() {
        let err = Decoder::new("a,b\n1,2\n\n3\n".as_bytes())
            .header(true)
            .decode_document()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                line: 4,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn empty_column_names_are_a_header() {
        let doc = Decoder::new("\"\"\n1\n".as_bytes()).header(true).decode_document().unwrap();
        assert_eq!(doc.header().unwrap(), [""]);
        assert_eq!(doc.rows()[0].values(), &[Value::Integer(1)]);

        let doc = Decoder::new(",\n1,2\n".as_bytes()).header(true).decode_document().unwrap();
        assert_eq!(doc.header().unwrap(), ["", ""]);
    }

    struct Records(Vec<RawRecord>);

    impl RecordSource for Records {
        fn read_record(&mut self) -> Result<Option<RawRecord>, Error> {
            Ok(self.0.pop())
        }
    }

    #[test]
    fn header_without_fields_rejected() {
        let source = Records(vec![RawRecord {
            line: 1,
            fields: Vec::new(),
        }]);
        let err = Decoder::from_source(source, true).decode_document().unwrap_err();
        assert!(matches!(err, Error::EmptyHeader));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = Config::default().with_separator('"');
        assert!(matches!(
            Decoder::with_config("".as_bytes(), &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
