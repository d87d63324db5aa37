use std::io::Write;

use tracing::debug;

use crate::config::Config;
use crate::document::Document;
use crate::error::{Direction, Error};
use crate::shape::Record;
use crate::writer::{RecordSink, Writer};

/// Writes a [`Document`] or typed records as logical records.
pub struct Encoder<S> {
    sink: S,
}

impl<W: Write> Encoder<Writer<W>> {
    /// Creates an encoder with the default configuration.
    pub fn new(output: W) -> Self {
        Encoder {
            sink: Writer::new(output),
        }
    }

    pub fn with_config(output: W, config: &Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Encoder {
            sink: Writer::with_config(output, config),
        })
    }
}

impl<S: RecordSink> Encoder<S> {
    /// Encodes into any record sink.
    pub fn from_sink(sink: S) -> Self {
        Encoder { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Writes the document's header, if it has one, then every row in order.
    pub fn encode_document(&mut self, document: &Document) -> Result<(), Error> {
        if let Some(header) = document.header() {
            self.sink.write_record(header)?;
        }
        for row in document.rows() {
            self.sink.write_record(&row.to_raw())?;
        }
        self.sink.flush()?;
        debug!(rows = document.len(), "encoded document");
        Ok(())
    }

    /// Writes a header with `T`'s column names, then one line per record.
    ///
    /// Nothing is written unless every record formats successfully.
    pub fn encode<T: Record>(&mut self, records: &[T]) -> Result<(), Error> {
        let shape = T::shape()?;
        let formatters = shape
            .fields()
            .map(|field| {
                field.formatter().ok_or_else(|| Error::Unsupported {
                    column: field.name().to_string(),
                    type_name: field.type_name(),
                    direction: Direction::Encode,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Err(Error::EmptyInput);
        }

        let lines = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                formatters
                    .iter()
                    .zip(shape.fields())
                    .map(|(format, field)| {
                        format(record).map_err(|source| Error::Encode {
                            record: index,
                            column: field.name().to_string(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.sink.write_record(&shape.columns())?;
        self.sink.write_all(&lines)?;
        self.sink.flush()?;

        debug!(record = shape.type_name(), rows = lines.len(), "encoded records");
        Ok(())
    }
}
