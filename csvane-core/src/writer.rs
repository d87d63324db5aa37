use std::io::Write;

use crate::config::Config;
use crate::error::Error;
use crate::quoting::{escape, quote};

/// A destination for logical records.
pub trait RecordSink {
    fn write_record(&mut self, fields: &[String]) -> Result<(), Error>;

    fn write_all(&mut self, records: &[Vec<String>]) -> Result<(), Error> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error>;
}

/// Writes logical records as separator-joined lines, quoting fields that
/// would not read back unchanged.
pub struct Writer<W> {
    output: W,
    separator: char,
    comment: char,
    carriage_return: bool,
}

impl<W: Write> Writer<W> {
    pub fn new(output: W) -> Self {
        Self::with_config(output, &Config::default())
    }

    pub fn with_config(output: W, config: &Config) -> Self {
        Writer {
            output,
            separator: config.separator,
            comment: config.comment,
            carriage_return: config.carriage_return,
        }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn compose_line(&self, fields: &[String]) -> String {
        let mut line = String::new();

        if matches!(fields, [only] if only.is_empty()) {
            // A bare empty line would be skipped on read.
            line.push_str(&quote(""));
        } else {
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    line.push(self.separator);
                }
                if i == 0 && field.starts_with(self.comment) {
                    line.push_str(&quote(field));
                } else {
                    line.push_str(&escape(field, self.separator));
                }
            }
        }

        if self.carriage_return {
            line.push('\r');
        }
        line.push('\n');
        line
    }
}

impl<W: Write> RecordSink for Writer<W> {
    fn write_record(&mut self, fields: &[String]) -> Result<(), Error> {
        let line = self.compose_line(fields);
        self.output.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.output.flush()?;
        Ok(())
    }
}
