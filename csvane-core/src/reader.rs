use std::io::BufRead;

use tracing::trace;

use crate::config::Config;
use crate::error::Error;
use crate::quoting::{FieldMerger, Merge};

/// One logical record as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Physical line number (1-based) where the record starts.
    pub line: usize,
    pub fields: Vec<String>,
}

/// A source of logical records.
pub trait RecordSource {
    /// Reads the next logical record, or `None` at end of input.
    fn read_record(&mut self) -> Result<Option<RawRecord>, Error>;

    /// Reads every remaining record.
    fn read_all(&mut self) -> Result<Vec<RawRecord>, Error> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

/// Splits a character stream into logical records.
///
/// Empty lines and lines starting with the comment character are skipped,
/// except while a quoted field is open, where they are field content.
pub struct Reader<R> {
    input: R,
    separator: char,
    comment: char,
    line: usize,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R) -> Self {
        Self::with_config(input, &Config::default())
    }

    pub fn with_config(input: R, config: &Config) -> Self {
        Reader {
            input,
            separator: config.separator,
            comment: config.comment,
            line: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads one physical line, split from its terminator.
    fn next_line(&mut self) -> Result<Option<(String, &'static str)>, Error> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let mut terminator = "\n";
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
                terminator = "\r\n";
            }
        }
        Ok(Some((buf, terminator)))
    }

    fn next_record(&mut self, mut previous: Option<&mut String>) -> Result<Option<RawRecord>, Error> {
        let mut merger = FieldMerger::new(self.separator);
        let mut start = 0;

        loop {
            let Some((line, terminator)) = self.next_line()? else {
                if merger.in_quotes() {
                    return Err(Error::UnterminatedQuote { line: start });
                }
                return Ok(None);
            };

            if !merger.in_quotes() {
                if line.is_empty() || line.starts_with(self.comment) {
                    trace!(line = self.line, "skipping line");
                    continue;
                }
                start = self.line;
            }

            match merger.merge_line(&line, terminator, self.line, previous.as_deref_mut())? {
                Merge::NeedMore => {}
                Merge::Complete(fields) if fields.is_empty() => {}
                Merge::Complete(fields) => {
                    if start != self.line {
                        trace!(start, end = self.line, "record spans several lines");
                    }
                    return Ok(Some(RawRecord {
                        line: start,
                        fields,
                    }));
                }
            }
        }
    }
}

impl<R: BufRead> RecordSource for Reader<R> {
    fn read_record(&mut self) -> Result<Option<RawRecord>, Error> {
        self.next_record(None)
    }

    /// Reads every remaining record. A stray closing quote at the start of a
    /// line continues the last field of the record before it.
    fn read_all(&mut self) -> Result<Vec<RawRecord>, Error> {
        let mut records: Vec<RawRecord> = Vec::new();
        loop {
            let previous = records.last_mut().and_then(|record| record.fields.last_mut());
            match self.next_record(previous)? {
                Some(record) => records.push(record),
                None => break,
            }
        }
        trace!(records = records.len(), lines = self.line, "read input");
        Ok(records)
    }
}
