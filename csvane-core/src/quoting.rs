//! The quoting state machine: merges separator-split pieces of physical
//! lines back into logical fields, across line boundaries when a quoted
//! field contains line breaks.

use std::borrow::Cow;

use crate::error::Error;

pub const QUOTE: char = '"';
const ESCAPED_QUOTE: &str = "\"\"";

/// Classification of one separator-split piece of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// A piece that is exactly one quote character.
    LoneQuote,
    /// A quoted field opened and closed within this piece.
    Quoted(&'a str),
    /// A quoted field opened by this piece and continued by later ones.
    Opening(&'a str),
    /// The piece closing the open quoted field.
    Closing(&'a str),
    /// Anything else: an unquoted field, or the inside of an open quoted field.
    Bare(&'a str),
}

/// A closing quote is a trailing run of quotes of odd length; an even run is
/// only escaped quotes.
fn closes(piece: &str) -> bool {
    let run = piece.len() - piece.trim_end_matches(QUOTE).len();
    run % 2 == 1
}

fn classify(piece: &str, in_quotes: bool) -> Token<'_> {
    if piece.len() == 1 && piece.starts_with(QUOTE) {
        return Token::LoneQuote;
    }

    if in_quotes {
        return if closes(piece) {
            Token::Closing(&piece[..piece.len() - 1])
        } else {
            Token::Bare(piece)
        };
    }

    if let Some(rest) = piece.strip_prefix(QUOTE) {
        return if closes(rest) {
            Token::Quoted(&rest[..rest.len() - 1])
        } else {
            Token::Opening(rest)
        };
    }

    match piece.strip_suffix(QUOTE) {
        Some(content) if closes(piece) => Token::Closing(content),
        _ => Token::Bare(piece),
    }
}

fn unescape(field: &str) -> String {
    field.replace(ESCAPED_QUOTE, "\"")
}

/// Outcome of feeding one physical line to a [`FieldMerger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    /// The line completed a logical record.
    Complete(Vec<String>),
    /// A quoted field is still open; the next line continues it.
    NeedMore,
}

/// Accumulates the fields of one logical record.
#[derive(Debug)]
pub struct FieldMerger {
    separator: char,
    fields: Vec<String>,
    pending: Option<String>,
    line_break: bool,
}

impl FieldMerger {
    pub fn new(separator: char) -> Self {
        FieldMerger {
            separator,
            fields: Vec::new(),
            pending: None,
            line_break: false,
        }
    }

    /// True while a quoted field spans past the last merged line.
    pub fn in_quotes(&self) -> bool {
        self.pending.is_some()
    }

    fn join(&mut self, piece: &str) -> String {
        let mut buffer = self.pending.take().unwrap_or_default();
        if !self.line_break {
            buffer.push(self.separator);
        }
        self.line_break = false;
        buffer.push_str(piece);
        buffer
    }

    /// Merges the pieces of one physical line, given without its line
    /// terminator. When a quoted field stays open, `terminator` becomes part
    /// of its content.
    ///
    /// A closing quote that shows up with no open field continues the last
    /// field of `previous`, the record completed before this line. Without a
    /// previous record that is an [`Error::OrphanContinuation`].
    pub fn merge_line(
        &mut self,
        line: &str,
        terminator: &str,
        line_no: usize,
        mut previous: Option<&mut String>,
    ) -> Result<Merge, Error> {
        for piece in line.split(self.separator) {
            match classify(piece, self.in_quotes()) {
                Token::LoneQuote => {
                    if self.in_quotes() {
                        let field = self.join("");
                        self.fields.push(unescape(&field));
                    } else {
                        self.pending = Some(String::new());
                    }
                }
                Token::Quoted(content) => self.fields.push(unescape(content)),
                Token::Opening(content) => self.pending = Some(content.to_string()),
                Token::Closing(content) if self.in_quotes() => {
                    let field = self.join(content);
                    self.fields.push(unescape(&field));
                }
                Token::Closing(content) => match previous.as_deref_mut() {
                    Some(last) => {
                        last.push(self.separator);
                        last.push_str(&unescape(content));
                    }
                    None => return Err(Error::OrphanContinuation { line: line_no }),
                },
                Token::Bare(content) if self.in_quotes() => {
                    let joined = self.join(content);
                    self.pending = Some(joined);
                }
                Token::Bare(content) => self.fields.push(content.to_string()),
            }
        }

        match self.pending.as_mut() {
            Some(buffer) => {
                buffer.push_str(terminator);
                self.line_break = true;
                Ok(Merge::NeedMore)
            }
            None => Ok(Merge::Complete(std::mem::take(&mut self.fields))),
        }
    }
}

/// Quotes `field` when writing it unquoted would not survive a read.
pub fn escape(field: &str, separator: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == separator || c == QUOTE || c == '\n' || c == '\r');
    if needs_quotes {
        Cow::Owned(quote(field))
    } else {
        Cow::Borrowed(field)
    }
}

/// Wraps `field` in quotes, doubling embedded quotes.
pub fn quote(field: &str) -> String {
    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push(QUOTE);
    quoted.push_str(&field.replace(QUOTE, ESCAPED_QUOTE));
    quoted.push(QUOTE);
    quoted
}
