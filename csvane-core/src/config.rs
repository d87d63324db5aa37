use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::quoting::QUOTE;

/// Reader and writer settings.
///
/// Every key is optional when loaded from TOML:
///
/// ```toml
/// separator = ";"
/// comment = "%"
/// carriage_return = true
/// header = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field separator.
    pub separator: char,
    /// Lines starting with this character are skipped on read.
    pub comment: char,
    /// Terminate written lines with `\r\n` instead of `\n`.
    pub carriage_return: bool,
    /// The first logical record of the input is a header.
    pub header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: ',',
            comment: '#',
            carriage_return: false,
            header: false,
        }
    }
}

impl Config {
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_carriage_return(mut self, carriage_return: bool) -> Self {
        self.carriage_return = carriage_return;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the quoting rules cannot round-trip.
    pub fn validate(&self) -> Result<(), Error> {
        if matches!(self.separator, QUOTE | '\r' | '\n') {
            return Err(Error::InvalidConfig(format!(
                "separator {:?} is reserved",
                self.separator
            )));
        }
        if self.comment == self.separator || self.comment == QUOTE {
            return Err(Error::InvalidConfig(format!(
                "comment marker {:?} clashes with the separator or the quote",
                self.comment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.separator, ',');
        assert_eq!(config.comment, '#');
        assert!(!config.carriage_return);
        assert!(!config.header);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("separator = \";\"\nheader = true\n").unwrap();
        assert_eq!(config, Config::default().with_separator(';').with_header(true));
    }

    #[test]
    fn invalid_toml() {
        assert!(matches!(Config::from_toml("separator = 3"), Err(Error::Config(_))));
        assert!(matches!(
            Config::from_toml("separator = \"ab\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn reserved_characters_rejected() {
        for config in [
            Config::default().with_separator('"'),
            Config::default().with_separator('\n'),
            Config::default().with_comment(','),
            Config::default().with_separator(';').with_comment('"'),
        ] {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }
}
