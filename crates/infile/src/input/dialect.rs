//! CSV dialect: the characters and flags that control parsing.

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Parsing rules for one delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Field separator.
    pub delimiter: char,
    /// Quote character around fields.
    pub enclosure: char,
    /// Escape character inside enclosed fields (None = doubled enclosure only).
    pub escape: Option<char>,
    /// Whether the first line names the columns.
    pub has_header: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            enclosure: '"',
            escape: Some('\\'),
            has_header: true,
        }
    }
}

impl Dialect {
    /// Create the default dialect (comma, double quote, backslash, header).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the enclosure.
    pub fn with_enclosure(mut self, enclosure: char) -> Self {
        self.enclosure = enclosure;
        self
    }

    /// Set the escape character.
    pub fn with_escape(mut self, escape: Option<char>) -> Self {
        self.escape = escape;
        self
    }

    /// Set whether the first line is a header.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// The same dialect with embedded enclosures escaped by doubling them.
    pub fn doubled_enclosure(self) -> Self {
        Self {
            escape: Some(self.enclosure),
            ..self
        }
    }

    /// True when embedded enclosures are only escaped by doubling.
    pub fn uses_doubled_enclosure(&self) -> bool {
        match self.escape {
            None => true,
            Some(escape) => escape == self.enclosure,
        }
    }

    /// Check that every character fits in a single byte.
    pub fn validate(&self) -> Result<()> {
        single_byte("delimiter", self.delimiter)?;
        single_byte("enclosure", self.enclosure)?;
        if let Some(escape) = self.escape {
            single_byte("escape", escape)?;
        }
        if self.delimiter == self.enclosure {
            return Err(ImportError::Config(format!(
                "delimiter and enclosure must differ (both '{}')",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Build a `csv` reader configured for this dialect.
    ///
    /// Headers are never consumed by the builder; the record reader reads
    /// the header row itself.
    pub(crate) fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        self.validate()?;

        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter as u8)
            .quote(self.enclosure as u8)
            .double_quote(true)
            .has_headers(false)
            .flexible(true);

        if !self.uses_doubled_enclosure() {
            builder.escape(self.escape.map(|c| c as u8));
        }

        Ok(builder)
    }
}

fn single_byte(name: &str, c: char) -> Result<()> {
    if c.is_ascii() {
        Ok(())
    } else {
        Err(ImportError::Config(format!(
            "{name} must be a single-byte ASCII character, got '{c}'"
        )))
    }
}
