//! A single parsed data row keyed by column name.

use std::sync::Arc;

use indexmap::IndexMap;

/// One data row: raw text values in header order.
///
/// The header is shared between all records of a session, so every record
/// carries exactly the header's keys in the header's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Pair a header with one row of values of the same length.
    pub(crate) fn new(header: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(header.len(), values.len());
        Self { header, values }
    }

    /// Column names, in header order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.header.iter().map(String::as_str)
    }

    /// Raw values, in header order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// `(column, value)` pairs, in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys().zip(self.values())
    }

    /// Value of a column by name.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.header.iter().position(|h| h == column)?;
        self.values.get(index).map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert into an owned ordered map.
    pub fn into_map(self) -> IndexMap<String, String> {
        self.header.iter().cloned().zip(self.values).collect()
    }
}
