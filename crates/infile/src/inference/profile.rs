//! Running per-column width profile.

use indexmap::IndexMap;

use crate::input::Record;

/// Max observed length, in characters, of every column seen so far.
///
/// Columns keep the order in which they were first seen, and a column's
/// maximum never decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProfile {
    max_lengths: IndexMap<String, usize>,
}

impl FieldProfile {
    /// An empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one value into the profile.
    pub fn observe_value(&mut self, column: &str, value: &str) {
        let length = value.chars().count();
        match self.max_lengths.get_mut(column) {
            Some(max) => *max = (*max).max(length),
            None => {
                self.max_lengths.insert(column.to_string(), length);
            }
        }
    }

    /// Fold every field of a record into the profile.
    pub fn observe(&mut self, record: &Record) {
        for (column, value) in record.iter() {
            self.observe_value(column, value);
        }
    }

    /// Max length seen for a column.
    pub fn max_length(&self, column: &str) -> Option<usize> {
        self.max_lengths.get(column).copied()
    }

    /// `(column, max length)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.max_lengths.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct columns seen.
    pub fn len(&self) -> usize {
        self.max_lengths.len()
    }

    /// True if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.max_lengths.is_empty()
    }
}
