//! Tables whose files escape embedded quotes by doubling them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::Dialect;

/// Explicit allow-list of special table names.
///
/// Membership is an exact, case-sensitive match on the derived table name.
/// It is never inferred from file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialTables(BTreeSet<String>);

impl SpecialTables {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table name.
    pub fn insert(&mut self, table: impl Into<String>) -> bool {
        self.0.insert(table.into())
    }

    /// True if `table` is on the list.
    pub fn contains(&self, table: &str) -> bool {
        self.0.contains(table)
    }

    /// Number of listed tables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no table is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Listed names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Dialect to read `table`'s file with.
    pub fn dialect_for(&self, table: &str, base: Dialect) -> Dialect {
        if self.contains(table) {
            base.doubled_enclosure()
        } else {
            base
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SpecialTables {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for SpecialTables {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
