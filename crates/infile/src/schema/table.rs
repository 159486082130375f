//! Table-level schema definition.

use indexmap::IndexMap;
use serde::Serialize;

use super::types::ColumnType;
use crate::error::{ImportError, Result};

/// Ordered column name -> type mapping produced by inference.
pub type TableFields = IndexMap<String, ColumnType>;

/// A table to create: its name and its columns in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    name: String,
    columns: TableFields,
}

impl TableSpec {
    /// Build a table spec, rejecting anything a database could not create.
    pub fn new(name: impl Into<String>, columns: TableFields) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ImportError::Schema("No table name defined".to_string()));
        }
        if columns.is_empty() {
            return Err(ImportError::Schema(format!(
                "No columns defined for table '{name}'"
            )));
        }
        if columns.keys().any(String::is_empty) {
            return Err(ImportError::Schema(format!(
                "Table '{name}' has a column with an empty name"
            )));
        }
        Ok(Self { name, columns })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in order.
    pub fn columns(&self) -> &TableFields {
        &self.columns
    }

    /// Get the type of a column by name.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
