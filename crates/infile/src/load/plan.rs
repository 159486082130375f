//! Bulk load planning and execution.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::special::SpecialTables;
use crate::database::Database;
use crate::error::{ImportError, Result};
use crate::input::Dialect;

/// Everything the load engine needs to stream one file into one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadPlan {
    /// Destination table.
    pub table: String,
    /// File the engine reads directly.
    pub source: PathBuf,
    /// Field separator.
    pub delimiter: char,
    /// Quote character.
    pub enclosure: char,
    /// Escape character; `None` leaves the engine's backslash default.
    pub escape: Option<char>,
    /// Leading lines the engine must skip (the header row).
    pub skip_lines: u32,
}

impl LoadPlan {
    /// True when embedded enclosures are escaped by doubling them.
    pub fn escapes_by_doubling(&self) -> bool {
        self.escape == Some(self.enclosure)
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    /// Table loaded into.
    pub table: String,
    /// Rows in the table after the load, if the backend reports it.
    pub rows_in_table: Option<u64>,
}

/// Builds and runs load plans.
///
/// Whether a table gets the doubled-enclosure escape is decided purely by
/// its presence in the special-table list. Applying the wrong convention
/// corrupts quoted values without any error, so it is never guessed.
#[derive(Debug, Clone, Default)]
pub struct BulkLoadPlanner {
    dialect: Dialect,
    special_tables: SpecialTables,
}

impl BulkLoadPlanner {
    /// Create a planner for files written in `dialect`.
    pub fn new(dialect: Dialect, special_tables: SpecialTables) -> Self {
        Self {
            dialect,
            special_tables,
        }
    }

    /// Build the load plan for `file_path` into `table`.
    pub fn plan(&self, table: &str, file_path: &Path) -> LoadPlan {
        let escape = if self.special_tables.contains(table) {
            Some(self.dialect.enclosure)
        } else {
            None
        };

        LoadPlan {
            table: table.to_string(),
            source: file_path.to_path_buf(),
            delimiter: self.dialect.delimiter,
            enclosure: self.dialect.enclosure,
            escape,
            skip_lines: u32::from(self.dialect.has_header),
        }
    }

    /// Hand `plan` to the database's load engine.
    ///
    /// Engine failures come back as [`ImportError::LoadExecution`]; a lost
    /// connection is passed through unchanged.
    pub fn execute<D: Database + ?Sized>(&self, db: &D, plan: &LoadPlan) -> Result<LoadOutcome> {
        debug!(table = %plan.table, source = %plan.source.display(), escape = ?plan.escape, "executing load plan");

        match db.bulk_load(plan) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => return Err(err),
            Err(err @ ImportError::LoadExecution { .. }) => return Err(err),
            Err(other) => {
                return Err(ImportError::LoadExecution {
                    table: plan.table.clone(),
                    message: other.to_string(),
                });
            }
        }

        Ok(LoadOutcome {
            table: plan.table.clone(),
            rows_in_table: db.row_count(&plan.table)?,
        })
    }
}
