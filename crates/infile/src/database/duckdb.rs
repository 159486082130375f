//! DuckDB backend.

use std::path::Path;

use ::duckdb::{Connection, params};
use tracing::debug;

use super::{Database, SqlFlavor};
use crate::error::{ImportError, Result};
use crate::load::LoadPlan;
use crate::schema::TableSpec;

const TABLE_EXISTS_SQL: &str = "SELECT count(*) FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_name = ?";

const CASE_CLASH_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = current_schema() \
     AND lower(table_name) = lower(?) AND table_name <> ? LIMIT 1";

/// A DuckDB database file (or in-memory database).
pub struct DuckDbDatabase {
    conn: Connection,
}

impl DuckDbDatabase {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            ImportError::Connection(format!("cannot open '{}': {}", path.display(), e))
        })?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ImportError::Connection(format!("cannot open in-memory database: {e}")))?;
        Ok(Self { conn })
    }

    /// Underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// A table whose name equals `name` apart from letter case.
    ///
    /// DuckDB resolves identifiers case-insensitively, so such a table
    /// would swallow a `CREATE TABLE IF NOT EXISTS` for `name`.
    fn case_clash(&self, name: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare(CASE_CLASH_SQL)
            .map_err(|e| ImportError::Connection(e.to_string()))?;
        let mut rows = stmt
            .query(params![name, name])
            .map_err(|e| ImportError::Connection(e.to_string()))?;
        match rows.next().map_err(|e| ImportError::Connection(e.to_string()))? {
            Some(row) => row
                .get(0)
                .map(Some)
                .map_err(|e| ImportError::Connection(e.to_string())),
            None => Ok(None),
        }
    }
}

impl Database for DuckDbDatabase {
    fn flavor(&self) -> SqlFlavor {
        SqlFlavor::DuckDb
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(TABLE_EXISTS_SQL, params![name], |row| row.get(0))
            .map_err(|e| ImportError::Connection(e.to_string()))?;
        Ok(count > 0)
    }

    fn create_table(&self, spec: &TableSpec) -> Result<()> {
        if let Some(existing) = self.case_clash(spec.name())? {
            return Err(ImportError::CreateTable {
                table: spec.name().to_string(),
                message: format!(
                    "table '{existing}' already exists and differs only in letter case"
                ),
            });
        }

        let sql = self.flavor().create_table(spec);
        debug!(sql = %sql, "creating table");
        self.conn
            .execute_batch(&sql)
            .map_err(|e| ImportError::CreateTable {
                table: spec.name().to_string(),
                message: e.to_string(),
            })
    }

    fn bulk_load(&self, plan: &LoadPlan) -> Result<()> {
        let sql = self.flavor().load(plan);
        debug!(sql = %sql, "running bulk load");
        self.conn
            .execute_batch(&sql)
            .map_err(|e| ImportError::LoadExecution {
                table: plan.table.clone(),
                message: e.to_string(),
            })
    }

    fn row_count(&self, table: &str) -> Result<Option<u64>> {
        let sql = format!(
            "SELECT count(*) FROM {}",
            self.flavor().quote_identifier(table)
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params![], |row| row.get(0))
            .map_err(|e| ImportError::LoadExecution {
                table: table.to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(count.max(0) as u64))
    }
}
