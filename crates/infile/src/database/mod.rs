//! Database seam: catalog lookup, table creation and bulk loading.
//!
//! Every component that touches the database receives an explicit handle
//! implementing [`Database`]; nothing looks a connection up on its own.
//!
//! # Backends
//!
//! - [`DuckDbDatabase`] - embedded DuckDB, loads through `COPY ... FROM`
//! - [`MemoryDatabase`] - in-process catalog that records every statement,
//!   used for dry runs and tests

mod duckdb;
mod memory;
mod sql;

pub use self::duckdb::DuckDbDatabase;
pub use memory::MemoryDatabase;
pub use sql::SqlFlavor;

use crate::error::Result;
use crate::load::LoadPlan;
use crate::schema::TableSpec;

/// Operations the import pipeline needs from a database.
pub trait Database {
    /// SQL dialect statements are rendered in.
    fn flavor(&self) -> SqlFlavor;

    /// Whether a table named exactly `name` exists (case-sensitive).
    ///
    /// A failure here means the database cannot be reached and must be
    /// reported as [`ImportError::Connection`](crate::ImportError::Connection).
    fn table_exists(&self, name: &str) -> Result<bool>;

    /// Create the table unless it exists.
    fn create_table(&self, spec: &TableSpec) -> Result<()>;

    /// Run a bulk load.
    fn bulk_load(&self, plan: &LoadPlan) -> Result<()>;

    /// Rows currently in `table`, when the backend can tell.
    fn row_count(&self, _table: &str) -> Result<Option<u64>> {
        Ok(None)
    }
}
