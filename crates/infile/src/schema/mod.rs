//! Schema types for representing inferred table structure.

mod naming;
mod table;
mod types;

pub use naming::{DEFAULT_TABLE_PREFIX, table_name_for};
pub use table::{TableFields, TableSpec};
pub use types::{ColumnType, SHORT_TEXT_MAX_CHARS};
