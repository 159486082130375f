//! In-process database that records what it is asked to do.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use super::{Database, SqlFlavor};
use crate::error::{ImportError, Result};
use crate::load::LoadPlan;
use crate::schema::TableSpec;

#[derive(Debug, Default)]
struct MemoryState {
    tables: IndexMap<String, TableSpec>,
    statements: Vec<String>,
    loads: Vec<LoadPlan>,
    created: Vec<String>,
    failing_loads: HashMap<String, String>,
    disconnected: bool,
}

/// Catalog kept in memory. Nothing is ever read from the source files.
///
/// Every create and load is rendered in the configured [`SqlFlavor`] and
/// kept, so a dry run can print exactly what a real run would execute.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    flavor: SqlFlavor,
    state: Mutex<MemoryState>,
}

impl MemoryDatabase {
    /// Create an empty database rendering DuckDB statements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database rendering statements in `flavor`.
    pub fn with_flavor(flavor: SqlFlavor) -> Self {
        Self {
            flavor,
            state: Mutex::default(),
        }
    }

    /// Register a table as already existing.
    pub fn with_table(self, spec: TableSpec) -> Self {
        self.lock()
            .tables
            .insert(spec.name().to_string(), spec);
        self
    }

    /// Make every load into `table` fail with `message`.
    pub fn fail_loads_for(self, table: impl Into<String>, message: impl Into<String>) -> Self {
        self.lock()
            .failing_loads
            .insert(table.into(), message.into());
        self
    }

    /// Simulate losing the connection: every catalog query fails from now on.
    pub fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    /// Current schema of a table.
    pub fn table(&self, name: &str) -> Option<TableSpec> {
        self.lock().tables.get(name).cloned()
    }

    /// Tables created through [`Database::create_table`], in order.
    pub fn created_tables(&self) -> Vec<String> {
        self.lock().created.clone()
    }

    /// Every load plan received, in order.
    pub fn loads(&self) -> Vec<LoadPlan> {
        self.lock().loads.clone()
    }

    /// Every rendered statement, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Database for MemoryDatabase {
    fn flavor(&self) -> SqlFlavor {
        self.flavor
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let state = self.lock();
        if state.disconnected {
            return Err(ImportError::Connection("database went away".to_string()));
        }
        Ok(state.tables.contains_key(name))
    }

    fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let sql = self.flavor.create_table(spec);
        let mut state = self.lock();
        state.statements.push(sql);
        if !state.tables.contains_key(spec.name()) {
            state.tables.insert(spec.name().to_string(), spec.clone());
            state.created.push(spec.name().to_string());
        }
        Ok(())
    }

    fn bulk_load(&self, plan: &LoadPlan) -> Result<()> {
        let sql = self.flavor.load(plan);
        let mut state = self.lock();
        if let Some(message) = state.failing_loads.get(&plan.table) {
            return Err(ImportError::LoadExecution {
                table: plan.table.clone(),
                message: message.clone(),
            });
        }
        if !state.tables.contains_key(&plan.table) {
            return Err(ImportError::LoadExecution {
                table: plan.table.clone(),
                message: format!("Table '{}' does not exist", plan.table),
            });
        }
        state.statements.push(sql);
        state.loads.push(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, TableFields};
    use std::path::PathBuf;

    fn spec(name: &str) -> TableSpec {
        let mut fields = TableFields::new();
        fields.insert("id".to_string(), ColumnType::ShortText);
        TableSpec::new(name, fields).unwrap()
    }

    fn plan(table: &str) -> LoadPlan {
        LoadPlan {
            table: table.to_string(),
            source: PathBuf::from("/data/orders.csv"),
            delimiter: ',',
            enclosure: '"',
            escape: None,
            skip_lines: 1,
        }
    }

    #[test]
    fn test_create_is_idempotent() {
        let db = MemoryDatabase::new();
        db.create_table(&spec("CS_orders")).unwrap();
        db.create_table(&spec("CS_orders")).unwrap();

        assert_eq!(db.created_tables(), vec!["CS_orders"]);
        assert!(db.table_exists("CS_orders").unwrap());
        assert!(!db.table_exists("cs_orders").unwrap());
    }

    #[test]
    fn test_load_requires_table() {
        let db = MemoryDatabase::new();
        assert!(db.bulk_load(&plan("CS_orders")).is_err());

        let db = db.with_table(spec("CS_orders"));
        db.bulk_load(&plan("CS_orders")).unwrap();
        assert_eq!(db.loads().len(), 1);
    }

    #[test]
    fn test_records_rendered_statements() {
        let db = MemoryDatabase::with_flavor(SqlFlavor::MySql).with_table(spec("CS_orders"));
        db.bulk_load(&plan("CS_orders")).unwrap();
        assert!(db.statements()[0].starts_with("LOAD DATA INFILE"));
    }

    #[test]
    fn test_disconnect() {
        let db = MemoryDatabase::new();
        db.disconnect();
        assert!(db.table_exists("CS_orders").unwrap_err().is_fatal());
    }
}
