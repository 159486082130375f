//! Idempotent table provisioning from an inferred schema.

use serde::Serialize;
use tracing::{debug, info};

use crate::database::Database;
use crate::error::Result;
use crate::schema::{TableFields, TableSpec};

/// What [`TableProvisioner::ensure_table`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// The table was missing and has been created.
    Created,
    /// The table was already there and was left untouched.
    AlreadyExists,
}

/// Creates destination tables, never altering existing ones.
pub struct TableProvisioner<'a, D: Database + ?Sized> {
    db: &'a D,
}

impl<'a, D: Database + ?Sized> TableProvisioner<'a, D> {
    /// Create a provisioner working against `db`.
    pub fn new(db: &'a D) -> Self {
        Self { db }
    }

    /// Make sure a table called `name` exists.
    ///
    /// The name and fields are checked first, so an empty schema is an
    /// error even when the table already exists. An existing table is a
    /// no-op success whatever its columns are. A missing table is created
    /// with one column per field, in order.
    pub fn ensure_table(&self, name: &str, fields: &TableFields) -> Result<ProvisionOutcome> {
        let spec = TableSpec::new(name, fields.clone())?;

        if self.db.table_exists(name)? {
            debug!(table = name, "table already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        self.db.create_table(&spec)?;
        info!(table = name, columns = spec.column_count(), "created table");
        Ok(ProvisionOutcome::Created)
    }
}
