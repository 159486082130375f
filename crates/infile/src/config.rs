//! Import configuration and its JSON file form.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::input::Dialect;
use crate::load::SpecialTables;
use crate::schema::DEFAULT_TABLE_PREFIX;

/// Settings shared by every file of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Prepended to every file stem to form the table name.
    pub table_prefix: String,
    /// How the source files are written.
    pub dialect: Dialect,
    /// Tables whose files escape quotes by doubling them.
    pub special_tables: SpecialTables,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            dialect: Dialect::default(),
            special_tables: SpecialTables::new(),
        }
    }
}

impl ImportConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Add tables to the special-table list.
    pub fn with_special_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.special_tables.extend(tables);
        self
    }

    /// Check the dialect.
    pub fn validate(&self) -> Result<()> {
        self.dialect.validate()
    }

    /// Load a configuration from a JSON file. Missing keys take defaults.
    ///
    /// ```no_run
    /// # use infile::ImportConfig;
    /// let config = ImportConfig::load("infile.json").unwrap();
    /// println!("prefix: {}", config.table_prefix);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| ImportError::from_open(path, e))?;
        let config: ImportConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                ImportError::Config(format!("Failed to parse '{}': {}", path.display(), e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ImportError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| ImportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
