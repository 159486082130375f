//! Error types for the infile library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for import operations.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The path does not name an existing file.
    #[error("File '{path}' does not exist")]
    NotFound { path: PathBuf },

    /// The file exists but cannot be opened for reading.
    #[error("File '{path}' is not readable: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row has a different number of fields than the header.
    #[error("'{path}' line {line}: expecting to get {expected} columns, actually got {actual}")]
    SchemaMismatch {
        path: PathBuf,
        line: u64,
        expected: usize,
        actual: usize,
    },

    /// The header names the same column more than once.
    #[error("'{path}': column '{column}' appears more than once in the header")]
    DuplicateColumn { path: PathBuf, column: String },

    /// Error from the CSV library while reading a file.
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The inferred or requested schema cannot be turned into a table.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The database refused to create a table.
    #[error("Failed to create table '{table}': {message}")]
    CreateTable { table: String, message: String },

    /// The load engine rejected a bulk load.
    #[error("Bulk load into '{table}' failed: {message}")]
    LoadExecution { table: String, message: String },

    /// The database cannot be reached. No further file can succeed.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// A file name cannot be turned into a table name.
    #[error("Cannot derive a table name from '{path}'")]
    InvalidFileName { path: PathBuf },

    /// The source directory is missing or cannot be listed.
    #[error("Cannot read directory '{path}': {message}")]
    DirectoryRead { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImportError {
    /// Returns true if the error must abort the whole batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ImportError::Connection(_))
    }

    /// Maps an error from opening `path` to the matching variant.
    pub(crate) fn from_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => ImportError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => ImportError::Permission { path, source },
            _ => ImportError::Io { path, source },
        }
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
