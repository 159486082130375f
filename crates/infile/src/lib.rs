//! infile: bulk-load a directory of CSV files into database tables.
//!
//! Every `*.csv` file becomes one table named after the file. Column types
//! are inferred from a first streaming pass over the file, the table is
//! created if it does not exist yet, and the database's native bulk loader
//! then reads the file itself in a second pass.
//!
//! # Core Principles
//!
//! - **Two passes**: inference streams the file once; the load engine reads it again
//! - **Non-destructive**: existing tables are never altered, only loaded into
//! - **Explicit policy**: the quote-escaping convention is chosen per table by configuration
//!
//! # Example
//!
//! ```no_run
//! use infile::{DuckDbDatabase, ImportConfig, ImportOrchestrator};
//!
//! let db = DuckDbDatabase::open("warehouse.duckdb").unwrap();
//! let config = ImportConfig::default().with_special_tables(["CS_comments"]);
//! let report = ImportOrchestrator::new(&db, config).run("exports/").unwrap();
//!
//! println!("Loaded: {}", report.loaded_count());
//! println!("Failed: {}", report.failures.len());
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod inference;
pub mod input;
pub mod load;
pub mod provision;
pub mod schema;

mod orchestrator;

pub use config::ImportConfig;
pub use database::{Database, DuckDbDatabase, MemoryDatabase, SqlFlavor};
pub use error::{ImportError, Result};
pub use inference::{InferredSchema, SchemaInferencer};
pub use input::{Dialect, Record, RecordReader};
pub use load::{BulkLoadPlanner, LoadPlan, SpecialTables};
pub use orchestrator::{FileFailure, FileReport, FileStatus, ImportOrchestrator, ImportReport};
pub use provision::{ProvisionOutcome, TableProvisioner};
pub use schema::{ColumnType, TableFields, TableSpec};
