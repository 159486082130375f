//! Directory import: one table per CSV file, two passes per file.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::{debug, error, info, info_span, warn};

use crate::config::ImportConfig;
use crate::database::Database;
use crate::error::{ImportError, Result};
use crate::inference::SchemaInferencer;
use crate::input::{RecordReader, list_csv_files};
use crate::load::BulkLoadPlanner;
use crate::provision::{ProvisionOutcome, TableProvisioner};
use crate::schema::table_name_for;

type ProgressFn<'a> = Box<dyn FnMut(&Path, usize) + 'a>;

/// What happened to a file that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// The file was handed to the load engine.
    Loaded {
        /// True if the table was created during this run.
        created: bool,
        /// Number of columns in the file.
        columns: usize,
        /// Records read by inference; `None` when the table already existed.
        records_inferred: Option<usize>,
        /// Rows in the table after the load, when the backend reports it.
        rows_in_table: Option<u64>,
    },
    /// The file had no data rows.
    Skipped,
}

/// Outcome for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub table: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    /// True if the file was loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, FileStatus::Loaded { .. })
    }

    /// True if the table was created for this file.
    pub fn created_table(&self) -> bool {
        matches!(self.status, FileStatus::Loaded { created: true, .. })
    }
}

/// A file that could not be imported.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    /// `None` when no table name could be derived.
    pub table: Option<String>,
    #[serde(serialize_with = "error_message")]
    pub error: ImportError,
}

fn error_message<S: Serializer>(error: &ImportError, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Everything a run did, in file order.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub source: PathBuf,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

impl ImportReport {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            files: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files loaded.
    pub fn loaded_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_loaded()).count()
    }

    /// Number of files skipped for having no data.
    pub fn skipped_count(&self) -> usize {
        self.files.len() - self.loaded_count()
    }

    /// Tables created during the run.
    pub fn created_tables(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.created_table())
            .map(|f| f.table.as_str())
            .collect()
    }
}

/// Imports every CSV file of a directory into its own table.
///
/// # Example
///
/// ```no_run
/// use infile::{DuckDbDatabase, ImportConfig, ImportOrchestrator};
///
/// let db = DuckDbDatabase::open("warehouse.duckdb")?;
/// let mut orchestrator = ImportOrchestrator::new(&db, ImportConfig::default());
/// let report = orchestrator.run("exports/")?;
///
/// for failure in &report.failures {
///     eprintln!("{}: {}", failure.path.display(), failure.error);
/// }
/// # Ok::<(), infile::ImportError>(())
/// ```
pub struct ImportOrchestrator<'a, D: Database + ?Sized> {
    db: &'a D,
    config: ImportConfig,
    inferencer: SchemaInferencer,
    planner: BulkLoadPlanner,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, D: Database + ?Sized> ImportOrchestrator<'a, D> {
    /// Create an orchestrator loading into `db`.
    pub fn new(db: &'a D, config: ImportConfig) -> Self {
        let inferencer = SchemaInferencer::new(config.dialect, config.special_tables.clone());
        let planner = BulkLoadPlanner::new(config.dialect, config.special_tables.clone());
        Self {
            db,
            config,
            inferencer,
            planner,
            progress: None,
        }
    }

    /// Receive `(file, records read)` after every record of an inference pass.
    pub fn with_progress(mut self, progress: impl FnMut(&Path, usize) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import every `*.csv` file directly inside `source_dir`, in name order.
    ///
    /// A failing file is recorded in the report and the run moves on. Only
    /// an unreadable directory or a lost database connection end the run
    /// with an error.
    pub fn run(&mut self, source_dir: impl AsRef<Path>) -> Result<ImportReport> {
        let source_dir = source_dir.as_ref();
        let files = list_csv_files(source_dir)?;
        info!(dir = %source_dir.display(), files = files.len(), "starting import");

        let mut report = ImportReport::new(source_dir);
        for path in files {
            let table = match table_name_for(&path, &self.config.table_prefix) {
                Ok(table) => table,
                Err(err) => {
                    error!(file = %path.display(), error = %err, "import failed");
                    report.failures.push(FileFailure {
                        path,
                        table: None,
                        error: err,
                    });
                    continue;
                }
            };

            match self.import_as(&path, &table) {
                Ok(file) => report.files.push(file),
                Err(err) if err.is_fatal() => {
                    error!(file = %path.display(), table = %table, error = %err, "aborting import");
                    return Err(err);
                }
                Err(err) => {
                    error!(file = %path.display(), table = %table, error = %err, "import failed");
                    report.failures.push(FileFailure {
                        path,
                        table: Some(table),
                        error: err,
                    });
                }
            }
        }

        info!(
            loaded = report.loaded_count(),
            skipped = report.skipped_count(),
            failed = report.failures.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Import a single file into the table named after it.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<FileReport> {
        let path = path.as_ref();
        let table = table_name_for(path, &self.config.table_prefix)?;
        self.import_as(path, &table)
    }

    fn import_as(&mut self, path: &Path, table: &str) -> Result<FileReport> {
        let span = info_span!("import_file", file = %path.display(), table);
        let _guard = span.enter();

        let dialect = self.config.special_tables.dialect_for(table, self.config.dialect);
        let mut reader = RecordReader::open(path, dialect)?;
        if reader.next_record()?.is_none() {
            warn!("no records found, skipping file");
            return Ok(FileReport {
                path: path.to_path_buf(),
                table: table.to_string(),
                status: FileStatus::Skipped,
            });
        }
        let fields_found = reader.header()?.map_or(0, <[String]>::len);
        drop(reader);
        info!(fields = fields_found, "fields found");

        let (created, columns, records_inferred) = if self.db.table_exists(table)? {
            debug!("table exists, skipping inference");
            (false, fields_found, None)
        } else {
            let progress = &mut self.progress;
            let mut forward = |count: usize| {
                if let Some(report) = progress.as_mut() {
                    report(path, count);
                }
            };
            let schema = self.inferencer.infer_file(path, table, Some(&mut forward))?;
            info!(records = schema.record_count, columns = schema.fields.len(), "inferred schema");

            let outcome = TableProvisioner::new(self.db).ensure_table(table, &schema.fields)?;
            (
                outcome == ProvisionOutcome::Created,
                schema.fields.len(),
                Some(schema.record_count),
            )
        };

        let source = path
            .canonicalize()
            .map_err(|e| ImportError::from_open(path, e))?;
        let plan = self.planner.plan(table, &source);
        let outcome = self.planner.execute(self.db, &plan)?;
        info!(rows = ?outcome.rows_in_table, "file loaded");

        Ok(FileReport {
            path: path.to_path_buf(),
            table: table.to_string(),
            status: FileStatus::Loaded {
                created,
                columns,
                records_inferred,
                rows_in_table: outcome.rows_in_table,
            },
        })
    }
}
