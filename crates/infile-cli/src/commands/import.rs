//! Import command - load every CSV file of a directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use infile::{
    Database, DuckDbDatabase, FileStatus, ImportConfig, ImportOrchestrator, ImportReport,
    MemoryDatabase, SqlFlavor,
};

use crate::cli::DialectArgs;

/// Records between two progress updates.
const PROGRESS_EVERY: usize = 1000;

#[allow(clippy::too_many_arguments)]
pub fn run(
    source: PathBuf,
    database: PathBuf,
    config_path: Option<PathBuf>,
    prefix: Option<String>,
    special_tables: Vec<String>,
    dialect: DialectArgs,
    dry_run: bool,
    flavor: SqlFlavor,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !source.is_dir() {
        return Err(format!("Source directory not found: {}", source.display()).into());
    }
    if !dry_run && flavor != SqlFlavor::DuckDb {
        return Err(format!("--flavor {} is only available with --dry-run", flavor).into());
    }

    let mut config = match &config_path {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };
    if let Some(prefix) = prefix {
        config.table_prefix = prefix;
    }
    config.dialect = dialect.apply(config.dialect);
    config.validate()?;
    let config = config.with_special_tables(special_tables);

    if !json_output {
        let target = if dry_run {
            format!("dry run, {} statements", flavor)
        } else {
            database.display().to_string()
        };
        println!(
            "{} {} {} {}",
            "Importing".cyan().bold(),
            source.display().to_string().white(),
            "into".cyan(),
            target.white()
        );
    }

    if dry_run {
        let db = MemoryDatabase::with_flavor(flavor);
        let report = import(&db, config, &source, !json_output)?;
        let statements = db.statements();

        if json_output {
            let output = serde_json::json!({
                "report": report,
                "statements": statements,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_report(&report);
            println!();
            println!("{}", "Statements:".yellow().bold());
            for statement in &statements {
                println!("  {}", statement);
            }
        }
        finish(&report)
    } else {
        let db = DuckDbDatabase::open(&database)?;
        let report = import(&db, config, &source, !json_output)?;

        if json_output {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        finish(&report)
    }
}

fn import<D: Database>(
    db: &D,
    config: ImportConfig,
    source: &Path,
    show_progress: bool,
) -> infile::Result<ImportReport> {
    let mut progress = ProgressLine::new(std::io::stderr());

    let report = {
        let mut orchestrator = ImportOrchestrator::new(db, config);
        if show_progress {
            orchestrator = orchestrator.with_progress(|path, count| progress.update(path, count));
        }
        orchestrator.run(source)
    };

    progress.finish();
    report
}

/// A `records processed` line that is redrawn in place.
///
/// Only the first record and every [`PROGRESS_EVERY`]th are drawn while a
/// file streams. The last count of a file is always drawn before moving on.
struct ProgressLine<W: Write> {
    out: W,
    current: Option<PathBuf>,
    count: usize,
    drawn: usize,
}

impl<W: Write> ProgressLine<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            current: None,
            count: 0,
            drawn: 0,
        }
    }

    fn update(&mut self, path: &Path, count: usize) {
        if self.current.as_deref() != Some(path) {
            self.finish();
            self.current = Some(path.to_path_buf());
        }
        self.count = count;
        if count == 1 || count % PROGRESS_EVERY == 0 {
            self.draw();
        }
    }

    /// Draw the final count of the current file and end its line.
    fn finish(&mut self) {
        if self.current.take().is_none() {
            return;
        }
        if self.drawn != self.count {
            self.draw();
        }
        let _ = writeln!(self.out);
        self.count = 0;
        self.drawn = 0;
    }

    fn draw(&mut self) {
        let _ = write!(self.out, "\r  {} records processed", self.count);
        let _ = self.out.flush();
        self.drawn = self.count;
    }
}

fn print_report(report: &ImportReport) {
    println!();
    for file in &report.files {
        let name = file_name(&file.path);
        match &file.status {
            FileStatus::Loaded {
                created,
                columns,
                rows_in_table,
                ..
            } => {
                let table_note = if *created {
                    format!("created, {} columns", columns)
                } else {
                    "existing table".to_string()
                };
                let rows = rows_in_table
                    .map(|n| format!(", {} rows in table", n))
                    .unwrap_or_default();
                println!(
                    "  {} {} -> {} ({}{})",
                    "✓".green(),
                    name.white(),
                    file.table.white().bold(),
                    table_note,
                    rows
                );
            }
            FileStatus::Skipped => {
                println!(
                    "  {} {} skipped: no records found",
                    "-".yellow(),
                    name.white()
                );
            }
        }
    }

    for failure in &report.failures {
        println!(
            "  {} {} -> {}: {}",
            "✗".red(),
            file_name(&failure.path).white(),
            failure.table.as_deref().unwrap_or("?").white().bold(),
            failure.error.to_string().red()
        );
    }

    println!();
    println!(
        "Loaded {} files, skipped {}, failed {}",
        report.loaded_count().to_string().green().bold(),
        report.skipped_count().to_string().yellow(),
        report.failures.len().to_string().red()
    );
}

fn finish(report: &ImportReport) -> Result<(), Box<dyn std::error::Error>> {
    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed to import", report.failures.len()).into())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
