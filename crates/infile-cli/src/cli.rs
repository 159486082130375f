//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use infile::SqlFlavor;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// infile: load a directory of CSV files into database tables
#[derive(Parser)]
#[command(name = "infile")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import every *.csv file of a directory, one table per file
    Import {
        /// Directory holding the CSV files
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// DuckDB database file to load into
        #[arg(short, long, default_value = "infile.duckdb")]
        database: PathBuf,

        /// JSON configuration file (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Prefix prepended to every table name
        #[arg(short, long)]
        prefix: Option<String>,

        /// Table whose file escapes quotes by doubling them (repeatable)
        #[arg(long = "special-table", value_name = "TABLE")]
        special_tables: Vec<String>,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Print the statements instead of touching a database
        #[arg(long)]
        dry_run: bool,

        /// SQL flavor for --dry-run output (duckdb, mysql)
        #[arg(long, default_value = "duckdb")]
        flavor: SqlFlavor,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the column types inferred for one file
    Schema {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Read the file with doubled-quote escaping
        #[arg(long)]
        special: bool,

        #[command(flatten)]
        dialect: DialectArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overrides for how source files are written.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DialectArgs {
    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Quote character
    #[arg(long)]
    pub enclosure: Option<char>,

    /// Escape character inside quoted fields
    #[arg(long)]
    pub escape: Option<char>,

    /// Files have no header row; columns are named column_1, column_2, ...
    #[arg(long)]
    pub no_header: bool,
}

impl DialectArgs {
    /// Apply the overrides that were given to `dialect`.
    pub fn apply(&self, mut dialect: infile::Dialect) -> infile::Dialect {
        if let Some(delimiter) = self.delimiter {
            dialect = dialect.with_delimiter(delimiter);
        }
        if let Some(enclosure) = self.enclosure {
            dialect = dialect.with_enclosure(enclosure);
        }
        if let Some(escape) = self.escape {
            dialect = dialect.with_escape(Some(escape));
        }
        if self.no_header {
            dialect = dialect.with_header(false);
        }
        dialect
    }
}
