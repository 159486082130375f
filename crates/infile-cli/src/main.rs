//! infile CLI - load a directory of CSV files into database tables.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_flags(cli.verbose, cli.quiet)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone());
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Import {
            source,
            database,
            config,
            prefix,
            special_tables,
            dialect,
            dry_run,
            flavor,
            json,
        } => commands::import::run(
            source,
            database,
            config,
            prefix,
            special_tables,
            dialect,
            dry_run,
            flavor,
            json,
        ),

        Commands::Schema {
            file,
            special,
            dialect,
            json,
        } => commands::schema::run(file, special, dialect, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
