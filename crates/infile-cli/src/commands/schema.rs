//! Schema command - show the column types inferred for one file.

use std::path::PathBuf;

use colored::Colorize;
use infile::schema::{DEFAULT_TABLE_PREFIX, table_name_for};
use infile::{Dialect, RecordReader, SchemaInferencer, SpecialTables, TableSpec};

use crate::cli::DialectArgs;

pub fn run(
    file: PathBuf,
    special: bool,
    dialect: DialectArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = table_name_for(&file, DEFAULT_TABLE_PREFIX)?;

    let mut dialect = dialect.apply(Dialect::default());
    if special {
        dialect = dialect.doubled_enclosure();
    }
    dialect.validate()?;

    let reader = RecordReader::open(&file, dialect)?;
    let schema = SchemaInferencer::new(dialect, SpecialTables::new()).infer(reader, None)?;

    if json_output {
        let output = serde_json::json!({
            "table": table,
            "records": schema.record_count,
            "columns": schema.fields,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if schema.is_empty() {
        println!(
            "{} {}",
            "No records found in".yellow(),
            file.display().to_string().white()
        );
        return Ok(());
    }

    let spec = TableSpec::new(table, schema.fields)?;
    println!(
        "{} {} ({} records)",
        "Schema for".cyan().bold(),
        spec.name().white().bold(),
        schema.record_count
    );
    println!();
    for (column, column_type) in spec.columns() {
        println!(
            "  {:30} {:12} {}",
            column,
            column_type.to_string(),
            column_type.sql_type().dimmed()
        );
    }

    Ok(())
}
