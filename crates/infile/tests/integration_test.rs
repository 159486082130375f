//! Integration tests for infile: whole directories through both backends.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use infile::{
    ColumnType, Database, DuckDbDatabase, FileStatus, ImportConfig, ImportError,
    ImportOrchestrator, MemoryDatabase, SqlFlavor,
};

/// Helper to write a file into the source directory.
fn write_csv(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write test file");
}

fn orders_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_csv(dir.path(), "orders.csv", "id,name\n1,apple\n2,pear\n");
    dir
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[test]
fn test_orders_creates_table_and_loads() {
    let dir = orders_dir();
    let db = MemoryDatabase::new();

    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .expect("Import failed");

    assert!(report.is_success());
    assert_eq!(db.created_tables(), vec!["CS_orders"]);

    let table = db.table("CS_orders").expect("table missing");
    assert_eq!(table.column_names(), vec!["id", "name"]);
    assert_eq!(table.column_type("id"), Some(ColumnType::ShortText));
    assert_eq!(table.column_type("name"), Some(ColumnType::ShortText));

    let loads = db.loads();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].table, "CS_orders");
    assert!(loads[0].source.ends_with("orders.csv"));
    assert_eq!(loads[0].escape, None);
    assert_eq!(loads[0].skip_lines, 1);
}

#[test]
fn test_rerun_only_loads() {
    let dir = orders_dir();
    let db = MemoryDatabase::new();

    ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .expect("First import failed");
    let schema_before = db.table("CS_orders");

    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .expect("Second import failed");

    assert!(report.is_success());
    assert!(report.created_tables().is_empty());
    assert_eq!(db.created_tables(), vec!["CS_orders"]);
    assert_eq!(db.table("CS_orders"), schema_before);
    assert_eq!(db.loads().len(), 2);
    assert!(matches!(
        report.files[0].status,
        FileStatus::Loaded {
            created: false,
            records_inferred: None,
            ..
        }
    ));
}

#[test]
fn test_duckdb_end_to_end_is_idempotent() {
    let dir = orders_dir();
    let db_dir = TempDir::new().unwrap();
    let db_path = db_dir.path().join("warehouse.duckdb");

    {
        let db = DuckDbDatabase::open(&db_path).unwrap();
        let report = ImportOrchestrator::new(&db, ImportConfig::default())
            .run(dir.path())
            .unwrap();
        assert!(report.is_success());
        assert_eq!(report.created_tables(), vec!["CS_orders"]);
        assert_eq!(db.row_count("CS_orders").unwrap(), Some(2));
    }

    let db = DuckDbDatabase::open(&db_path).unwrap();
    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    assert!(report.is_success());
    assert!(report.created_tables().is_empty());
    assert_eq!(db.row_count("CS_orders").unwrap(), Some(4));

    let name: String = db
        .connection()
        .query_row(
            "SELECT name FROM \"CS_orders\" WHERE id = '2' LIMIT 1",
            duckdb::params![],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "pear");
}

#[test]
fn test_duckdb_case_only_name_clash_is_a_failure() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "Orders.csv", "id,name\n1,apple\n");
    write_csv(dir.path(), "orders.csv", "sku,price\nX1,9.99\n");

    let db = DuckDbDatabase::open_in_memory().unwrap();
    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    assert_eq!(report.created_tables(), vec!["CS_Orders"]);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.table.as_deref(), Some("CS_orders"));
    assert!(matches!(failure.error, ImportError::CreateTable { .. }));
    assert!(failure.error.to_string().contains("CS_Orders"));

    assert_eq!(db.row_count("CS_Orders").unwrap(), Some(1));
}

// =============================================================================
// Empty files and failure isolation
// =============================================================================

#[test]
fn test_empty_and_header_only_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "empty.csv", "");
    write_csv(dir.path(), "header_only.csv", "id,name\n");
    write_csv(dir.path(), "blank_lines.csv", "id,name\n\n\n");

    let db = MemoryDatabase::new();
    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.skipped_count(), 3);
    assert_eq!(report.loaded_count(), 0);
    assert!(db.created_tables().is_empty());
    assert!(db.loads().is_empty());
}

#[test]
fn test_bad_file_is_reported_and_batch_continues() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "a_orders.csv", "id,name\n1,apple\n");
    write_csv(dir.path(), "b_broken.csv", "id,name\n1,apple\n2\n");
    write_csv(dir.path(), "c_items.csv", "sku\nX1\n");

    let db = MemoryDatabase::new();
    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.loaded_count(), 2);
    assert_eq!(report.failures.len(), 1);

    let failure = &report.failures[0];
    assert!(failure.path.ends_with("b_broken.csv"));
    assert_eq!(failure.table.as_deref(), Some("CS_b_broken"));
    match &failure.error {
        ImportError::SchemaMismatch {
            line,
            expected,
            actual,
            ..
        } => {
            assert_eq!(*line, 3);
            assert_eq!(*expected, 2);
            assert_eq!(*actual, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(db.created_tables(), vec!["CS_a_orders", "CS_c_items"]);
}

#[test]
fn test_load_failure_is_reported() {
    let dir = orders_dir();
    let db = MemoryDatabase::new().fail_loads_for("CS_orders", "permission denied on server");

    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        ImportError::LoadExecution { .. }
    ));
    // The table stays behind empty; a later run loads straight into it.
    assert_eq!(db.created_tables(), vec!["CS_orders"]);
}

#[test]
fn test_lost_connection_aborts_run() {
    let dir = orders_dir();
    let db = MemoryDatabase::new();
    db.disconnect();

    let err = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_missing_directory() {
    let db = MemoryDatabase::new();
    let err = ImportOrchestrator::new(&db, ImportConfig::default())
        .run("/definitely/not/a/dir")
        .unwrap_err();
    assert!(matches!(err, ImportError::DirectoryRead { .. }));
}

// =============================================================================
// Discovery and naming
// =============================================================================

#[test]
fn test_only_csv_files_in_name_order() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "b.csv", "id\n1\n");
    write_csv(dir.path(), "a.csv", "id\n1\n");
    write_csv(dir.path(), "notes.txt", "id\n1\n");
    write_csv(dir.path(), "upper.CSV", "id\n1\n");
    fs::create_dir(dir.path().join("nested.csv")).unwrap();

    let db = MemoryDatabase::new();
    let report = ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    let tables: Vec<&str> = report.files.iter().map(|f| f.table.as_str()).collect();
    assert_eq!(tables, vec!["CS_a", "CS_b"]);
}

#[test]
fn test_custom_prefix() {
    let dir = orders_dir();
    let db = MemoryDatabase::new();
    ImportOrchestrator::new(&db, ImportConfig::default().with_prefix("raw_"))
        .run(dir.path())
        .unwrap();
    assert_eq!(db.created_tables(), vec!["raw_orders"]);
}

// =============================================================================
// Special tables and wide files
// =============================================================================

#[test]
fn test_special_table_loads_with_doubled_quotes() {
    let dir = TempDir::new().unwrap();
    write_csv(
        dir.path(),
        "notes.csv",
        "id,note\n1,\"she said \"\"hi\"\"\"\n2,plain\n",
    );

    let db_dir = TempDir::new().unwrap();
    let db = DuckDbDatabase::open(db_dir.path().join("notes.duckdb")).unwrap();
    let config = ImportConfig::default().with_special_tables(["CS_notes"]);
    let report = ImportOrchestrator::new(&db, config).run(dir.path()).unwrap();

    assert!(report.is_success());
    let note: String = db
        .connection()
        .query_row("SELECT note FROM \"CS_notes\" WHERE id = '1'", duckdb::params![], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(note, "she said \"hi\"");
}

#[test]
fn test_special_table_plan_uses_enclosure_escape() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "notes.csv", "id\n1\n");
    write_csv(dir.path(), "orders.csv", "id\n1\n");

    let db = MemoryDatabase::new();
    let config = ImportConfig::default().with_special_tables(["CS_notes"]);
    ImportOrchestrator::new(&db, config).run(dir.path()).unwrap();

    let loads = db.loads();
    assert_eq!(loads[0].table, "CS_notes");
    assert_eq!(loads[0].escape, Some('"'));
    assert_eq!(loads[1].table, "CS_orders");
    assert_eq!(loads[1].escape, None);
}

#[test]
fn test_wide_file_column_types_follow_position() {
    let dir = TempDir::new().unwrap();
    let long = "x".repeat(300);
    write_csv(
        dir.path(),
        "wide.csv",
        &format!("a,b,c,d,e,f,g\n{},{},c,d,e,f,g\n", "y".repeat(10), long),
    );

    let db = MemoryDatabase::new();
    ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    let table = db.table("CS_wide").unwrap();
    let types: Vec<ColumnType> = table.columns().values().copied().collect();
    assert_eq!(
        types,
        vec![
            ColumnType::ShortText,
            ColumnType::LongText,
            ColumnType::ShortText,
            ColumnType::ShortText,
            ColumnType::ShortText,
            ColumnType::ShortText,
            ColumnType::LongText,
        ]
    );
}

#[test]
fn test_dry_run_renders_mysql_statements() {
    let dir = orders_dir();
    let db = MemoryDatabase::with_flavor(SqlFlavor::MySql);
    ImportOrchestrator::new(&db, ImportConfig::default())
        .run(dir.path())
        .unwrap();

    let statements = db.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS `CS_orders`"));
    assert!(statements[0].contains("`id` VARCHAR(255)"));
    assert!(statements[1].starts_with("LOAD DATA INFILE"));
    assert!(statements[1].contains("IGNORE 1 LINES"));
    assert!(!statements[1].contains("ESCAPED BY"));
}
