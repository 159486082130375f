//! Table name derivation from source file paths.

use std::path::Path;

use crate::error::{ImportError, Result};

/// Prefix put in front of every derived table name.
pub const DEFAULT_TABLE_PREFIX: &str = "CS_";

/// Derive the destination table for a source file.
///
/// The name is `prefix` followed by the file name with its final extension
/// removed (`data/orders.csv` -> `CS_orders`). Only the file name takes part,
/// so the directory never leaks into the table name, and two distinct file
/// names in one directory always give two distinct tables.
pub fn table_name_for(path: &Path, prefix: &str) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ImportError::InvalidFileName {
            path: path.to_path_buf(),
        })?;

    Ok(format!("{prefix}{stem}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_for() {
        let name = table_name_for(Path::new("/data/export/orders.csv"), "CS_").unwrap();
        assert_eq!(name, "CS_orders");
    }

    #[test]
    fn test_directory_name_inside_file_name() {
        let name = table_name_for(Path::new("/data/export/export_orders.csv"), "CS_").unwrap();
        assert_eq!(name, "CS_export_orders");
    }

    #[test]
    fn test_only_last_extension_is_removed() {
        let name = table_name_for(Path::new("orders.2024.csv"), "").unwrap();
        assert_eq!(name, "orders.2024");
    }

    #[test]
    fn test_no_file_name() {
        assert!(matches!(
            table_name_for(Path::new("/"), "CS_"),
            Err(ImportError::InvalidFileName { .. })
        ));
    }
}
