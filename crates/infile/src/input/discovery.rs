//! Source directory listing.

use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};

/// Extension of the files picked up from a source directory.
pub const CSV_EXTENSION: &str = "csv";

/// Lists all `*.csv` files directly inside `dir`.
///
/// Subdirectories are not descended into. The match on the extension is
/// case-sensitive, so `a.csv` and `a.CSV` can never map to the same table.
/// Returns files sorted by path.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ImportError::DirectoryRead {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ImportError::DirectoryRead {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ImportError::DirectoryRead {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == CSV_EXTENSION);

        if is_csv {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
