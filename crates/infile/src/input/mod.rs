//! Input parsing and source file handling.

mod dialect;
mod discovery;
mod reader;
mod record;

pub use dialect::Dialect;
pub use discovery::{CSV_EXTENSION, list_csv_files};
pub use reader::{ReaderState, RecordReader};
pub use record::Record;
