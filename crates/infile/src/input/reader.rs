//! Streaming record reader with a header contract.
//!
//! A [`RecordReader`] walks one file row by row without buffering it. The
//! session moves through an explicit set of states:
//!
//! ```text
//! Unopened --open--> HeaderPending --header/next--> Streaming --next--> Exhausted
//!     |                    |                            |
//!     +--------------------+------------> Errored <-----+
//! ```
//!
//! Once `Exhausted` or `Errored`, every further call reports end-of-stream.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::StringRecord;

use super::dialect::Dialect;
use super::record::Record;
use crate::error::{ImportError, Result};

/// Observable state of a reader session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Created, file not yet opened.
    Unopened,
    /// File opened, header row not yet read.
    HeaderPending,
    /// Header known, data rows being produced.
    Streaming,
    /// All rows produced.
    Exhausted,
    /// A failure ended the session.
    Errored,
}

enum Session {
    Unopened,
    HeaderPending(csv::Reader<File>),
    Streaming {
        reader: csv::Reader<File>,
        header: Arc<[String]>,
        pending: Option<Record>,
    },
    Exhausted,
    Errored,
}

/// Reads one delimited file as a sequence of [`Record`]s.
pub struct RecordReader {
    path: PathBuf,
    dialect: Dialect,
    session: Session,
    header: Option<Arc<[String]>>,
    buffer: StringRecord,
}

impl RecordReader {
    /// Create an unopened reader. Nothing touches the filesystem until
    /// the first call to [`header`](Self::header) or `next`.
    pub fn new(path: impl AsRef<Path>, dialect: Dialect) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dialect,
            session: Session::Unopened,
            header: None,
            buffer: StringRecord::new(),
        }
    }

    /// Open a session over `path`.
    ///
    /// Fails if the path is not an existing file or cannot be opened for
    /// reading. No bytes are read yet.
    pub fn open(path: impl AsRef<Path>, dialect: Dialect) -> Result<Self> {
        let mut reader = Self::new(path, dialect);
        reader.start()?;
        Ok(reader)
    }

    /// Path of the file being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dialect of this session.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Current session state.
    pub fn state(&self) -> ReaderState {
        match self.session {
            Session::Unopened => ReaderState::Unopened,
            Session::HeaderPending(_) => ReaderState::HeaderPending,
            Session::Streaming { .. } => ReaderState::Streaming,
            Session::Exhausted => ReaderState::Exhausted,
            Session::Errored => ReaderState::Errored,
        }
    }

    /// Column names, reading the header row if that has not happened yet.
    ///
    /// Returns `None` for a file with no rows at all.
    pub fn header(&mut self) -> Result<Option<&[String]>> {
        if matches!(self.session, Session::Unopened) {
            self.start()?;
        }
        self.read_header()?;
        Ok(self.header.as_deref())
    }

    /// Produce the next record, or `None` at end-of-stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if matches!(self.session, Session::Unopened) {
            self.start()?;
        }
        self.read_header()?;

        let outcome = match &mut self.session {
            Session::Streaming {
                reader,
                header,
                pending,
            } => {
                if let Some(record) = pending.take() {
                    return Ok(Some(record));
                }
                match next_row(reader, &mut self.buffer, &self.path) {
                    Ok(Some(line)) if self.buffer.len() != header.len() => {
                        Err(ImportError::SchemaMismatch {
                            path: self.path.clone(),
                            line,
                            expected: header.len(),
                            actual: self.buffer.len(),
                        })
                    }
                    Ok(Some(_)) => {
                        let values = self.buffer.iter().map(str::to_string).collect();
                        return Ok(Some(Record::new(Arc::clone(header), values)));
                    }
                    Ok(None) => Ok(None),
                    Err(err) => Err(err),
                }
            }
            _ => return Ok(None),
        };

        self.session = match &outcome {
            Ok(_) => Session::Exhausted,
            Err(_) => Session::Errored,
        };
        outcome
    }

    /// Unopened -> HeaderPending.
    fn start(&mut self) -> Result<()> {
        self.session = Session::Errored;
        let file = open_file(&self.path)?;
        let reader = self.dialect.reader_builder()?.from_reader(file);
        self.session = Session::HeaderPending(reader);
        Ok(())
    }

    /// HeaderPending -> Streaming, or Exhausted for a file without rows.
    fn read_header(&mut self) -> Result<()> {
        let mut reader = match std::mem::replace(&mut self.session, Session::Errored) {
            Session::HeaderPending(reader) => reader,
            other => {
                self.session = other;
                return Ok(());
            }
        };

        if next_row(&mut reader, &mut self.buffer, &self.path)?.is_none() {
            self.session = Session::Exhausted;
            return Ok(());
        }

        let (header, pending): (Arc<[String]>, _) = if self.dialect.has_header {
            let names = header_names(&self.buffer);
            check_duplicates(&names, &self.path)?;
            (names.into(), None)
        } else {
            let names: Vec<String> = (1..=self.buffer.len())
                .map(|i| format!("column_{i}"))
                .collect();
            let header: Arc<[String]> = names.into();
            let values = self.buffer.iter().map(str::to_string).collect();
            let first = Record::new(Arc::clone(&header), values);
            (header, Some(first))
        };

        self.header = Some(Arc::clone(&header));
        self.session = Session::Streaming {
            reader,
            header,
            pending,
        };
        Ok(())
    }
}

impl Iterator for RecordReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl std::fmt::Debug for RecordReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("state", &self.state())
            .finish()
    }
}

fn open_file(path: &Path) -> Result<File> {
    let metadata = fs::metadata(path).map_err(|e| ImportError::from_open(path, e))?;
    if !metadata.is_file() {
        return Err(ImportError::NotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|e| ImportError::from_open(path, e))
}

/// Read the next non-blank row into `buffer`, returning its 1-based line.
fn next_row(
    reader: &mut csv::Reader<File>,
    buffer: &mut StringRecord,
    path: &Path,
) -> Result<Option<u64>> {
    loop {
        let more = reader.read_record(buffer).map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if !more {
            return Ok(None);
        }
        if is_blank(buffer) {
            continue;
        }
        return Ok(Some(buffer.position().map_or(0, |p| p.line())));
    }
}

/// A row holding a single empty field is a blank line.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(str::is_empty)
}

fn header_names(row: &StringRecord) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect()
}

fn check_duplicates(names: &[String], path: &Path) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ImportError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name.clone(),
            });
        }
    }
    Ok(())
}
