//! Column type inference over a full pass of a file.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::profile::FieldProfile;
use crate::error::Result;
use crate::input::{Dialect, Record, RecordReader};
use crate::load::SpecialTables;
use crate::schema::{ColumnType, SHORT_TEXT_MAX_CHARS, TableFields};

/// Columns that may be classified by length alone. Once this many columns
/// have been classified, every further column becomes long text.
pub const LENGTH_CLASSIFIED_COLUMNS: usize = 6;

/// Outcome of one inference pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferredSchema {
    /// Column types in file order. Empty when the file had no records.
    pub fields: TableFields,
    /// Number of records consumed.
    pub record_count: usize,
}

impl InferredSchema {
    /// True when there is nothing to create.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Infers a column type for every column of a file.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    dialect: Dialect,
    special_tables: SpecialTables,
}

impl SchemaInferencer {
    /// Create an inferencer reading files with `dialect`, except for
    /// special tables which are read with doubled enclosures.
    pub fn new(dialect: Dialect, special_tables: SpecialTables) -> Self {
        Self {
            dialect,
            special_tables,
        }
    }

    /// Consume `records` to the end and classify every column seen.
    ///
    /// `progress` is called with the running record count after each
    /// record. The first read error aborts inference.
    pub fn infer<I>(
        &self,
        records: I,
        mut progress: Option<&mut dyn FnMut(usize)>,
    ) -> Result<InferredSchema>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut profile = FieldProfile::new();
        let mut record_count = 0;

        for record in records {
            profile.observe(&record?);
            record_count += 1;

            if let Some(report) = progress.as_mut() {
                report(record_count);
            }
        }

        Ok(InferredSchema {
            fields: classify(&profile),
            record_count,
        })
    }

    /// Run inference over a fresh reader session on `path`.
    pub fn infer_file(
        &self,
        path: &Path,
        table: &str,
        progress: Option<&mut dyn FnMut(usize)>,
    ) -> Result<InferredSchema> {
        let dialect = self.special_tables.dialect_for(table, self.dialect);
        let reader = RecordReader::open(path, dialect)?;
        self.infer(reader, progress)
    }
}

/// Turn a width profile into column types.
///
/// Columns are visited in first-seen order. The first
/// [`LENGTH_CLASSIFIED_COLUMNS`] are short text unless a value exceeded
/// [`SHORT_TEXT_MAX_CHARS`]; all later columns are long text whatever
/// their width.
pub fn classify(profile: &FieldProfile) -> TableFields {
    let mut fields = TableFields::with_capacity(profile.len());

    for (column, max_length) in profile.iter() {
        let column_type = if fields.len() >= LENGTH_CLASSIFIED_COLUMNS
            || max_length > SHORT_TEXT_MAX_CHARS
        {
            ColumnType::LongText
        } else {
            ColumnType::ShortText
        };
        debug!(column, max_length, %column_type, "classified column");
        fields.insert(column.to_string(), column_type);
    }

    fields
}
