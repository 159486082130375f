//! Core type definitions for inferred columns.

use serde::{Deserialize, Serialize};

/// Longest value, in characters, that still fits a short-text column.
pub const SHORT_TEXT_MAX_CHARS: usize = 255;

/// Storage class inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Bounded string, at most [`SHORT_TEXT_MAX_CHARS`] characters.
    ShortText,
    /// Unbounded text.
    LongText,
}

impl ColumnType {
    /// Returns true if values of this type have a length limit.
    pub fn is_bounded(&self) -> bool {
        matches!(self, ColumnType::ShortText)
    }

    /// SQL column definition for this type.
    pub fn sql_type(&self) -> String {
        match self {
            ColumnType::ShortText => format!("VARCHAR({SHORT_TEXT_MAX_CHARS})"),
            ColumnType::LongText => "TEXT".to_string(),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::ShortText => write!(f, "short-text"),
            ColumnType::LongText => write!(f, "long-text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_types() {
        assert_eq!(ColumnType::ShortText.sql_type(), "VARCHAR(255)");
        assert_eq!(ColumnType::LongText.sql_type(), "TEXT");
        assert!(ColumnType::ShortText.is_bounded());
        assert!(!ColumnType::LongText.is_bounded());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ColumnType::LongText).unwrap();
        assert_eq!(json, "\"long_text\"");
    }
}
