//! SQL text for table creation and bulk loads.

use serde::{Deserialize, Serialize};

use crate::load::LoadPlan;
use crate::schema::TableSpec;

/// SQL dialect a statement is rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlFlavor {
    /// DuckDB, loading through `COPY ... FROM`.
    #[default]
    DuckDb,
    /// MySQL, loading through `LOAD DATA INFILE`.
    MySql,
}

impl SqlFlavor {
    /// Quote an identifier.
    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            SqlFlavor::DuckDb => format!("\"{}\"", name.replace('"', "\"\"")),
            SqlFlavor::MySql => format!("`{}`", name.replace('`', "``")),
        }
    }

    /// Quote a string literal.
    pub fn string_literal(&self, value: &str) -> String {
        match self {
            SqlFlavor::DuckDb => format!("'{}'", value.replace('\'', "''")),
            SqlFlavor::MySql => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''")),
        }
    }

    fn char_literal(&self, c: char) -> String {
        self.string_literal(c.encode_utf8(&mut [0; 4]))
    }

    /// `CREATE TABLE IF NOT EXISTS` for a table spec.
    ///
    /// The `IF NOT EXISTS` guard keeps two runs racing on the same table
    /// from failing between their existence check and the create.
    pub fn create_table(&self, spec: &TableSpec) -> String {
        let columns: Vec<String> = spec
            .columns()
            .iter()
            .map(|(name, column_type)| {
                format!("{} {}", self.quote_identifier(name), column_type.sql_type())
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.quote_identifier(spec.name()),
            columns.join(", ")
        )
    }

    /// Bulk load statement for a plan.
    pub fn load(&self, plan: &LoadPlan) -> String {
        let source = plan.source.to_string_lossy();
        match self {
            SqlFlavor::DuckDb => {
                // DuckDB's own default escape is the quote character; spell out
                // the backslash so plans without an escape keep that convention.
                let escape = plan.escape.unwrap_or('\\');
                format!(
                    "COPY {} FROM {} (FORMAT CSV, DELIMITER {}, QUOTE {}, ESCAPE {}, HEADER false, SKIP {})",
                    self.quote_identifier(&plan.table),
                    self.string_literal(&source),
                    self.char_literal(plan.delimiter),
                    self.char_literal(plan.enclosure),
                    self.char_literal(escape),
                    plan.skip_lines,
                )
            }
            SqlFlavor::MySql => {
                let mut sql = format!(
                    "LOAD DATA INFILE {} INTO TABLE {} FIELDS TERMINATED BY {} ENCLOSED BY {}",
                    self.string_literal(&source),
                    self.quote_identifier(&plan.table),
                    self.char_literal(plan.delimiter),
                    self.char_literal(plan.enclosure),
                );
                if let Some(escape) = plan.escape {
                    sql.push_str(&format!(" ESCAPED BY {}", self.char_literal(escape)));
                }
                sql.push_str(&format!(" IGNORE {} LINES", plan.skip_lines));
                sql
            }
        }
    }
}

impl std::fmt::Display for SqlFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlFlavor::DuckDb => write!(f, "duckdb"),
            SqlFlavor::MySql => write!(f, "mysql"),
        }
    }
}

impl std::str::FromStr for SqlFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckdb" | "duck" => Ok(SqlFlavor::DuckDb),
            "mysql" | "mariadb" => Ok(SqlFlavor::MySql),
            _ => Err(format!("Unknown SQL flavor: {}. Use duckdb or mysql.", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, TableFields};
    use std::path::PathBuf;

    fn plan(escape: Option<char>) -> LoadPlan {
        LoadPlan {
            table: "CS_orders".to_string(),
            source: PathBuf::from("/data/orders.csv"),
            delimiter: ',',
            enclosure: '"',
            escape,
            skip_lines: 1,
        }
    }

    #[test]
    fn test_create_table() {
        let mut fields = TableFields::new();
        fields.insert("id".to_string(), ColumnType::ShortText);
        fields.insert("note".to_string(), ColumnType::LongText);
        let spec = TableSpec::new("CS_orders", fields).unwrap();

        assert_eq!(
            SqlFlavor::DuckDb.create_table(&spec),
            "CREATE TABLE IF NOT EXISTS \"CS_orders\" (\"id\" VARCHAR(255), \"note\" TEXT)"
        );
        assert_eq!(
            SqlFlavor::MySql.create_table(&spec),
            "CREATE TABLE IF NOT EXISTS `CS_orders` (`id` VARCHAR(255), `note` TEXT)"
        );
    }

    #[test]
    fn test_mysql_load_matches_infile_statement() {
        assert_eq!(
            SqlFlavor::MySql.load(&plan(None)),
            "LOAD DATA INFILE '/data/orders.csv' INTO TABLE `CS_orders` \
             FIELDS TERMINATED BY ',' ENCLOSED BY '\"' IGNORE 1 LINES"
        );
        assert_eq!(
            SqlFlavor::MySql.load(&plan(Some('"'))),
            "LOAD DATA INFILE '/data/orders.csv' INTO TABLE `CS_orders` \
             FIELDS TERMINATED BY ',' ENCLOSED BY '\"' ESCAPED BY '\"' IGNORE 1 LINES"
        );
    }

    #[test]
    fn test_duckdb_load() {
        assert_eq!(
            SqlFlavor::DuckDb.load(&plan(None)),
            "COPY \"CS_orders\" FROM '/data/orders.csv' \
             (FORMAT CSV, DELIMITER ',', QUOTE '\"', ESCAPE '\\', HEADER false, SKIP 1)"
        );
        assert!(SqlFlavor::DuckDb.load(&plan(Some('"'))).contains("ESCAPE '\"'"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(SqlFlavor::DuckDb.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(SqlFlavor::MySql.quote_identifier("a`b"), "`a``b`");
        assert_eq!(SqlFlavor::DuckDb.string_literal("it's"), "'it''s'");
        assert_eq!(SqlFlavor::MySql.string_literal("C:\\it's"), "'C:\\\\it''s'");
    }

    #[test]
    fn test_flavor_from_str() {
        assert_eq!("MySQL".parse::<SqlFlavor>().unwrap(), SqlFlavor::MySql);
        assert_eq!("duckdb".parse::<SqlFlavor>().unwrap(), SqlFlavor::DuckDb);
        assert!("oracle".parse::<SqlFlavor>().is_err());
    }
}
