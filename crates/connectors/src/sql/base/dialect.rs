//! Database-specific SQL syntax strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseKind {
    MySql,
    Postgres,
    Other(String),
}

impl DatabaseKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "mysql" | "mariadb" => DatabaseKind::MySql,
            "postgres" | "postgresql" => DatabaseKind::Postgres,
            other => DatabaseKind::Other(other.to_string()),
        }
    }

    /// The dialect registry. `None` for database kinds this engine has no
    /// SQL strategy for.
    pub fn dialect(&self) -> Option<&'static dyn Dialect> {
        match self {
            DatabaseKind::MySql => Some(&MySql),
            DatabaseKind::Postgres => Some(&Postgres),
            DatabaseKind::Other(_) => None,
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::MySql => write!(f, "MySQL"),
            DatabaseKind::Postgres => write!(f, "PostgreSQL"),
            DatabaseKind::Other(name) => write!(f, "{name}"),
        }
    }
}

pub trait Dialect: Send + Sync {
    /// Wraps an identifier in the correct quotation marks for the dialect.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Renders a schema-qualified table reference.
    fn qualify_table(&self, schema: Option<&str>, table: &str) -> String {
        match schema {
            Some(schema) if !schema.is_empty() => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(table)
            ),
            _ => self.quote_identifier(table),
        }
    }

    /// Returns the placeholder for a parameterized query.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn placeholder(&self, index: usize) -> String;

    /// Server-side aggregate checksum expression over one column, or `None`
    /// when the dialect has no usable checksum function.
    fn checksum_expr(&self, quoted_column: &str) -> Option<String>;

    /// Wraps a base SELECT with the dialect's pagination clause.
    fn wrap_limit(&self, sql: &str, limit: usize) -> String;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn checksum_expr(&self, quoted_column: &str) -> Option<String> {
        Some(format!("BIT_XOR(CRC32({quoted_column}))"))
    }

    fn wrap_limit(&self, sql: &str, limit: usize) -> String {
        format!("{sql} LIMIT {limit}")
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{ident}""#)
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn checksum_expr(&self, _quoted_column: &str) -> Option<String> {
        None
    }

    fn wrap_limit(&self, sql: &str, limit: usize) -> String {
        format!("{sql} LIMIT {limit}")
    }

    fn name(&self) -> &'static str {
        "PostgreSQL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(MySql.quote_identifier("order"), "`order`");
        assert_eq!(Postgres.quote_identifier("order"), r#""order""#);
    }

    #[test]
    fn test_table_qualification() {
        assert_eq!(
            MySql.qualify_table(Some("shop"), "t_order"),
            "`shop`.`t_order`"
        );
        assert_eq!(Postgres.qualify_table(None, "t_order"), r#""t_order""#);
    }

    #[test]
    fn test_checksum_support_is_dialect_optional() {
        assert!(MySql.checksum_expr("`id`").is_some());
        assert!(Postgres.checksum_expr(r#""id""#).is_none());
    }

    #[test]
    fn test_database_kind_resolution_from_tag() {
        assert_eq!(DatabaseKind::from_tag("PostgreSQL"), DatabaseKind::Postgres);
        assert_eq!(DatabaseKind::from_tag("mariadb"), DatabaseKind::MySql);
        let other = DatabaseKind::from_tag("h2");
        assert_eq!(other, DatabaseKind::Other("h2".into()));
        assert!(other.dialect().is_none());
    }
}
