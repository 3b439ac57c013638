use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Decimal,
    Short,
    Int,
    IntUnsigned,
    Long,
    Float,
    Double,
    Boolean,
    Null,
    Date,
    Time,
    Timestamp,
    Year,
    Char,
    VarChar,
    String,
    Text,
    Json,
    Enum,
    Blob,
    Bytea,
    Uuid,
    Custom(String),
}

lazy_static! {
    static ref MYSQL_TYPE_MAP: HashMap<&'static str, DataType> = build_mysql_type_map();
    static ref POSTGRES_TYPE_MAP: HashMap<&'static str, DataType> = build_postgres_type_map();
}

impl DataType {
    pub fn from_mysql_type(type_name: &str) -> Self {
        let normalized = Self::normalize_type_name(type_name);
        MYSQL_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .unwrap_or_else(|| DataType::Custom(normalized))
    }

    pub fn from_postgres_type(type_name: &str) -> Self {
        let normalized = Self::normalize_type_name(type_name);
        POSTGRES_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .unwrap_or_else(|| DataType::Custom(normalized))
    }

    fn normalize_type_name(type_name: &str) -> String {
        // Strip length/precision suffixes such as "varchar(255)" or
        // "decimal(10,2)" before the map lookup.
        let base = type_name.split('(').next().unwrap_or(type_name);
        base.trim().to_lowercase()
    }
}

fn build_mysql_type_map() -> HashMap<&'static str, DataType> {
    HashMap::from([
        ("decimal", DataType::Decimal),
        ("numeric", DataType::Decimal),
        ("tinyint", DataType::Short),
        ("smallint", DataType::Short),
        ("mediumint", DataType::Int),
        ("int", DataType::Int),
        ("integer", DataType::Int),
        ("int unsigned", DataType::IntUnsigned),
        ("bigint", DataType::Long),
        ("float", DataType::Float),
        ("double", DataType::Double),
        ("bit", DataType::Boolean),
        ("date", DataType::Date),
        ("time", DataType::Time),
        ("datetime", DataType::Timestamp),
        ("timestamp", DataType::Timestamp),
        ("year", DataType::Year),
        ("char", DataType::Char),
        ("varchar", DataType::VarChar),
        ("tinytext", DataType::Text),
        ("text", DataType::Text),
        ("mediumtext", DataType::Text),
        ("longtext", DataType::Text),
        ("json", DataType::Json),
        ("enum", DataType::Enum),
        ("tinyblob", DataType::Blob),
        ("blob", DataType::Blob),
        ("mediumblob", DataType::Blob),
        ("longblob", DataType::Blob),
        ("binary", DataType::Blob),
        ("varbinary", DataType::Blob),
    ])
}

fn build_postgres_type_map() -> HashMap<&'static str, DataType> {
    HashMap::from([
        ("numeric", DataType::Decimal),
        ("decimal", DataType::Decimal),
        ("smallint", DataType::Short),
        ("integer", DataType::Int),
        ("int4", DataType::Int),
        ("bigint", DataType::Long),
        ("int8", DataType::Long),
        ("real", DataType::Float),
        ("double precision", DataType::Double),
        ("float8", DataType::Double),
        ("boolean", DataType::Boolean),
        ("bool", DataType::Boolean),
        ("date", DataType::Date),
        ("time", DataType::Time),
        ("timestamp", DataType::Timestamp),
        ("timestamp without time zone", DataType::Timestamp),
        ("timestamp with time zone", DataType::Timestamp),
        ("timestamptz", DataType::Timestamp),
        ("character", DataType::Char),
        ("character varying", DataType::VarChar),
        ("varchar", DataType::VarChar),
        ("text", DataType::Text),
        ("json", DataType::Json),
        ("jsonb", DataType::Json),
        ("bytea", DataType::Bytea),
        ("uuid", DataType::Uuid),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_type_resolution_strips_length() {
        assert_eq!(DataType::from_mysql_type("varchar(255)"), DataType::VarChar);
        assert_eq!(DataType::from_mysql_type("DECIMAL(10,2)"), DataType::Decimal);
    }

    #[test]
    fn test_unknown_type_falls_back_to_custom() {
        assert_eq!(
            DataType::from_postgres_type("tsvector"),
            DataType::Custom("tsvector".into())
        );
    }
}
