use crate::sql::base::row::DbRow;
use model::core::data_type::DataType;
use serde::{Deserialize, Serialize};

pub const COL_ORDINAL_POSITION: &str = "ordinal_position";
pub const COL_COLUMN_NAME: &str = "column_name";
pub const COL_DATA_TYPE: &str = "data_type";
pub const COL_IS_NULLABLE: &str = "is_nullable";
pub const COL_COLUMN_KEY: &str = "column_key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub ordinal: usize,
    pub name: String,
    pub data_type: DataType,
    /// Declared type name as the catalog reports it, e.g. `varchar(64)`.
    pub type_name: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
}

impl ColumnMetadata {
    pub fn from_catalog_row(row: &DbRow, data_type: DataType) -> Self {
        // MySQL reports key membership inline; PostgreSQL rows carry no
        // column_key and get their flags patched from the index rows.
        let column_key = row.try_get_string(COL_COLUMN_KEY).unwrap_or_default();
        Self {
            ordinal: row.try_get_i64(COL_ORDINAL_POSITION).unwrap_or(0) as usize,
            name: row.try_get_string(COL_COLUMN_NAME).unwrap_or_default(),
            data_type,
            type_name: row.try_get_string(COL_DATA_TYPE).unwrap_or_default(),
            is_nullable: row
                .try_get_string(COL_IS_NULLABLE)
                .unwrap_or_default()
                .eq_ignore_ascii_case("YES"),
            is_primary_key: column_key == "PRI",
            is_unique: column_key == "PRI" || column_key == "UNI",
        }
    }
}
