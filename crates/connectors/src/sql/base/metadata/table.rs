use super::column::ColumnMetadata;
use model::core::identifiers::QualifiedTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueIndexMetadata {
    pub name: String,
    /// Member columns in index order.
    pub columns: Vec<String>,
    /// True when the index covers exactly the primary-key columns.
    pub is_primary_key_equivalent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    pub schema: Option<String>,
    pub columns: HashMap<String, ColumnMetadata>,
    /// Primary-key column names in key order.
    pub primary_keys: Vec<String>,
    pub unique_indexes: Vec<UniqueIndexMetadata>,
}

impl TableMetadata {
    pub fn qualified(&self) -> QualifiedTable {
        QualifiedTable {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.get(name)
    }

    /// Columns in declared (ordinal) order.
    pub fn columns_ordered(&self) -> Vec<&ColumnMetadata> {
        let mut columns: Vec<_> = self.columns.values().collect();
        columns.sort_by_key(|col| col.ordinal);
        columns
    }

    pub fn column_names_ordered(&self) -> Vec<String> {
        self.columns_ordered()
            .into_iter()
            .map(|col| col.name.clone())
            .collect()
    }
}
