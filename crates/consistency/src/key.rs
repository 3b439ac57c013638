//! Unique-key selection for chunking and row matching.

use connectors::sql::base::metadata::{column::ColumnMetadata, table::TableMetadata};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum KeySelectionError {
    /// Multiple unique indexes, a composite unique index, or a nullable
    /// single-column unique index: chunking over any of them could skip or
    /// repeat ordering values, so selection refuses to guess.
    #[error("No unique key usable on table {table}: {reason}")]
    AmbiguousOrUnsuitableKey { table: String, reason: String },
}

fn reject(table: &TableMetadata, reason: &str) -> KeySelectionError {
    KeySelectionError::AmbiguousOrUnsuitableKey {
        table: table.name.clone(),
        reason: reason.to_string(),
    }
}

/// Picks the single scalar column used to order and paginate the table.
pub fn select_chunk_key(table: &TableMetadata) -> Result<ColumnMetadata, KeySelectionError> {
    if table.primary_keys.len() == 1 {
        let name = &table.primary_keys[0];
        return table
            .column(name)
            .cloned()
            .ok_or_else(|| reject(table, &format!("primary key column {name} not in shape")));
    }

    let candidates: Vec<_> = table
        .unique_indexes
        .iter()
        .filter(|index| !index.is_primary_key_equivalent)
        .collect();
    match candidates.as_slice() {
        [] if table.primary_keys.len() > 1 => {
            Err(reject(table, "composite primary key and no single-column unique index"))
        }
        [] => Err(reject(table, "no primary key and no unique index")),
        [index] => {
            if index.columns.len() != 1 {
                return Err(reject(table, &format!("unique index {} is composite", index.name)));
            }
            let column = table
                .column(&index.columns[0])
                .cloned()
                .ok_or_else(|| reject(table, &format!("index column {} not in shape", index.columns[0])))?;
            if column.is_nullable {
                return Err(reject(table, &format!("unique column {} is nullable", column.name)));
            }
            Ok(column)
        }
        _ => Err(reject(table, "multiple unique indexes")),
    }
}

/// Returns the full key column list for point-query and row-equality
/// callers: the primary key, or the first unique index whose members are all
/// non-nullable.
pub fn select_match_keys(table: &TableMetadata) -> Result<Vec<ColumnMetadata>, KeySelectionError> {
    if !table.primary_keys.is_empty() {
        return table
            .primary_keys
            .iter()
            .map(|name| {
                table
                    .column(name)
                    .cloned()
                    .ok_or_else(|| reject(table, &format!("primary key column {name} not in shape")))
            })
            .collect();
    }

    for index in &table.unique_indexes {
        let columns: Option<Vec<ColumnMetadata>> = index
            .columns
            .iter()
            .map(|name| table.column(name).cloned())
            .collect();
        if let Some(columns) = columns {
            if columns.iter().all(|col| !col.is_nullable) {
                return Ok(columns);
            }
        }
    }

    Err(reject(table, "no primary key and no all-non-nullable unique index"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::sql::base::metadata::table::UniqueIndexMetadata;
    use model::core::data_type::DataType;
    use std::collections::HashMap;

    fn column(ordinal: usize, name: &str, nullable: bool) -> ColumnMetadata {
        ColumnMetadata {
            ordinal,
            name: name.to_string(),
            data_type: DataType::Int,
            type_name: "int".into(),
            is_nullable: nullable,
            is_primary_key: false,
            is_unique: false,
        }
    }

    fn table(
        columns: Vec<ColumnMetadata>,
        primary_keys: Vec<&str>,
        unique_indexes: Vec<UniqueIndexMetadata>,
    ) -> TableMetadata {
        TableMetadata {
            name: "t_order".into(),
            schema: None,
            columns: columns
                .into_iter()
                .map(|col| (col.name.clone(), col))
                .collect(),
            primary_keys: primary_keys.into_iter().map(String::from).collect(),
            unique_indexes,
        }
    }

    fn unique(name: &str, columns: Vec<&str>) -> UniqueIndexMetadata {
        UniqueIndexMetadata {
            name: name.into(),
            columns: columns.into_iter().map(String::from).collect(),
            is_primary_key_equivalent: false,
        }
    }

    #[test]
    fn test_single_primary_key_is_selected() {
        let table = table(
            vec![column(1, "id", false), column(2, "name", true)],
            vec!["id"],
            vec![],
        );
        assert_eq!(select_chunk_key(&table).unwrap().name, "id");
    }

    #[test]
    fn test_single_non_nullable_unique_index_is_selected() {
        let table = table(
            vec![column(1, "order_no", false), column(2, "name", true)],
            vec![],
            vec![unique("uk_order_no", vec!["order_no"])],
        );
        assert_eq!(select_chunk_key(&table).unwrap().name, "order_no");
    }

    #[test]
    fn test_two_unique_indexes_are_rejected() {
        let table = table(
            vec![column(1, "a", false), column(2, "b", false)],
            vec![],
            vec![unique("uk_a", vec!["a"]), unique("uk_b", vec!["b"])],
        );
        assert!(matches!(
            select_chunk_key(&table),
            Err(KeySelectionError::AmbiguousOrUnsuitableKey { .. })
        ));
    }

    #[test]
    fn test_nullable_unique_index_is_rejected() {
        let table = table(
            vec![column(1, "a", true)],
            vec![],
            vec![unique("uk_a", vec!["a"])],
        );
        assert!(matches!(
            select_chunk_key(&table),
            Err(KeySelectionError::AmbiguousOrUnsuitableKey { .. })
        ));
    }

    #[test]
    fn test_composite_unique_index_is_rejected() {
        let table = table(
            vec![column(1, "a", false), column(2, "b", false)],
            vec![],
            vec![unique("uk_ab", vec!["a", "b"])],
        );
        assert!(select_chunk_key(&table).is_err());
    }

    #[test]
    fn test_composite_primary_key_rejected_for_chunking_but_returned_for_matching() {
        let table = table(
            vec![column(1, "user_id", false), column(2, "order_id", false)],
            vec!["user_id", "order_id"],
            vec![],
        );
        assert!(select_chunk_key(&table).is_err());
        let keys = select_match_keys(&table).unwrap();
        assert_eq!(
            keys.iter().map(|k| k.name.as_str()).collect::<Vec<_>>(),
            vec!["user_id", "order_id"]
        );
    }
}
