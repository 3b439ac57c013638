use super::{
    column::ColumnMetadata,
    table::{TableMetadata, UniqueIndexMetadata},
};
use crate::sql::base::{adapter::SqlAdapter, error::DbError};
use model::core::identifiers::QualifiedTable;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::debug;

/// One catalog row describing a member column of a unique (or primary)
/// index, already ordered by (index name, position in index).
#[derive(Debug, Clone)]
pub struct IndexColumnRow {
    pub index_name: String,
    pub column_name: String,
    pub is_primary: bool,
}

type TableKey = (Option<String>, String);

/// Loads table shapes through an adapter and caches them per
/// (schema, table) for the lifetime of the migration job. Reads are shared;
/// population is idempotent, so a race that loads the same table twice is
/// harmless.
#[derive(Default)]
pub struct MetadataProvider {
    cache: RwLock<HashMap<TableKey, Arc<TableMetadata>>>,
}

impl MetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(
        &self,
        adapter: &dyn SqlAdapter,
        table: &QualifiedTable,
    ) -> Result<Arc<TableMetadata>, DbError> {
        let key = Self::key(table);
        if let Some(cached) = self.cache.read().expect("metadata cache poisoned").get(&key) {
            return Ok(cached.clone());
        }
        self.fetch_and_cache(adapter, table, key).await
    }

    /// Drops any cached shape and loads a fresh one.
    pub async fn reload(
        &self,
        adapter: &dyn SqlAdapter,
        table: &QualifiedTable,
    ) -> Result<Arc<TableMetadata>, DbError> {
        self.fetch_and_cache(adapter, table, Self::key(table)).await
    }

    async fn fetch_and_cache(
        &self,
        adapter: &dyn SqlAdapter,
        table: &QualifiedTable,
        key: TableKey,
    ) -> Result<Arc<TableMetadata>, DbError> {
        debug!(table = %table, "Loading table metadata from catalog.");
        let metadata = Arc::new(adapter.fetch_table_metadata(table).await?);
        self.cache
            .write()
            .expect("metadata cache poisoned")
            .insert(key, metadata.clone());
        Ok(metadata)
    }

    fn key(table: &QualifiedTable) -> TableKey {
        (table.schema.clone(), table.name.clone())
    }

    /// Assembles column and index catalog rows into one table shape. Index
    /// rows supply primary-key ordering and patch the per-column key flags
    /// for catalogs that do not report them inline.
    pub fn construct_table_metadata(
        table: &QualifiedTable,
        mut columns: HashMap<String, ColumnMetadata>,
        index_rows: Vec<IndexColumnRow>,
    ) -> Result<TableMetadata, DbError> {
        if columns.is_empty() {
            return Err(DbError::Metadata(format!("table not found: {table}")));
        }

        let mut primary_keys: Vec<String> = Vec::new();
        let mut unique_indexes: Vec<UniqueIndexMetadata> = Vec::new();
        for row in index_rows {
            if row.is_primary {
                primary_keys.push(row.column_name);
                continue;
            }
            match unique_indexes.last_mut() {
                Some(index) if index.name == row.index_name => {
                    index.columns.push(row.column_name);
                }
                _ => unique_indexes.push(UniqueIndexMetadata {
                    name: row.index_name,
                    columns: vec![row.column_name],
                    is_primary_key_equivalent: false,
                }),
            }
        }

        for index in &mut unique_indexes {
            index.is_primary_key_equivalent = index.columns == primary_keys;
        }

        for name in &primary_keys {
            if let Some(col) = columns.get_mut(name) {
                col.is_primary_key = true;
                col.is_unique = true;
            }
        }
        for index in &unique_indexes {
            if index.columns.len() == 1 {
                if let Some(col) = columns.get_mut(&index.columns[0]) {
                    col.is_unique = true;
                }
            }
        }

        Ok(TableMetadata {
            name: table.name.clone(),
            schema: table.schema.clone(),
            columns,
            primary_keys,
            unique_indexes,
        })
    }
}
