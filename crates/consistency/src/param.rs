use crate::error::ConsistencyError;
use connectors::sql::base::{
    adapter::SqlAdapter,
    dialect::DatabaseKind,
    metadata::{column::ColumnMetadata, table::TableMetadata},
};
use model::{
    core::{identifiers::QualifiedTable, value::Value},
    pagination::range::{QueryRange, QueryType},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything one calculation run needs for one table side. Owned by that
/// run; the chunk iterator advances the cursor by deriving the next range
/// from the previous chunk's max key, the parameter itself stays as built.
pub struct CalculationParameter {
    pub table: QualifiedTable,
    /// Column names to compare, in declared order. Empty means every column
    /// of the table shape.
    pub column_names: Vec<String>,
    /// Key columns: the first is the chunking/ordering key for range
    /// queries, the full list forms the predicate of point queries.
    pub unique_keys: Vec<ColumnMetadata>,
    pub kind: DatabaseKind,
    pub adapter: Arc<dyn SqlAdapter>,
    pub table_shape: Arc<TableMetadata>,
    pub query_type: QueryType,
    /// For range queries. The lower bound doubles as the externally supplied
    /// resume position (exclusive, it is an already-verified key).
    pub query_range: QueryRange,
    /// For point queries: values for each key column, in key order.
    pub unique_key_values: Vec<Value>,
    /// Extra ordering columns appended after the unique key.
    pub sharding_columns: Vec<String>,
    pub cancel: CancellationToken,
}

impl CalculationParameter {
    pub fn new(
        table: QualifiedTable,
        kind: DatabaseKind,
        adapter: Arc<dyn SqlAdapter>,
        table_shape: Arc<TableMetadata>,
        unique_keys: Vec<ColumnMetadata>,
    ) -> Self {
        Self {
            table,
            column_names: Vec::new(),
            unique_keys,
            kind,
            adapter,
            table_shape,
            query_type: QueryType::RangeQuery,
            query_range: QueryRange::full(),
            unique_key_values: Vec::new(),
            sharding_columns: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_columns(mut self, column_names: Vec<String>) -> Self {
        self.column_names = column_names;
        self
    }

    pub fn with_query_range(mut self, range: QueryRange) -> Self {
        self.query_type = QueryType::RangeQuery;
        self.query_range = range;
        self
    }

    pub fn with_point_query(mut self, unique_key_values: Vec<Value>) -> Self {
        self.query_type = QueryType::PointQuery;
        self.unique_key_values = unique_key_values;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn first_unique_key(&self) -> Result<&ColumnMetadata, ConsistencyError> {
        self.unique_keys
            .first()
            .ok_or_else(|| ConsistencyError::MissingUniqueKey(self.table.clone()))
    }

    /// Columns actually fetched: the compare list (or every column of the
    /// shape), with the chunking key appended when it is not already there.
    pub fn fetch_columns(&self) -> Result<Vec<ColumnMetadata>, ConsistencyError> {
        let mut columns: Vec<ColumnMetadata> = if self.column_names.is_empty() {
            self.table_shape
                .columns_ordered()
                .into_iter()
                .cloned()
                .collect()
        } else {
            self.column_names
                .iter()
                .map(|name| {
                    self.table_shape.column(name).cloned().ok_or_else(|| {
                        ConsistencyError::UnknownColumn {
                            table: self.table.clone(),
                            column: name.clone(),
                        }
                    })
                })
                .collect::<Result<_, _>>()?
        };

        let key = self.first_unique_key()?;
        if !columns.iter().any(|col| col.name == key.name) {
            columns.push(key.clone());
        }
        Ok(columns)
    }
}
