#![allow(dead_code)]

use crate::param::CalculationParameter;
use async_trait::async_trait;
use connectors::sql::base::{
    adapter::SqlAdapter,
    dialect::DatabaseKind,
    error::DbError,
    metadata::{column::ColumnMetadata, table::TableMetadata},
    requests::FetchRequest,
};
use model::{
    core::{data_type::DataType, identifiers::QualifiedTable, value::Value},
    records::row::{FieldValue, RowData},
};
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

/// In-memory single-table adapter. It understands exactly the SQL shapes the
/// range builder produces: optional `>`/`>=` lower bound, optional `<=`
/// upper bound, `=` point predicates and a trailing `LIMIT`.
pub struct MockTableAdapter {
    kind: DatabaseKind,
    key: String,
    columns: Vec<ColumnMetadata>,
    rows: Vec<RowData>,
    checksums: HashMap<String, (u64, u64)>,
    /// Cancel the request token after this many rows have been produced,
    /// simulating an external cancel landing mid-chunk.
    cancel_after_rows: Option<usize>,
    cancel_calls: AtomicUsize,
}

impl MockTableAdapter {
    pub fn new(kind: DatabaseKind, key: &str, columns: Vec<ColumnMetadata>, rows: Vec<RowData>) -> Self {
        Self {
            kind,
            key: key.to_string(),
            columns,
            rows,
            checksums: HashMap::new(),
            cancel_after_rows: None,
            cancel_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_checksums(mut self, checksums: HashMap<String, (u64, u64)>) -> Self {
        self.checksums = checksums;
        self
    }

    pub fn with_cancel_after_rows(mut self, rows: usize) -> Self {
        self.cancel_after_rows = Some(rows);
        self
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(AtomicOrdering::SeqCst)
    }

    fn table_metadata(&self) -> TableMetadata {
        TableMetadata {
            name: "t_order".into(),
            schema: None,
            columns: self
                .columns
                .iter()
                .map(|col| (col.name.clone(), col.clone()))
                .collect(),
            primary_keys: vec![self.key.clone()],
            unique_indexes: vec![],
        }
    }

    fn project(&self, row: &RowData, columns: &[ColumnMetadata]) -> RowData {
        RowData::new(
            columns
                .iter()
                .map(|col| {
                    FieldValue::new(&col.name, row.get(&col.name).and_then(|f| f.value.clone()))
                })
                .collect(),
        )
    }
}

fn in_range(key: &Value, lower: &Option<(Value, bool)>, upper: &Option<Value>) -> bool {
    if let Some((bound, inclusive)) = lower {
        match key.compare(bound) {
            Some(Ordering::Greater) => {}
            Some(Ordering::Equal) if *inclusive => {}
            _ => return false,
        }
    }
    if let Some(bound) = upper {
        match key.compare(bound) {
            Some(Ordering::Less | Ordering::Equal) => {}
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl SqlAdapter for MockTableAdapter {
    fn kind(&self) -> DatabaseKind {
        self.kind.clone()
    }

    async fn fetch_rows(&self, request: FetchRequest) -> Result<Vec<RowData>, DbError> {
        let is_point = request.sql.contains(" = ");
        let mut params = request.params.iter();
        let lower = if request.sql.contains(">= ") {
            Some((params.next().expect("lower bound param").clone(), true))
        } else if request.sql.contains("> ") {
            Some((params.next().expect("lower bound param").clone(), false))
        } else {
            None
        };
        let upper = if request.sql.contains("<= ") {
            Some(params.next().expect("upper bound param").clone())
        } else {
            None
        };
        let limit = request
            .sql
            .split(" LIMIT ")
            .nth(1)
            .and_then(|rest| rest.trim().parse::<usize>().ok());

        let mut out = Vec::new();
        for row in &self.rows {
            if let Some(after) = self.cancel_after_rows {
                if out.len() == after {
                    request.cancel.cancel();
                }
            }
            if request.cancel.is_cancelled() {
                return Err(DbError::Cancelled);
            }
            let key_value = row.get_value(&self.key);
            let selected = if is_point {
                request
                    .params
                    .first()
                    .map(|v| key_value.compare(v) == Some(Ordering::Equal))
                    .unwrap_or(false)
            } else {
                in_range(&key_value, &lower, &upper)
            };
            if selected {
                out.push(self.project(row, &request.columns));
            }
            if limit.is_some_and(|limit| out.len() == limit) {
                break;
            }
        }
        Ok(out)
    }

    async fn fetch_checksum(&self, sql: &str) -> Result<(u64, u64), DbError> {
        self.checksums
            .iter()
            .find(|(column, _)| sql.contains(&format!("(`{column}`)")))
            .map(|(_, result)| *result)
            .ok_or_else(|| DbError::Unknown(format!("no mock checksum for: {sql}")))
    }

    async fn fetch_table_metadata(
        &self,
        _table: &QualifiedTable,
    ) -> Result<TableMetadata, DbError> {
        Ok(self.table_metadata())
    }

    async fn cancel_in_flight(&self) -> Result<(), DbError> {
        self.cancel_calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(())
    }
}

pub fn int_column(ordinal: usize, name: &str, is_primary_key: bool) -> ColumnMetadata {
    ColumnMetadata {
        ordinal,
        name: name.to_string(),
        data_type: DataType::Int,
        type_name: "int".into(),
        is_nullable: false,
        is_primary_key,
        is_unique: is_primary_key,
    }
}

pub fn varchar_column(ordinal: usize, name: &str) -> ColumnMetadata {
    ColumnMetadata {
        ordinal,
        name: name.to_string(),
        data_type: DataType::VarChar,
        type_name: "varchar(64)".into(),
        is_nullable: true,
        is_primary_key: false,
        is_unique: false,
    }
}

pub fn order_row(id: i64) -> RowData {
    RowData::new(vec![
        FieldValue::new("id", Some(Value::Int(id))),
        FieldValue::new("name", Some(Value::String(format!("order-{id}")))),
    ])
}

/// `t_order` with primary key `id` holding rows `id = 1..=row_count`.
pub fn order_table_adapter(row_count: i64) -> MockTableAdapter {
    MockTableAdapter::new(
        DatabaseKind::MySql,
        "id",
        vec![int_column(1, "id", true), varchar_column(2, "name")],
        (1..=row_count).map(order_row).collect(),
    )
}

pub fn order_table_param(adapter: Arc<MockTableAdapter>) -> CalculationParameter {
    let shape = Arc::new(MockTableAdapter::table_metadata(&adapter));
    let key = shape.column("id").cloned().expect("key column");
    CalculationParameter::new(
        QualifiedTable::new("t_order"),
        adapter.kind(),
        adapter,
        shape,
        vec![key],
    )
}
