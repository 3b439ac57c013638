use crate::sql::base::{
    adapter::SqlAdapter,
    dialect::DatabaseKind,
    error::{ConnectorError, DbError},
    metadata::{
        column::{COL_DATA_TYPE, ColumnMetadata},
        provider::{IndexColumnRow, MetadataProvider},
        table::TableMetadata,
    },
    requests::FetchRequest,
    row::DbRow,
};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use model::{
    core::{data_type::DataType, identifiers::QualifiedTable, value::Value},
    records::row::RowData,
};
use sqlx::{
    Connection, Pool, Postgres, Row,
    postgres::{PgArguments, PgConnection, PgPoolOptions},
    query::Query,
};
use std::collections::HashMap;
use tracing::debug;

const QUERY_TABLE_COLUMNS_SQL: &str = include_str!("sql/table_columns.sql");
const QUERY_TABLE_INDEXES_SQL: &str = include_str!("sql/table_indexes.sql");

fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            Value::Int(i) => query.bind(*i),
            Value::Uint(u) => query.bind(*u as i64),
            Value::Float(f) => query.bind(*f),
            Value::Decimal(d) => query.bind(d),
            Value::String(s) => query.bind(s),
            Value::Boolean(b) => query.bind(*b),
            Value::Json(j) => query.bind(j),
            Value::Uuid(u) => query.bind(*u),
            Value::Bytes(b) => query.bind(b),
            Value::Date(d) => query.bind(*d),
            Value::Timestamp(t) => query.bind(*t),
            Value::Null => query.bind(None::<String>),
        };
    }
    query
}

pub struct PostgresAdapter {
    pool: Pool<Postgres>,
    url: String,
    backend_pid: i32,
}

impl PostgresAdapter {
    /// Connects with a single backing connection so a later transport-level
    /// cancel has one known statement target.
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let pool = PgPoolOptions::new().max_connections(1).connect(url).await?;
        let row = sqlx::query("SELECT pg_backend_pid()")
            .fetch_one(&pool)
            .await?;
        let backend_pid: i32 = row.try_get(0)?;
        Ok(PostgresAdapter {
            pool,
            url: url.to_string(),
            backend_pid,
        })
    }
}

#[async_trait]
impl SqlAdapter for PostgresAdapter {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }

    async fn fetch_rows(&self, request: FetchRequest) -> Result<Vec<RowData>, DbError> {
        debug!(sql = %request.sql, "Executing fetch.");
        let query = bind_values(sqlx::query(&request.sql), &request.params);
        let mut stream = query.fetch(&self.pool);
        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            if request.cancel.is_cancelled() {
                return Err(DbError::Cancelled);
            }
            rows.push(DbRow::Postgres(&row).into_row_data(&request.columns));
        }
        Ok(rows)
    }

    async fn fetch_checksum(&self, sql: &str) -> Result<(u64, u64), DbError> {
        debug!(sql = %sql, "Executing checksum aggregate.");
        let row = sqlx::query(sql).fetch_one(&self.pool).await?;
        let checksum = row.try_get::<i64, _>(0).map(|v| v as u64)?;
        let count = row.try_get::<i64, _>(1).map(|v| v as u64)?;
        Ok((checksum, count))
    }

    async fn fetch_table_metadata(
        &self,
        table: &QualifiedTable,
    ) -> Result<TableMetadata, DbError> {
        let column_rows = sqlx::query(QUERY_TABLE_COLUMNS_SQL)
            .bind(table.schema.as_deref())
            .bind(&table.name)
            .fetch_all(&self.pool)
            .await?;
        let columns: HashMap<String, ColumnMetadata> = column_rows
            .iter()
            .map(|row| {
                let db_row = DbRow::Postgres(row);
                let type_name = db_row.try_get_string(COL_DATA_TYPE).unwrap_or_default();
                let column = ColumnMetadata::from_catalog_row(
                    &db_row,
                    DataType::from_postgres_type(&type_name),
                );
                (column.name.clone(), column)
            })
            .collect();

        let index_rows = sqlx::query(QUERY_TABLE_INDEXES_SQL)
            .bind(table.schema.as_deref())
            .bind(&table.name)
            .fetch_all(&self.pool)
            .await?;
        let index_rows = index_rows
            .iter()
            .map(|row| {
                let db_row = DbRow::Postgres(row);
                IndexColumnRow {
                    index_name: db_row.try_get_string("index_name").unwrap_or_default(),
                    column_name: db_row.try_get_string("column_name").unwrap_or_default(),
                    is_primary: db_row.try_get_bool("is_primary").unwrap_or(false),
                }
            })
            .collect();

        MetadataProvider::construct_table_metadata(table, columns, index_rows)
    }

    async fn cancel_in_flight(&self) -> Result<(), DbError> {
        // A fresh out-of-band connection; the pooled one is busy with the
        // statement being cancelled.
        let mut conn = PgConnection::connect(&self.url)
            .await
            .map_err(|e| DbError::CancelFailed(e.to_string()))?;
        let cancelled: bool = sqlx::query("SELECT pg_cancel_backend($1)")
            .bind(self.backend_pid)
            .fetch_one(&mut conn)
            .await
            .map_err(|e| DbError::CancelFailed(e.to_string()))?
            .try_get(0)
            .map_err(|e| DbError::CancelFailed(e.to_string()))?;
        if !cancelled {
            return Err(DbError::CancelFailed(format!(
                "backend {} not cancelled",
                self.backend_pid
            )));
        }
        Ok(())
    }
}
