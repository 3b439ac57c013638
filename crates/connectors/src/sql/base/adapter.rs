use crate::sql::base::{
    dialect::DatabaseKind, error::DbError, metadata::table::TableMetadata, requests::FetchRequest,
};
use async_trait::async_trait;
use model::{core::identifiers::QualifiedTable, records::row::RowData};

/// A live connection the calculation engine drives. One adapter represents
/// one side (source or target) of a consistency check.
#[async_trait]
pub trait SqlAdapter: Send + Sync {
    fn kind(&self) -> DatabaseKind;

    /// Executes a bounded query and materializes its rows with the
    /// type-aware reader. Implementations check the request's cancellation
    /// token between rows and return [`DbError::Cancelled`] once it fires.
    async fn fetch_rows(&self, request: FetchRequest) -> Result<Vec<RowData>, DbError>;

    /// Executes a single-row aggregate checksum query, returning the
    /// checksum and the server-side row count.
    async fn fetch_checksum(&self, sql: &str) -> Result<(u64, u64), DbError>;

    /// Catalog introspection: columns, primary keys and unique indexes.
    async fn fetch_table_metadata(&self, table: &QualifiedTable)
    -> Result<TableMetadata, DbError>;

    /// Best-effort transport-level cancel of whatever statement is running
    /// on this adapter's connection. Advisory only; callers log failures and
    /// keep relying on the cooperative token.
    async fn cancel_in_flight(&self) -> Result<(), DbError>;
}
