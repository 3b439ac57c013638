use crate::key::KeySelectionError;
use connectors::sql::base::{dialect::DatabaseKind, error::DbError};
use model::core::identifiers::QualifiedTable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsistencyError {
    /// Chunking needs exactly one non-nullable unique scalar column.
    #[error(transparent)]
    KeySelection(#[from] KeySelectionError),

    /// The dialect has no server-side checksum function; the caller must
    /// fall back to data match, never to a silently wrong number.
    #[error("Checksum match is not supported on {0}")]
    UnsupportedChecksumDialect(DatabaseKind),

    /// No SQL dialect is registered for the database kind.
    #[error("No SQL dialect registered for {0}")]
    UnsupportedDialect(DatabaseKind),

    #[error("Unknown column {column} on table {table}")]
    UnknownColumn {
        table: QualifiedTable,
        column: String,
    },

    #[error("No unique key configured for table {0}")]
    MissingUniqueKey(QualifiedTable),

    /// A fetched row carried NULL in the unique-key column; the selector
    /// guarantees non-nullable keys, so this means the shape is stale.
    #[error("Unique key value missing in a fetched row of table {0}")]
    MissingUniqueKeyValue(QualifiedTable),

    /// Query execution failure, wrapped with table context. Not retried
    /// here: retrying around a resumed cursor risks silently skipping rows.
    #[error("Query failed on table {table}: {source}")]
    Query {
        table: QualifiedTable,
        #[source]
        source: DbError,
    },

    /// Distinct control outcome, not a fault: the sequence ended because the
    /// check was cancelled, never to be reported as "consistent".
    #[error("Consistency check cancelled on table {0}")]
    Cancelled(QualifiedTable),

    #[error("Unknown calculation algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl ConsistencyError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConsistencyError::Cancelled(_))
    }

    pub(crate) fn from_db(table: &QualifiedTable, source: DbError) -> Self {
        match source {
            DbError::Cancelled => ConsistencyError::Cancelled(table.clone()),
            other => ConsistencyError::Query {
                table: table.clone(),
                source: other,
            },
        }
    }
}
