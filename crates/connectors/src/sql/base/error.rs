use std::string::FromUtf8Error;
use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Low-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any SQL driver error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// UTF-8 decoding failed on some byte data.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Catalog rows could not be assembled into table metadata.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The fetch was aborted by its cancellation token between rows.
    #[error("Fetch cancelled")]
    Cancelled,

    /// The driver or server rejected a transport-level statement cancel.
    #[error("Statement cancel failed: {0}")]
    CancelFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// SQLx failed to build the connection or pool.
    #[error("SQLx connector creation failed: {0}")]
    Sqlx(#[from] sqlx::Error),
}
