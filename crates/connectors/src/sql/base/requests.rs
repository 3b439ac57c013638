use crate::sql::base::metadata::column::ColumnMetadata;
use model::core::value::Value;
use tokio_util::sync::CancellationToken;

/// One bounded fetch against a table: final SQL, bind parameters, the
/// column shapes used by the type-aware reader, and the token checked
/// between rows.
pub struct FetchRequest {
    pub sql: String,
    pub params: Vec<Value>,
    pub columns: Vec<ColumnMetadata>,
    pub cancel: CancellationToken,
}

impl FetchRequest {
    pub fn new(sql: impl Into<String>, params: Vec<Value>, columns: Vec<ColumnMetadata>) -> Self {
        FetchRequest {
            sql: sql.into(),
            params,
            columns,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
