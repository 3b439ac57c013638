//! Checksum match: one eagerly computed server-side aggregate per column.
//! Coarse and cheap; it proves *that* two sides differ, not *where*.

use crate::{
    algorithm::{AlgorithmKind, CalculateAlgorithm, CalculationStream},
    error::ConsistencyError,
    param::CalculationParameter,
    query::range_sql::RangeQueryBuilder,
    result::{ChecksumResult, ColumnChecksum},
};
use tracing::debug;

#[derive(Default)]
pub struct ChecksumMatchAlgorithm;

impl ChecksumMatchAlgorithm {
    pub fn new() -> Self {
        Self
    }
}

impl CalculateAlgorithm for ChecksumMatchAlgorithm {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::ChecksumMatch
    }

    fn calculate(&self, param: CalculationParameter) -> CalculationStream {
        CalculationStream::Checksum(ChecksumStream::new(param))
    }
}

/// One-shot sequence: the single result is computed on the first `next`,
/// every later call reports exhaustion.
pub struct ChecksumStream {
    param: Option<CalculationParameter>,
}

impl ChecksumStream {
    pub(crate) fn new(param: CalculationParameter) -> Self {
        Self { param: Some(param) }
    }

    pub async fn next(&mut self) -> Result<Option<ChecksumResult>, ConsistencyError> {
        let Some(param) = self.param.take() else {
            return Ok(None);
        };
        let dialect = param
            .kind
            .dialect()
            .ok_or_else(|| ConsistencyError::UnsupportedDialect(param.kind.clone()))?;
        let builder = RangeQueryBuilder::new(dialect);

        let columns = param.fetch_columns()?;
        let mut column_checksums = Vec::with_capacity(columns.len());
        for column in &columns {
            if param.cancel.is_cancelled() {
                return Err(ConsistencyError::Cancelled(param.table.clone()));
            }
            // Fails before any query runs when the dialect cannot checksum;
            // degrading to a made-up number would report false consistency.
            let sql = builder
                .build_checksum_query(&param.table, &column.name)
                .ok_or_else(|| ConsistencyError::UnsupportedChecksumDialect(param.kind.clone()))?;
            debug!(table = %param.table, column = %column.name, "Calculating column checksum.");
            let (checksum, records_count) = param
                .adapter
                .fetch_checksum(&sql)
                .await
                .map_err(|e| ConsistencyError::from_db(&param.table, e))?;
            column_checksums.push(ColumnChecksum {
                column: column.name.clone(),
                checksum,
                records_count,
            });
        }
        Ok(Some(ChecksumResult { column_checksums }))
    }
}
