pub mod comparator;

use crate::error::ConsistencyError;
use model::{core::value::Value, records::row::RowData};

/// Server-side checksum for one compared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChecksum {
    pub column: String,
    pub checksum: u64,
    pub records_count: u64,
}

/// Eager result of the checksum match strategy: one aggregate per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumResult {
    pub column_checksums: Vec<ColumnChecksum>,
}

/// One materialized chunk from the data match strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSetResult {
    max_unique_key_value: Value,
    records: Vec<RowData>,
}

impl RecordSetResult {
    /// `max_unique_key_value` is the chunk's last (greatest) key and becomes
    /// the exclusive lower bound of the next chunk.
    pub fn new(max_unique_key_value: Value, records: Vec<RowData>) -> Self {
        Self {
            max_unique_key_value,
            records,
        }
    }

    pub fn max_unique_key_value(&self) -> &Value {
        &self.max_unique_key_value
    }

    pub fn records_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[RowData] {
        &self.records
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculatedResult {
    Checksum(ChecksumResult),
    Records(RecordSetResult),
}

/// What the orchestrator records for one table. A fault or cancellation is
/// never folded into "mismatched": an aborted comparison proves nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCheckOutcome {
    Matched,
    Mismatched,
    Cancelled,
    FailedToDetermine(String),
}

impl TableCheckOutcome {
    pub fn from_comparison(matched: bool) -> Self {
        if matched {
            TableCheckOutcome::Matched
        } else {
            TableCheckOutcome::Mismatched
        }
    }

    pub fn from_error(error: &ConsistencyError) -> Self {
        if error.is_cancelled() {
            TableCheckOutcome::Cancelled
        } else {
            TableCheckOutcome::FailedToDetermine(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::identifiers::QualifiedTable;

    #[test]
    fn test_cancellation_is_not_a_failed_determination() {
        let cancelled = ConsistencyError::Cancelled(QualifiedTable::new("t_order"));
        assert_eq!(
            TableCheckOutcome::from_error(&cancelled),
            TableCheckOutcome::Cancelled
        );

        let fault = ConsistencyError::MissingUniqueKey(QualifiedTable::new("t_order"));
        assert!(matches!(
            TableCheckOutcome::from_error(&fault),
            TableCheckOutcome::FailedToDetermine(_)
        ));
    }

    #[test]
    fn test_comparison_verdicts_map_to_match_outcomes() {
        assert_eq!(
            TableCheckOutcome::from_comparison(true),
            TableCheckOutcome::Matched
        );
        assert_eq!(
            TableCheckOutcome::from_comparison(false),
            TableCheckOutcome::Mismatched
        );
    }
}
