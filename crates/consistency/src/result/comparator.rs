//! Logical equality between paired calculated results.
//!
//! Equality here is type-aware: arbitrary-precision decimals are equal when
//! they are numerically equal regardless of scale (`1.0` == `1.00`), and
//! large character values compare by materialized content. Every mismatch
//! found in the offending row is logged before the verdict.

use crate::result::{CalculatedResult, ChecksumResult, RecordSetResult};
use bigdecimal::BigDecimal;
use model::core::value::Value;
use std::cmp::Ordering;
use tracing::warn;

pub fn results_equal(a: &CalculatedResult, b: &CalculatedResult) -> bool {
    match (a, b) {
        (CalculatedResult::Checksum(a), CalculatedResult::Checksum(b)) => checksums_equal(a, b),
        (CalculatedResult::Records(a), CalculatedResult::Records(b)) => record_sets_equal(a, b),
        _ => {
            warn!("Comparing results of different calculation strategies.");
            false
        }
    }
}

/// Checksums are already normalized server-side; plain value equality per
/// column, both aggregate and row count.
pub fn checksums_equal(a: &ChecksumResult, b: &ChecksumResult) -> bool {
    if a.column_checksums.len() != b.column_checksums.len() {
        warn!(
            source = a.column_checksums.len(),
            target = b.column_checksums.len(),
            "Checksum column counts differ."
        );
        return false;
    }
    let mut matched = true;
    for (left, right) in a.column_checksums.iter().zip(&b.column_checksums) {
        if left.checksum != right.checksum || left.records_count != right.records_count {
            warn!(
                column = %left.column,
                source_checksum = left.checksum,
                target_checksum = right.checksum,
                source_count = left.records_count,
                target_count = right.records_count,
                "Column checksum mismatch."
            );
            matched = false;
        }
    }
    matched
}

pub fn record_sets_equal(a: &RecordSetResult, b: &RecordSetResult) -> bool {
    if a.records_count() != b.records_count() {
        warn!(
            source = a.records_count(),
            target = b.records_count(),
            "Record counts differ."
        );
        return false;
    }
    for (position, (left, right)) in a.records().iter().zip(b.records()).enumerate() {
        if left.column_count() != right.column_count() {
            warn!(
                row = position,
                source = left.column_count(),
                target = right.column_count(),
                "Column counts differ."
            );
            return false;
        }
        let mut row_matched = true;
        for (left_field, right_field) in left.field_values.iter().zip(&right.field_values) {
            if !column_values_equal(&left_field.value, &right_field.value) {
                warn!(
                    row = position,
                    column = %left_field.name,
                    source = ?left_field.value,
                    target = ?right_field.value,
                    "Column value mismatch."
                );
                row_matched = false;
            }
        }
        if !row_matched {
            return false;
        }
    }
    true
}

fn column_values_equal(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Decimal(a), Value::Decimal(b)) => decimals_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        _ => a == b,
    }
}

/// Exact numeric equality after scale alignment, never epsilon-based.
fn decimals_equal(a: &BigDecimal, b: &BigDecimal) -> bool {
    a.cmp(b) == Ordering::Equal
}
