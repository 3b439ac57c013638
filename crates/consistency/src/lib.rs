//! Chunked data-consistency calculation for live table migration.
//!
//! One calculation instance walks one table on one side (source or target)
//! as a lazy sequence of per-chunk results, ordered by a single non-nullable
//! unique key. An external orchestrator pairs the source and target
//! sequences and feeds them to the result comparator; this crate never
//! copies data and never repairs mismatches.

pub mod algorithm;
pub mod cancel;
pub mod error;
pub mod key;
pub mod param;
pub mod query;
pub mod result;

#[cfg(test)]
mod tests;
