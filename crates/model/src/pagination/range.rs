use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// How a calculation walks a table: a range scan over the chunking key, or
/// a point lookup on explicit key values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryType {
    RangeQuery,
    PointQuery,
}

/// A half-open-or-closed slice over the chunking key. The upper bound, when
/// present, is always inclusive; the lower bound carries its own
/// inclusive/exclusive flag. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRange {
    lower: Option<Value>,
    lower_inclusive: bool,
    upper: Option<Value>,
}

impl QueryRange {
    pub fn new(lower: Option<Value>, lower_inclusive: bool, upper: Option<Value>) -> Self {
        Self {
            lower,
            lower_inclusive,
            upper,
        }
    }

    /// The unbounded range: a full ascending scan.
    pub fn full() -> Self {
        Self::new(None, false, None)
    }

    /// A range resuming after an already-verified key value. The bound is
    /// exclusive: the resume position itself was counted by a previous run.
    pub fn resuming_after(key: Value) -> Self {
        Self::new(Some(key), false, None)
    }

    pub fn lower(&self) -> Option<&Value> {
        self.lower.as_ref()
    }

    pub fn is_lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    pub fn upper(&self) -> Option<&Value> {
        self.upper.as_ref()
    }

    /// The same range with its lower bound replaced by an exclusive bound at
    /// `key`, keeping the upper bound. This is how the cursor advances from
    /// one chunk to the next.
    pub fn advanced_past(&self, key: Value) -> Self {
        Self::new(Some(key), false, self.upper.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advanced_past_keeps_upper_bound() {
        let range = QueryRange::new(Some(Value::Int(1)), true, Some(Value::Int(100)));
        let next = range.advanced_past(Value::Int(42));
        assert_eq!(next.lower(), Some(&Value::Int(42)));
        assert!(!next.is_lower_inclusive());
        assert_eq!(next.upper(), Some(&Value::Int(100)));
    }

    #[test]
    fn test_resume_bound_is_exclusive() {
        let range = QueryRange::resuming_after(Value::Int(1000));
        assert!(!range.is_lower_inclusive());
        assert!(range.upper().is_none());
    }
}
