//! Data match: the streaming core. Chunks are fetched in ascending
//! unique-key order, each chunk's max key seeding the next chunk's
//! exclusive lower bound, so a run can resume from any recorded key.

use crate::{
    algorithm::{AlgorithmKind, CalculateAlgorithm, CalculationStream},
    error::ConsistencyError,
    param::CalculationParameter,
    query::{
        cache::{ChunkPhase, SqlCache, SqlCacheKey},
        range_sql::{RangeQueryBuilder, RangeShape},
    },
    result::RecordSetResult,
};
use connectors::sql::base::requests::FetchRequest;
use model::{core::value::Value, execution::properties::Properties, pagination::range::QueryType};
use std::sync::Arc;
use tracing::{debug, warn};

pub const CHUNK_SIZE_KEY: &str = "chunk-size";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Observability safeguard, not a hard limit.
const CHUNK_COUNT_WARN_THRESHOLD: u64 = 1_000_000;

pub struct DataMatchAlgorithm {
    chunk_size: usize,
    sql_cache: Arc<SqlCache>,
}

impl DataMatchAlgorithm {
    pub fn new(properties: &Properties) -> Self {
        Self {
            chunk_size: chunk_size_from(properties),
            sql_cache: Arc::new(SqlCache::new()),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

fn chunk_size_from(properties: &Properties) -> usize {
    let Some(value) = properties.get(CHUNK_SIZE_KEY) else {
        return DEFAULT_CHUNK_SIZE;
    };
    match value.as_i64() {
        Some(size) if size > 0 => size as usize,
        _ => {
            warn!(
                value = %value,
                default = DEFAULT_CHUNK_SIZE,
                "Invalid chunk-size property, falling back to default."
            );
            DEFAULT_CHUNK_SIZE
        }
    }
}

impl CalculateAlgorithm for DataMatchAlgorithm {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::DataMatch
    }

    fn calculate(&self, param: CalculationParameter) -> CalculationStream {
        CalculationStream::Records(RecordChunkStream::new(
            param,
            self.chunk_size,
            self.sql_cache.clone(),
        ))
    }
}

enum ChunkState {
    Start,
    /// Carries the previous chunk's max unique-key value.
    Pending(Value),
    Exhausted,
}

/// Single-pass cursor over one table side. Not restartable and not safe for
/// concurrent use: exactly one logical caller advances it.
pub struct RecordChunkStream {
    param: CalculationParameter,
    chunk_size: usize,
    sql_cache: Arc<SqlCache>,
    state: ChunkState,
    chunks_calculated: u64,
}

impl RecordChunkStream {
    pub(crate) fn new(
        param: CalculationParameter,
        chunk_size: usize,
        sql_cache: Arc<SqlCache>,
    ) -> Self {
        Self {
            param,
            chunk_size,
            sql_cache,
            state: ChunkState::Start,
            chunks_calculated: 0,
        }
    }

    /// Fetches the next chunk. `Ok(None)` is natural exhaustion and stays
    /// `Ok(None)` on every later call; cancellation surfaces as a distinct
    /// error so an aborted walk is never mistaken for a completed one.
    pub async fn next_chunk(&mut self) -> Result<Option<RecordSetResult>, ConsistencyError> {
        let (phase, range) = match &self.state {
            ChunkState::Start => (ChunkPhase::First, self.param.query_range.clone()),
            ChunkState::Pending(last_key) => (
                ChunkPhase::Later,
                self.param.query_range.advanced_past(last_key.clone()),
            ),
            ChunkState::Exhausted => return Ok(None),
        };
        if self.param.cancel.is_cancelled() {
            self.state = ChunkState::Exhausted;
            return Err(ConsistencyError::Cancelled(self.param.table.clone()));
        }

        self.chunks_calculated += 1;
        if self.chunks_calculated == CHUNK_COUNT_WARN_THRESHOLD {
            warn!(
                table = %self.param.table,
                chunks = self.chunks_calculated,
                "Chunk count reached the safety threshold, suspected infinite loop."
            );
        }

        let columns = self.param.fetch_columns()?;
        let key = self.param.first_unique_key()?.clone();
        let dialect = self
            .param
            .kind
            .dialect()
            .ok_or_else(|| ConsistencyError::UnsupportedDialect(self.param.kind.clone()))?;
        let column_names: Vec<String> = columns.iter().map(|col| col.name.clone()).collect();

        let (sql, params) = match self.param.query_type {
            QueryType::RangeQuery => {
                let sql = self.sql_cache.get_or_build(
                    SqlCacheKey {
                        kind: self.param.kind.clone(),
                        schema: self.param.table.schema.clone(),
                        table: self.param.table.name.clone(),
                        phase,
                    },
                    || {
                        RangeQueryBuilder::new(dialect).build_range_query(
                            &self.param.table,
                            &column_names,
                            &key.name,
                            RangeShape::of(&range),
                            &self.param.sharding_columns,
                            Some(self.chunk_size),
                        )
                    },
                );
                let mut params = Vec::new();
                if let Some(lower) = range.lower() {
                    params.push(lower.clone());
                }
                if let Some(upper) = range.upper() {
                    params.push(upper.clone());
                }
                (sql, params)
            }
            QueryType::PointQuery => {
                let key_names: Vec<String> = self
                    .param
                    .unique_keys
                    .iter()
                    .map(|col| col.name.clone())
                    .collect();
                let sql = Arc::new(RangeQueryBuilder::new(dialect).build_point_query(
                    &self.param.table,
                    &column_names,
                    &key_names,
                ));
                (sql, self.param.unique_key_values.clone())
            }
        };

        debug!(table = %self.param.table, chunk = self.chunks_calculated, "Calculating chunk.");
        let request = FetchRequest::new(sql.as_str(), params, columns)
            .with_cancel(self.param.cancel.clone());
        let records = self
            .param
            .adapter
            .fetch_rows(request)
            .await
            .map_err(|e| ConsistencyError::from_db(&self.param.table, e))?;

        if records.is_empty() {
            self.state = ChunkState::Exhausted;
            return Ok(None);
        }

        let max_key = records[records.len() - 1].get_value(&key.name);
        if max_key.is_null() {
            self.state = ChunkState::Exhausted;
            return Err(ConsistencyError::MissingUniqueKeyValue(
                self.param.table.clone(),
            ));
        }

        // A short chunk proves there is nothing beyond it; point queries are
        // one chunk by construction.
        let is_final = self.param.query_type == QueryType::PointQuery
            || records.len() < self.chunk_size;
        self.state = if is_final {
            ChunkState::Exhausted
        } else {
            ChunkState::Pending(max_key.clone())
        };
        Ok(Some(RecordSetResult::new(max_key, records)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_defaults_when_absent() {
        assert_eq!(chunk_size_from(&Properties::new()), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_chunk_size_falls_back_on_invalid_values() {
        let mut properties = Properties::new();
        properties.insert(CHUNK_SIZE_KEY, Value::String("not-a-number".into()));
        assert_eq!(chunk_size_from(&properties), DEFAULT_CHUNK_SIZE);

        properties.insert(CHUNK_SIZE_KEY, Value::Int(0));
        assert_eq!(chunk_size_from(&properties), DEFAULT_CHUNK_SIZE);

        properties.insert(CHUNK_SIZE_KEY, Value::Int(-5));
        assert_eq!(chunk_size_from(&properties), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_chunk_size_accepts_numeric_strings() {
        let mut properties = Properties::new();
        properties.insert(CHUNK_SIZE_KEY, Value::String("250".into()));
        assert_eq!(chunk_size_from(&properties), 250);
    }
}
