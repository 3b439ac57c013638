//! The closed registry of calculation strategies.

pub mod checksum;
pub mod data_match;

use crate::{
    algorithm::{
        checksum::{ChecksumMatchAlgorithm, ChecksumStream},
        data_match::{DataMatchAlgorithm, RecordChunkStream},
    },
    error::ConsistencyError,
    param::CalculationParameter,
    result::CalculatedResult,
};
use connectors::sql::base::dialect::DatabaseKind;
use model::execution::properties::Properties;

const MYSQL_ONLY: &[DatabaseKind] = &[DatabaseKind::MySql];
const ALL_SUPPORTED: &[DatabaseKind] = &[DatabaseKind::MySql, DatabaseKind::Postgres];

/// Every strategy this engine ships. Adding a variant extends the registry;
/// there is no reflective lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    ChecksumMatch,
    DataMatch,
}

impl AlgorithmKind {
    pub const ALL: &[AlgorithmKind] = &[AlgorithmKind::ChecksumMatch, AlgorithmKind::DataMatch];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::ChecksumMatch => "CHECKSUM_MATCH",
            AlgorithmKind::DataMatch => "DATA_MATCH",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, ConsistencyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ConsistencyError::UnknownAlgorithm(tag.to_string()))
    }

    pub fn description(&self) -> &'static str {
        match self {
            AlgorithmKind::ChecksumMatch => {
                "Compare one server-side checksum per column; cheap, detects that data differs"
            }
            AlgorithmKind::DataMatch => {
                "Compare row chunks value by value; exact, detects where data differs"
            }
        }
    }

    pub fn supported_database_kinds(&self) -> &'static [DatabaseKind] {
        match self {
            AlgorithmKind::ChecksumMatch => MYSQL_ONLY,
            AlgorithmKind::DataMatch => ALL_SUPPORTED,
        }
    }

    pub fn new_algorithm(&self, properties: &Properties) -> Box<dyn CalculateAlgorithm> {
        match self {
            AlgorithmKind::ChecksumMatch => Box::new(ChecksumMatchAlgorithm::new()),
            AlgorithmKind::DataMatch => Box::new(DataMatchAlgorithm::new(properties)),
        }
    }
}

/// Registry metadata surfaced to the orchestrator.
#[derive(Debug, Clone)]
pub struct AlgorithmInfo {
    pub kind: AlgorithmKind,
    pub supported_database_kinds: &'static [DatabaseKind],
    pub description: &'static str,
}

pub fn supported_algorithms() -> Vec<AlgorithmInfo> {
    AlgorithmKind::ALL
        .iter()
        .map(|kind| AlgorithmInfo {
            kind: *kind,
            supported_database_kinds: kind.supported_database_kinds(),
            description: kind.description(),
        })
        .collect()
}

/// A calculation strategy. `calculate` is cheap: it only builds the lazy
/// sequence, no query runs until the first `next`.
pub trait CalculateAlgorithm: Send + Sync {
    fn kind(&self) -> AlgorithmKind;

    fn calculate(&self, param: CalculationParameter) -> CalculationStream;
}

/// The lazy per-table sequence of calculated results. Single-pass, not
/// restartable, not safe for concurrent use: at most one logical caller may
/// advance it. After exhaustion `next` keeps returning `Ok(None)`.
pub enum CalculationStream {
    Checksum(ChecksumStream),
    Records(RecordChunkStream),
}

impl CalculationStream {
    pub async fn next(&mut self) -> Result<Option<CalculatedResult>, ConsistencyError> {
        match self {
            CalculationStream::Checksum(stream) => Ok(stream
                .next()
                .await?
                .map(CalculatedResult::Checksum)),
            CalculationStream::Records(stream) => Ok(stream
                .next_chunk()
                .await?
                .map(CalculatedResult::Records)),
        }
    }
}
