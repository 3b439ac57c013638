use connectors::sql::base::dialect::DatabaseKind;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// The first chunk of a run has no cursor lower bound (or a resume-position
/// bound); every later chunk has an exclusive bound from the previous max
/// key. The two SQL shapes are cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkPhase {
    First,
    Later,
}

/// Composite cache key: similarly-named tables in different schemas or
/// dialects never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlCacheKey {
    pub kind: DatabaseKind,
    pub schema: Option<String>,
    pub table: String,
    pub phase: ChunkPhase,
}

#[derive(Default)]
pub struct SqlCache {
    inner: RwLock<HashMap<SqlCacheKey, Arc<String>>>,
}

impl SqlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, key: SqlCacheKey, build: impl FnOnce() -> String) -> Arc<String> {
        if let Some(sql) = self.inner.read().expect("sql cache poisoned").get(&key) {
            return sql.clone();
        }
        let sql = Arc::new(build());
        self.inner
            .write()
            .expect("sql cache poisoned")
            .insert(key, sql.clone());
        sql
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.read().expect("sql cache poisoned").len()
    }
}
