//! Query cache
//!
//! LRU memo of `SELECT * FROM t` results. Any write to a table evicts every
//! entry for that table.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::sql::{Condition, Select};

use super::outcome::ResultSet;

/// Identity of a cached read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub table: String,
    pub condition: Option<Condition>,
    pub columns: Vec<String>,
}

impl From<&Select> for CacheKey {
    fn from(select: &Select) -> Self {
        Self {
            table: select.table.clone(),
            condition: select.condition.clone(),
            columns: select.columns.clone(),
        }
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct QueryCache {
    entries: LruCache<CacheKey, ResultSet>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Only unfiltered full-row reads are cacheable
    pub fn is_cacheable(select: &Select) -> bool {
        select.condition.is_none() && select.is_select_all()
    }

    /// Look up a result, counting the hit or miss
    pub fn get(&mut self, key: &CacheKey) -> Option<ResultSet> {
        match self.entries.get(key) {
            Some(result) => {
                self.hits += 1;
                debug!(table = %key.table, "Query cache hit");
                Some(result.clone())
            }
            None => {
                self.misses += 1;
                debug!(table = %key.table, "Query cache miss");
                None
            }
        }
    }

    pub fn put(&mut self, key: CacheKey, result: ResultSet) {
        self.entries.put(key, result);
    }

    /// Evict every entry for `table`
    pub fn invalidate_table(&mut self, table: &str) {
        let stale: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.table == table)
            .map(|(key, _)| key.clone())
            .collect();

        if !stale.is_empty() {
            debug!(table, evicted = stale.len(), "Invalidated query cache entries");
        }
        for key in stale {
            self.entries.pop(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            capacity: self.entries.cap().get(),
        }
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}
