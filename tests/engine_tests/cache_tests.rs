//! Tests for the query cache
//!
//! These tests verify:
//! - Only full-table reads are cached
//! - Writes evict a table's cached results
//! - Capacity-bound LRU eviction
//! - Statistics and the disabled mode

use arbordb::engine::{CacheKey, QueryCache, ResultSet};
use arbordb::sql::Select;
use arbordb::{Config, Engine};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine(capacity: usize) -> Engine {
    let config = Config::builder()
        .btree_order(4)
        .query_cache_capacity(capacity)
        .build();
    let mut engine = Engine::new(config).unwrap();
    engine.execute_sql("CREATE TABLE t (name)").unwrap();
    engine.execute_sql("INSERT INTO t VALUES (1, 'a')").unwrap();
    engine
}

fn hits_and_misses(engine: &Engine) -> (u64, u64) {
    let stats = engine.cache_stats().unwrap();
    (stats.hits, stats.misses)
}

// =============================================================================
// Engine Cache Tests
// =============================================================================

#[test]
fn test_repeated_full_select_hits() {
    let mut engine = setup_engine(16);

    let first = engine.execute_sql("SELECT * FROM t").unwrap();
    let second = engine.execute_sql("SELECT * FROM t").unwrap();

    assert_eq!(first, second);
    assert_eq!(hits_and_misses(&engine), (1, 1));
    assert_eq!(engine.cache_stats().unwrap().hit_rate(), 0.5);
}

#[test]
fn test_filtered_and_projected_reads_bypass_cache() {
    let mut engine = setup_engine(16);

    engine.execute_sql("SELECT * FROM t WHERE name = 'a'").unwrap();
    engine.execute_sql("SELECT name FROM t").unwrap();

    assert_eq!(hits_and_misses(&engine), (0, 0));
    assert_eq!(engine.cache_stats().unwrap().entries, 0);
}

#[test]
fn test_every_write_invalidates() {
    let mut engine = setup_engine(16);
    let writes = [
        "INSERT INTO t VALUES (2, 'b')",
        "UPDATE t SET name = 'c' WHERE id = 2",
        "UPDATE t SET id = 3 WHERE id = 2",
        "DELETE FROM t WHERE id = 3",
    ];

    for write in writes {
        let before = engine.execute_sql("SELECT * FROM t").unwrap().to_string();
        engine.execute_sql(write).unwrap();
        let after = engine.execute_sql("SELECT * FROM t").unwrap().to_string();

        assert_ne!(before, after, "stale result after {}", write);
    }
}

#[test]
fn test_cached_result_matches_uncached() {
    let mut cached = setup_engine(16);
    let mut uncached = Engine::new(
        Config::builder()
            .btree_order(4)
            .query_cache_enabled(false)
            .build(),
    )
    .unwrap();
    uncached.execute_sql("CREATE TABLE t (name)").unwrap();
    uncached.execute_sql("INSERT INTO t VALUES (1, 'a')").unwrap();

    for sql in [
        "SELECT * FROM t",
        "INSERT INTO t VALUES (5, 'e')",
        "SELECT * FROM t",
        "SELECT * FROM t",
        "DELETE FROM t WHERE name = 'a'",
        "SELECT * FROM t",
    ] {
        assert_eq!(cached.execute_sql(sql), uncached.execute_sql(sql), "{}", sql);
    }
    assert!(uncached.cache_stats().is_none());
}

#[test]
fn test_writes_to_other_tables_keep_entries() {
    let mut engine = setup_engine(16);
    engine.execute_sql("CREATE TABLE u (v)").unwrap();

    engine.execute_sql("SELECT * FROM t").unwrap();
    engine.execute_sql("INSERT INTO u VALUES (1, 1)").unwrap();
    engine.execute_sql("SELECT * FROM t").unwrap();

    assert_eq!(hits_and_misses(&engine), (1, 1));
}

#[test]
fn test_reset_stats() {
    let mut engine = setup_engine(16);
    engine.execute_sql("SELECT * FROM t").unwrap();
    engine.reset_cache_stats();

    let stats = engine.cache_stats().unwrap();
    assert_eq!((stats.hits, stats.misses), (0, 0));
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hit_rate(), 0.0);
}

// =============================================================================
// QueryCache Tests
// =============================================================================

#[test]
fn test_lru_evicts_oldest_entry() {
    let mut cache = QueryCache::new(std::num::NonZeroUsize::new(2).unwrap());
    let columns = vec!["v".to_string()];

    for table in ["a", "b", "c"] {
        cache.put(CacheKey::from(&Select::all(table)), ResultSet::new(&columns));
    }

    assert!(cache.get(&CacheKey::from(&Select::all("a"))).is_none());
    assert!(cache.get(&CacheKey::from(&Select::all("c"))).is_some());
    assert_eq!(cache.stats().entries, 2);
    assert_eq!(cache.stats().capacity, 2);
}

#[test]
fn test_invalidate_table_is_scoped() {
    let mut cache = QueryCache::new(std::num::NonZeroUsize::new(8).unwrap());
    let columns = vec!["v".to_string()];
    cache.put(CacheKey::from(&Select::all("a")), ResultSet::new(&columns));
    cache.put(CacheKey::from(&Select::all("b")), ResultSet::new(&columns));

    cache.invalidate_table("a");

    assert!(cache.get(&CacheKey::from(&Select::all("a"))).is_none());
    assert!(cache.get(&CacheKey::from(&Select::all("b"))).is_some());
}

#[test]
fn test_cacheable_shapes() {
    use arbordb::sql::{CompareOp, Condition};

    assert!(QueryCache::is_cacheable(&Select::all("t")));
    assert!(!QueryCache::is_cacheable(
        &Select::all("t").filter(Condition::compare("v", CompareOp::Eq, 1i64))
    ));
}
