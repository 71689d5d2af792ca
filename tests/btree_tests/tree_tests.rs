//! Tests for BPlusTree
//!
//! These tests verify:
//! - Insert/search with multi-valued keys
//! - Key and value removal
//! - Range scans over the leaf chain
//! - Update operations
//! - Batched multi-key lookups

use std::collections::BTreeMap;

use arbordb::btree::BPlusTree;
use arbordb::ArborError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Helper Functions
// =============================================================================

fn string_tree(order: usize, keys: &[i64]) -> BPlusTree<i64, String> {
    let mut tree = BPlusTree::new(order);
    for &key in keys {
        tree.insert(key, format!("v{}", key));
    }
    tree
}

// =============================================================================
// Insert / Remove Tests
// =============================================================================

#[test]
fn test_remove_keys_after_splits() {
    let mut tree = string_tree(4, &[10, 20, 30, 40, 50, 60, 70, 80]);
    assert!(tree.height() > 1);

    for key in [20, 30, 40] {
        assert_eq!(tree.remove_key(&key), vec![format!("v{}", key)]);
    }

    assert_eq!(tree.len(), 5);
    assert_eq!(tree.keys(), vec![10, 50, 60, 70, 80]);
    for key in [20, 30, 40] {
        assert!(!tree.contains_key(&key));
        assert!(tree.search(&key).is_empty());
    }
}

#[test]
fn test_multi_valued_key_remove_value() {
    let mut tree: BPlusTree<i64, i64> = BPlusTree::new(4);
    tree.insert(1, 100);
    tree.insert(1, 101);
    tree.insert(1, 102);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.key_count(), 1);

    assert!(tree.remove_value(&1, &101));
    assert_eq!(tree.search(&1), vec![100, 102]);
    assert!(tree.contains_key(&1));

    assert!(tree.remove_value(&1, &100));
    assert!(tree.remove_value(&1, &102));
    assert!(!tree.keys().contains(&1));
    assert!(tree.is_empty());
}

#[test]
fn test_remove_missing_is_noop() {
    let mut tree = string_tree(4, &[1, 2, 3]);
    assert!(tree.remove_key(&9).is_empty());
    assert!(!tree.remove_value(&2, &"other".to_string()));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_insert_then_search_round_trip() {
    let keys: Vec<i64> = (0..500).map(|i| (i * 7919) % 1000).collect();
    let tree = string_tree(5, &keys);

    for &key in &keys {
        assert_eq!(tree.search(&key), vec![format!("v{}", key)]);
    }
    assert!(tree.search(&1001).is_empty());
}

#[test]
fn test_keys_ascending_after_random_inserts() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree: BPlusTree<i64, i64> = BPlusTree::new(4);
    for _ in 0..1000 {
        let key = rng.gen_range(-500..500);
        tree.insert(key, key);
    }

    let keys = tree.keys();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_drain_to_empty_and_reuse() {
    let keys: Vec<i64> = (0..200).collect();
    let mut tree = string_tree(3, &keys);

    for key in &keys {
        tree.remove_key(key);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert!(tree.keys().is_empty());

    tree.insert(5, "again".to_string());
    assert_eq!(tree.search(&5), vec!["again".to_string()]);
}

// =============================================================================
// Range Tests
// =============================================================================

#[test]
fn test_range_search_matches_model() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree: BPlusTree<i64, i64> = BPlusTree::new(4);
    let mut model: BTreeMap<i64, Vec<i64>> = BTreeMap::new();

    for i in 0..600 {
        let key = rng.gen_range(0..300);
        tree.insert(key, i);
        model.entry(key).or_default().push(i);
    }

    for _ in 0..50 {
        let lo = rng.gen_range(-10..310);
        let hi = rng.gen_range(-10..310);
        let expected: Vec<i64> = if lo <= hi {
            model.range(lo..=hi).flat_map(|(_, v)| v.clone()).collect()
        } else {
            Vec::new()
        };
        assert_eq!(tree.range_search(&lo, &hi), expected, "range {}..={}", lo, hi);
    }
}

#[test]
fn test_range_entries_pairs_keys_with_values() {
    let tree = string_tree(4, &[1, 2, 3, 4, 5, 6]);
    let entries = tree.range_entries(&2, &4);
    assert_eq!(
        entries,
        vec![
            (2, "v2".to_string()),
            (3, "v3".to_string()),
            (4, "v4".to_string())
        ]
    );
    assert!(tree.range_entries(&5, &2).is_empty());
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_replaces_value_list() {
    let mut tree: BPlusTree<i64, i64> = BPlusTree::new(4);
    tree.insert(1, 10);
    tree.insert(1, 11);

    tree.update(&1, 99).unwrap();
    assert_eq!(tree.search(&1), vec![99]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.update(&2, 0), Err(ArborError::KeyNotFound("2".to_string())));
}

#[test]
fn test_update_value_and_key() {
    let mut tree: BPlusTree<i64, i64> = BPlusTree::new(4);
    for key in 0..20 {
        tree.insert(key, key * 10);
    }

    tree.update_value(&3, &30, 31).unwrap();
    assert_eq!(tree.search(&3), vec![31]);
    assert!(matches!(
        tree.update_value(&3, &30, 32),
        Err(ArborError::KeyNotFound(_))
    ));

    tree.update_key(&3, 100).unwrap();
    assert!(!tree.contains_key(&3));
    assert_eq!(tree.search(&100), vec![31]);

    assert!(matches!(
        tree.update_key(&4, 5),
        Err(ArborError::DuplicateKey(_))
    ));
    assert!(matches!(
        tree.update_key(&3, 200),
        Err(ArborError::KeyNotFound(_))
    ));
    assert_eq!(tree.len(), 20);
}

// =============================================================================
// Multi-Key Search Tests
// =============================================================================

#[test]
fn test_multi_key_search_skips_missing_keys() {
    let keys: Vec<i64> = (0..1000).step_by(3).collect();
    let tree = string_tree(4, &keys);

    let wanted = vec![0, 1, 3, 4, 300, 301, 999, 5000];
    let found: Vec<i64> = tree
        .multi_key_search(&wanted)
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(found, vec![0, 3, 300, 999]);
}

#[test]
fn test_multi_key_search_far_apart_keys() {
    let keys: Vec<i64> = (1..=10_000).collect();
    let tree = string_tree(8, &keys);

    let wanted = vec![2, 9_000, 9_001, 10_000];
    let found = tree.multi_key_search(&wanted);
    assert_eq!(found.len(), 4);
    assert_eq!(found[1], (9_000, "v9000".to_string()));
}
