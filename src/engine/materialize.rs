//! Row materializer
//!
//! Fetches rows for a set of primary keys with as few tree descents as
//! possible: contiguous key runs become one range scan each, isolated keys
//! are batched into a single multi-key walk.

use crate::table::{Row, Table};

/// Rows for `keys`, sorted by primary key; keys without rows are dropped
pub fn materialize(table: &Table, mut keys: Vec<i64>) -> Vec<(i64, Row)> {
    keys.sort_unstable();
    keys.dedup();

    let rows = table.rows();
    let mut result = Vec::with_capacity(keys.len());
    let mut singles = Vec::new();

    for run in contiguous_runs(&keys) {
        match run {
            [single] => singles.push(*single),
            [first, .., last] => result.extend(rows.range_entries(first, last)),
            [] => {}
        }
    }

    if !singles.is_empty() {
        result.extend(rows.multi_key_search(&singles));
    }

    result.sort_unstable_by_key(|(id, _)| *id);
    result
}

/// Split sorted, distinct keys into maximal runs of consecutive integers
fn contiguous_runs(keys: &[i64]) -> Vec<&[i64]> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..=keys.len() {
        let breaks = i == keys.len() || keys[i - 1].checked_add(1) != Some(keys[i]);
        if breaks {
            runs.push(&keys[start..i]);
            start = i;
        }
    }

    runs
}
