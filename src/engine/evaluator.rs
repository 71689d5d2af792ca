//! Condition evaluator
//!
//! Turns a WHERE tree into the list of matching primary keys using the
//! table's indexes. Leaves are `column op literal` comparisons; `AND` and
//! `OR` combine child results depth-first.

use std::collections::HashSet;
use std::ops::Bound;

use crate::error::{ArborError, Result};
use crate::sql::{CompareOp, Condition, Operand};
use crate::table::{Table, PRIMARY_KEY_COLUMN};
use crate::value::{IndexKey, Value};

/// Primary keys of every row matching `condition`
///
/// `AND` results keep the order of the smaller side; `OR` results are sorted
/// ascending. Callers that need a stable order sort the output.
pub fn evaluate(table: &Table, condition: &Condition) -> Result<Vec<i64>> {
    match condition {
        Condition::Compare { left, op, right } => match (left, right) {
            (Operand::Column(column), Operand::Literal(value)) => {
                evaluate_comparison(table, column, *op, value)
            }
            _ => Err(ArborError::StructuralCondition(format!(
                "expected column {} literal, got {:?} {} {:?}",
                op, left, op, right
            ))),
        },
        Condition::And(left, right) => {
            let left = evaluate(table, left)?;
            let right = evaluate(table, right)?;
            Ok(intersect(left, right))
        }
        Condition::Or(left, right) => {
            let left = evaluate(table, left)?;
            let right = evaluate(table, right)?;
            Ok(union(left, right))
        }
    }
}

fn evaluate_comparison(
    table: &Table,
    column: &str,
    op: CompareOp,
    value: &Value,
) -> Result<Vec<i64>> {
    if column == PRIMARY_KEY_COLUMN {
        return evaluate_primary_key(table, op, value);
    }

    let index = table.index(column)?;
    if index.is_empty() {
        return Ok(Vec::new());
    }

    let key = IndexKey::from(value);
    let matches = match op {
        CompareOp::Eq => index.search(&key),
        CompareOp::NotEq => {
            let exact: HashSet<i64> = index.search(&key).into_iter().collect();
            index
                .values()
                .into_iter()
                .filter(|id| !exact.contains(id))
                .collect()
        }
        CompareOp::Lt | CompareOp::LtEq => {
            let min = key.kind_min();
            let upper = if op == CompareOp::Lt {
                Bound::Excluded(&key)
            } else {
                Bound::Included(&key)
            };
            index.range_by(Bound::Included(&min), upper)
        }
        CompareOp::Gt | CompareOp::GtEq => {
            let max = key.kind_max();
            let lower = if op == CompareOp::Gt {
                Bound::Excluded(&key)
            } else {
                Bound::Included(&key)
            };
            let upper = match &max {
                Some(max) => Bound::Included(max),
                None => Bound::Unbounded,
            };
            index.range_by(lower, upper)
        }
    };

    Ok(matches)
}

fn evaluate_primary_key(table: &Table, op: CompareOp, value: &Value) -> Result<Vec<i64>> {
    let target = value.as_int().ok_or_else(|| {
        ArborError::InvalidValueType(format!(
            "{} must be compared with an integer, got {}",
            PRIMARY_KEY_COLUMN,
            value.type_name()
        ))
    })?;

    if op == CompareOp::Eq {
        return Ok(vec![target]);
    }

    let keys = table
        .rows()
        .keys()
        .into_iter()
        .filter(|&id| match op {
            CompareOp::NotEq => id != target,
            CompareOp::Lt => id < target,
            CompareOp::LtEq => id <= target,
            CompareOp::Gt => id > target,
            CompareOp::GtEq => id >= target,
            CompareOp::Eq => id == target,
        })
        .collect();

    Ok(keys)
}

/// Keys present in both lists
pub fn intersect(left: Vec<i64>, right: Vec<i64>) -> Vec<i64> {
    let (small, large) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };

    let lookup: HashSet<i64> = large.into_iter().collect();
    let mut seen = HashSet::with_capacity(small.len());
    small
        .into_iter()
        .filter(|id| lookup.contains(id) && seen.insert(*id))
        .collect()
}

/// Keys present in either list, sorted and de-duplicated
pub fn union(mut left: Vec<i64>, right: Vec<i64>) -> Vec<i64> {
    left.extend(right);
    left.sort_unstable();
    left.dedup();
    left
}
