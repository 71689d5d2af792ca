//! Tests for condition evaluation
//!
//! These tests verify:
//! - Every comparison operator against column indexes
//! - Primary-key comparisons
//! - AND/OR combination against brute-force filtering
//! - Rejection of unsupported condition shapes

use std::collections::BTreeSet;

use arbordb::engine::evaluate;
use arbordb::sql::{CompareOp, Condition, Operand};
use arbordb::table::Table;
use arbordb::value::Value;
use arbordb::{ArborError, Config, Engine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Helper Functions
// =============================================================================

/// `scores (name, score)` with ids 1..=n, names cycling through five values
fn setup_scores(n: i64) -> Engine {
    let mut engine = Engine::new(Config::builder().btree_order(4).build()).unwrap();
    engine.execute_sql("CREATE TABLE scores (name, score)").unwrap();

    let names = ["ann", "ben", "cat", "dan", "eve"];
    for id in 1..=n {
        let name = names[(id % 5) as usize];
        engine
            .execute_sql(&format!(
                "INSERT INTO scores VALUES ({}, '{}', {})",
                id,
                name,
                (id * 37) % 101
            ))
            .unwrap();
    }
    engine
}

fn sorted(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Brute-force evaluation of `score op literal` over every row
fn brute_force(table: &Table, op: CompareOp, literal: i64) -> Vec<i64> {
    table
        .rows()
        .entries()
        .into_iter()
        .filter(|(_, row)| {
            let Value::Int(score) = row[1] else {
                return false;
            };
            match op {
                CompareOp::Eq => score == literal,
                CompareOp::NotEq => score != literal,
                CompareOp::Lt => score < literal,
                CompareOp::LtEq => score <= literal,
                CompareOp::Gt => score > literal,
                CompareOp::GtEq => score >= literal,
            }
        })
        .map(|(id, _)| id)
        .collect()
}

const OPERATORS: [CompareOp; 6] = [
    CompareOp::Eq,
    CompareOp::NotEq,
    CompareOp::Lt,
    CompareOp::LtEq,
    CompareOp::Gt,
    CompareOp::GtEq,
];

// =============================================================================
// Comparison Tests
// =============================================================================

#[test]
fn test_every_operator_matches_brute_force() {
    let engine = setup_scores(150);
    let table = engine.table("scores").unwrap();

    for op in OPERATORS {
        for literal in [-1, 0, 17, 50, 100, 101] {
            let condition = Condition::compare("score", op, literal);
            let found = sorted(evaluate(table, &condition).unwrap());
            assert_eq!(found, brute_force(table, op, literal), "score {} {}", op, literal);
        }
    }
}

#[test]
fn test_float_literal_compares_with_integers() {
    let engine = setup_scores(50);
    let table = engine.table("scores").unwrap();

    let condition = Condition::compare("score", CompareOp::Lt, 10.5);
    let found = sorted(evaluate(table, &condition).unwrap());
    assert_eq!(found, brute_force(table, CompareOp::LtEq, 10));
}

#[test]
fn test_integers_beyond_f64_precision_stay_distinct() {
    let mut engine = Engine::new(Config::default()).unwrap();
    engine.execute_sql("CREATE TABLE t (v)").unwrap();
    engine
        .execute_sql("INSERT INTO t VALUES (1, 9007199254740992)")
        .unwrap();
    engine
        .execute_sql("INSERT INTO t VALUES (2, 9007199254740993)")
        .unwrap();
    let table = engine.table("t").unwrap();

    let cases = [
        (CompareOp::Eq, 9_007_199_254_740_993i64, vec![2]),
        (CompareOp::Eq, 9_007_199_254_740_992, vec![1]),
        (CompareOp::Gt, 9_007_199_254_740_992, vec![2]),
        (CompareOp::GtEq, 9_007_199_254_740_992, vec![1, 2]),
        (CompareOp::Lt, 9_007_199_254_740_993, vec![1]),
        (CompareOp::NotEq, 9_007_199_254_740_993, vec![1]),
    ];
    for (op, literal, expected) in cases {
        let condition = Condition::compare("v", op, literal);
        assert_eq!(
            sorted(evaluate(table, &condition).unwrap()),
            expected,
            "v {} {}",
            op,
            literal
        );
    }
}

#[test]
fn test_string_ranges_are_lexicographic() {
    let engine = setup_scores(20);
    let table = engine.table("scores").unwrap();

    let condition = Condition::compare("name", CompareOp::GtEq, "cat");
    let found = sorted(evaluate(table, &condition).unwrap());
    let expected: Vec<i64> = (1..=20).filter(|id| id % 5 >= 2).collect();
    assert_eq!(found, expected);

    let condition = Condition::compare("name", CompareOp::Lt, "b");
    let found = sorted(evaluate(table, &condition).unwrap());
    let expected: Vec<i64> = (1..=20).filter(|id| id % 5 == 0).collect();
    assert_eq!(found, expected);
}

#[test]
fn test_primary_key_comparisons() {
    let engine = setup_scores(10);
    let table = engine.table("scores").unwrap();

    let gt = Condition::compare("id", CompareOp::Gt, 7i64);
    assert_eq!(evaluate(table, &gt).unwrap(), vec![8, 9, 10]);

    let ne = Condition::compare("id", CompareOp::NotEq, 1i64);
    assert_eq!(evaluate(table, &ne).unwrap(), (2..=10).collect::<Vec<_>>());

    let bad = Condition::compare("id", CompareOp::Eq, "one");
    assert!(matches!(
        evaluate(table, &bad),
        Err(ArborError::InvalidValueType(_))
    ));
}

#[test]
fn test_unknown_column() {
    let engine = setup_scores(5);
    let table = engine.table("scores").unwrap();
    let condition = Condition::compare("email", CompareOp::Eq, "x");
    assert!(matches!(
        evaluate(table, &condition),
        Err(ArborError::ColumnNotFound { .. })
    ));
}

#[test]
fn test_empty_index_yields_nothing() {
    let mut engine = Engine::new(Config::default()).unwrap();
    engine.execute_sql("CREATE TABLE t (a)").unwrap();
    let table = engine.table("t").unwrap();

    let condition = Condition::compare("a", CompareOp::NotEq, 1i64);
    assert!(evaluate(table, &condition).unwrap().is_empty());
}

// =============================================================================
// Boolean Combination Tests
// =============================================================================

#[test]
fn test_and_or_match_set_operations() {
    let engine = setup_scores(200);
    let table = engine.table("scores").unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..40 {
        let op_a = OPERATORS[rng.gen_range(0..OPERATORS.len())];
        let op_b = OPERATORS[rng.gen_range(0..OPERATORS.len())];
        let lit_a = rng.gen_range(0..101);
        let lit_b = rng.gen_range(0..101);

        let a: BTreeSet<i64> = brute_force(table, op_a, lit_a).into_iter().collect();
        let b: BTreeSet<i64> = brute_force(table, op_b, lit_b).into_iter().collect();

        let cond_a = Condition::compare("score", op_a, lit_a);
        let cond_b = Condition::compare("score", op_b, lit_b);

        let and = sorted(evaluate(table, &cond_a.clone().and(cond_b.clone())).unwrap());
        let or = evaluate(table, &cond_a.or(cond_b)).unwrap();

        assert_eq!(and, a.intersection(&b).copied().collect::<Vec<_>>());
        assert_eq!(or, a.union(&b).copied().collect::<Vec<_>>());
    }
}

#[test]
fn test_conditions_chain_left_to_right() {
    let mut engine = setup_scores(30);

    // (name = 'ann' OR name = 'ben') AND score < 50
    let outcome = engine
        .execute_sql("SELECT * FROM scores WHERE name = 'ann' OR name = 'ben' AND score < 50")
        .unwrap();
    let table = engine.table("scores").unwrap();
    let expected: Vec<i64> = brute_force(table, CompareOp::Lt, 50)
        .into_iter()
        .filter(|id| id % 5 == 0 || id % 5 == 1)
        .collect();
    assert_eq!(outcome.result_set().unwrap().ids(), expected);
}

// =============================================================================
// Structural Error Tests
// =============================================================================

#[test]
fn test_literal_on_left_rejected() {
    let engine = setup_scores(5);
    let table = engine.table("scores").unwrap();

    let condition = Condition::Compare {
        left: Operand::Literal(Value::Int(30)),
        op: CompareOp::Lt,
        right: Operand::Column("score".to_string()),
    };
    assert!(matches!(
        evaluate(table, &condition),
        Err(ArborError::StructuralCondition(_))
    ));
}

#[test]
fn test_column_to_column_rejected() {
    let mut engine = setup_scores(5);
    assert!(matches!(
        engine.execute_sql("SELECT * FROM scores WHERE score = name"),
        Err(ArborError::StructuralCondition(_))
    ));
}

#[test]
fn test_unknown_operator_rejected() {
    let mut engine = setup_scores(5);
    assert_eq!(
        engine.execute_sql("SELECT * FROM scores WHERE score <> 3"),
        Err(ArborError::InvalidOperator("<>".to_string()))
    );
}
