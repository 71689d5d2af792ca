//! Column values and index keys
//!
//! `Value` is what rows and SQL literals hold. `IndexKey` is the totally
//! ordered form a value takes inside a secondary index.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::btree::KeyDistance;

/// A typed column value
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so statements can be hashed as cache keys
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

// =============================================================================
// Index Keys
// =============================================================================

/// Key of a secondary index entry
///
/// Integers and floats share one numeric space and compare by exact
/// numeric value, so `Int(3)` equals `Float(3.0)` and no two distinct
/// integers ever collide. Every number orders before every string; strings
/// order lexicographically.
#[derive(Debug, Clone)]
pub enum IndexKey {
    Int(i64),
    Float(f64),
    Text(String),
}

impl IndexKey {
    /// Float key with `-0.0` folded into `0.0`
    pub fn float(x: f64) -> Self {
        IndexKey::Float(if x == 0.0 { 0.0 } else { x })
    }

    fn is_number(&self) -> bool {
        !matches!(self, IndexKey::Text(_))
    }

    /// Numeric value as `f64`, lossy for integers beyond 2^53
    fn approx(&self) -> f64 {
        match self {
            IndexKey::Int(n) => *n as f64,
            IndexKey::Float(x) => *x,
            IndexKey::Text(_) => 0.0,
        }
    }

    /// Smallest key of the same kind (used as the `-infinity` range bound)
    pub fn kind_min(&self) -> IndexKey {
        if self.is_number() {
            IndexKey::Float(f64::NEG_INFINITY)
        } else {
            IndexKey::Text(String::new())
        }
    }

    /// Largest key of the same kind, or `None` when the kind is unbounded
    /// above (strings)
    pub fn kind_max(&self) -> Option<IndexKey> {
        if self.is_number() {
            Some(IndexKey::Float(f64::INFINITY))
        } else {
            None
        }
    }
}

/// Exact comparison of an integer against a float
///
/// NaN orders like `f64::total_cmp`: negative NaN below everything,
/// positive NaN above everything.
fn cmp_int_float(a: i64, b: f64) -> Ordering {
    // 2^63, the first float above i64::MAX
    const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= I64_LIMIT {
        return Ordering::Less;
    }
    if b < -I64_LIMIT {
        return Ordering::Greater;
    }

    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal if b > whole => Ordering::Less,
        Ordering::Equal if b < whole => Ordering::Greater,
        ordering => ordering,
    }
}

impl From<&Value> for IndexKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(n) => IndexKey::Int(*n),
            Value::Float(x) => IndexKey::float(*x),
            Value::Text(s) => IndexKey::Text(s.clone()),
        }
    }
}

impl From<&str> for IndexKey {
    fn from(s: &str) -> Self {
        IndexKey::Text(s.to_string())
    }
}

impl From<i64> for IndexKey {
    fn from(n: i64) -> Self {
        IndexKey::Int(n)
    }
}

impl From<f64> for IndexKey {
    fn from(x: f64) -> Self {
        IndexKey::float(x)
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Int(a), IndexKey::Int(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => a.total_cmp(b),
            (IndexKey::Int(a), IndexKey::Float(b)) => cmp_int_float(*a, *b),
            (IndexKey::Float(a), IndexKey::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (IndexKey::Text(a), IndexKey::Text(b)) => a.cmp(b),
            (IndexKey::Text(_), _) => Ordering::Greater,
            (_, IndexKey::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl KeyDistance for IndexKey {
    fn distance(&self, other: &Self) -> f64 {
        match (self, other) {
            (IndexKey::Int(a), IndexKey::Int(b)) => (*a as i128 - *b as i128).abs() as f64,
            _ if self.is_number() && other.is_number() => (self.approx() - other.approx()).abs(),
            _ if self == other => 0.0,
            _ => f64::INFINITY,
        }
    }

    fn magnitude(&self) -> f64 {
        self.approx().abs()
    }
}
