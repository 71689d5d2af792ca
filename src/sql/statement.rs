//! Statement definitions
//!
//! The parsed form of every statement the engine executes.

use std::fmt;
use std::str::FromStr;

use crate::error::ArborError;
use crate::value::Value;

/// A parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE name (col, ...)
    CreateTable(CreateTable),

    /// INSERT INTO name VALUES (id, v, ...)
    Insert(Insert),

    /// SELECT cols FROM name [WHERE cond]
    Select(Select),

    /// UPDATE name SET col = v, ... [WHERE cond]
    Update(Update),

    /// DELETE FROM name [WHERE cond]
    Delete(Delete),
}

impl Statement {
    /// Name of the table the statement targets
    pub fn table(&self) -> &str {
        match self {
            Statement::CreateTable(s) => &s.table,
            Statement::Insert(s) => &s.table,
            Statement::Select(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: String,
    /// Column names without the implicit `id`
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub primary_key: Value,
    /// Remaining values, one per column
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    /// Requested columns; `["*"]` selects all of them
    pub columns: Vec<String>,
    pub condition: Option<Condition>,
}

impl Select {
    /// `SELECT * FROM table`
    pub fn all(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec!["*".to_string()],
            condition: None,
        }
    }

    /// Add a WHERE clause
    pub fn filter(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_select_all(&self) -> bool {
        matches!(self.columns.as_slice(), [only] if only == "*")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub condition: Option<Condition>,
}

// =============================================================================
// Conditions
// =============================================================================

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Column(String),
    Literal(Value),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl FromStr for CompareOp {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::LtEq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::GtEq),
            other => Err(ArborError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        f.write_str(symbol)
    }
}

/// A WHERE-clause tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Leaf comparison; the engine accepts `column op literal`
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },

    And(Box<Condition>, Box<Condition>),

    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// `column op literal`
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::Compare {
            left: Operand::Column(column.into()),
            op,
            right: Operand::Literal(value.into()),
        }
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Self {
        Condition::Or(Box::new(self), Box::new(other))
    }
}
