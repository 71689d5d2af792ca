//! Statement outcomes
//!
//! What a successful statement produced. `Display` renders the text a
//! client sees.

use std::fmt;

use crate::table::PRIMARY_KEY_COLUMN;
use crate::value::Value;

/// Rows returned by a SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Header, starting with the primary key column
    pub columns: Vec<String>,
    /// `(id, values)` in ascending id order; values follow `columns[1..]`
    pub rows: Vec<(i64, Vec<Value>)>,
}

impl ResultSet {
    pub fn new(columns: &[String]) -> Self {
        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push(PRIMARY_KEY_COLUMN.to_string());
        header.extend(columns.iter().cloned());
        Self {
            columns: header,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Primary keys in output order
    pub fn ids(&self) -> Vec<i64> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }
}

impl fmt::Display for ResultSet {
    /// Tab-separated header and rows, `NULL` for missing values, no
    /// trailing newline
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.columns.join("\t"))?;

        let width = self.columns.len().saturating_sub(1);
        for (id, values) in &self.rows {
            write!(f, "\n{}", id)?;
            for i in 0..width {
                match values.get(i) {
                    Some(value) => write!(f, "\t{}", value)?,
                    None => f.write_str("\tNULL")?,
                }
            }
        }

        Ok(())
    }
}

/// Kind of write a statement performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Updated,
    Deleted,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Updated => f.write_str("updated"),
            Mutation::Deleted => f.write_str("deleted"),
        }
    }
}

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TableCreated(String),
    Inserted,
    /// INSERT skipped because the primary key already exists
    DuplicatePrimaryKey,
    Selected(ResultSet),
    /// `count` rows changed; zero when the condition matched nothing
    Changed { mutation: Mutation, count: usize },
    /// UPDATE or DELETE against a table with no rows
    TableEmpty(Mutation),
}

impl Outcome {
    /// Rows touched by a write, or returned by a read
    pub fn row_count(&self) -> usize {
        match self {
            Outcome::TableCreated(_) | Outcome::DuplicatePrimaryKey | Outcome::TableEmpty(_) => 0,
            Outcome::Inserted => 1,
            Outcome::Selected(result) => result.len(),
            Outcome::Changed { count, .. } => *count,
        }
    }

    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Outcome::Selected(result) => Some(result),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::TableCreated(table) => write!(f, "Table {} created successfully", table),
            Outcome::Inserted => f.write_str("1 row inserted successfully"),
            Outcome::DuplicatePrimaryKey => {
                f.write_str("0 row inserted, primary key already exists")
            }
            Outcome::Selected(result) => fmt::Display::fmt(result, f),
            Outcome::Changed { mutation, count: 0 } => {
                write!(f, "0 row(s) {}, not found", mutation)
            }
            Outcome::Changed { mutation, count } => {
                write!(f, "{} row(s) {} successfully", count, mutation)
            }
            Outcome::TableEmpty(mutation) => write!(f, "0 row(s) {}, no rows found", mutation),
        }
    }
}
