//! Table storage
//!
//! A table is one primary B+Tree (`id` → row) plus one multi-valued
//! secondary index per column (column value → ids).
//!
//! ## Consistency
//! Every write goes through the methods here, which keep each column index
//! in step with the row store: a column value is present in a row exactly
//! when its index maps that value to the row's id.

use crate::btree::BPlusTree;
use crate::error::{ArborError, Result};
use crate::value::{IndexKey, Value};

/// Name of the implicit primary-key column
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Column values of one row, ordered like `Table::columns`
pub type Row = Vec<Value>;

/// Secondary index: column value → primary keys holding it
pub type SecondaryIndex = BPlusTree<IndexKey, i64>;

/// A table with its row store and per-column indexes
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: BPlusTree<i64, Row>,
    /// One index per column, same order as `columns`
    indexes: Vec<SecondaryIndex>,
}

impl Table {
    /// Create an empty table; `columns` must not contain `id`
    pub fn new(name: impl Into<String>, columns: Vec<String>, order: usize) -> Self {
        let indexes = columns.iter().map(|_| BPlusTree::new(order)).collect();
        Self {
            name: name.into(),
            columns,
            rows: BPlusTree::new(order),
            indexes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names, excluding the primary key
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like `column_index`, failing with `ColumnNotFound`
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| ArborError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// The primary row store
    pub fn rows(&self) -> &BPlusTree<i64, Row> {
        &self.rows
    }

    /// Secondary index of a column
    pub fn index(&self, column: &str) -> Result<&SecondaryIndex> {
        let idx = self.require_column(column)?;
        Ok(&self.indexes[idx])
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, key: i64) -> bool {
        self.rows.contains_key(&key)
    }

    /// Fetch one row
    pub fn row(&self, key: i64) -> Option<&Row> {
        self.rows.get(&key).and_then(|values| values.first())
    }

    // =========================================================================
    // Write Path (callers validate first)
    // =========================================================================

    /// Index every column value, then store the row
    ///
    /// The caller guarantees `key` is absent and `row` matches the schema.
    pub(crate) fn insert_row(&mut self, key: i64, row: Row) {
        for (index, value) in self.indexes.iter_mut().zip(&row) {
            index.insert(IndexKey::from(value), key);
        }
        self.rows.insert(key, row);
    }

    /// Remove a row and all of its index entries
    pub(crate) fn delete_row(&mut self, key: i64) -> Option<Row> {
        let row = self.rows.remove_key(&key).into_iter().next()?;
        for (index, value) in self.indexes.iter_mut().zip(&row) {
            index.remove_value(&IndexKey::from(value), &key);
        }
        Some(row)
    }

    /// Apply column assignments to a row, re-indexing each changed column
    pub(crate) fn update_row(&mut self, key: i64, assignments: &[(usize, Value)]) -> Result<()> {
        let mut row = self
            .row(key)
            .cloned()
            .ok_or_else(|| ArborError::KeyNotFound(key.to_string()))?;

        for (column, value) in assignments {
            let index = &mut self.indexes[*column];
            index.remove_value(&IndexKey::from(&row[*column]), &key);
            index.insert(IndexKey::from(value), key);
            row[*column] = value.clone();
        }

        self.rows.update(&key, row)
    }

    /// Move a row to a new primary key, rewriting its index entries
    pub(crate) fn rekey_row(&mut self, old_key: i64, new_key: i64) -> Result<()> {
        if old_key == new_key {
            return Ok(());
        }

        let row = self
            .row(old_key)
            .cloned()
            .ok_or_else(|| ArborError::KeyNotFound(old_key.to_string()))?;

        self.rows.update_key(&old_key, new_key)?;
        for (index, value) in self.indexes.iter_mut().zip(&row) {
            index.update_value(&IndexKey::from(value), &old_key, new_key)?;
        }
        Ok(())
    }
}
