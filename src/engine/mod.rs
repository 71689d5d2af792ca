//! Engine Module
//!
//! Executes statements against the in-memory catalog of tables.
//!
//! ## Responsibilities
//! - Own the tables and route each statement to its table
//! - Validate every precondition before the first mutation
//! - Evaluate WHERE trees against the column indexes
//! - Memoize full-table reads and evict them on writes
//!
//! ## Concurrency
//! `Engine` has no internal locking. Every statement takes `&mut self`
//! (reads update the query cache). Wrap it in a `SharedEngine` to use it
//! from several threads.

mod cache;
mod evaluator;
mod materialize;
mod outcome;
mod shared;

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use tracing::debug;

use crate::config::Config;
use crate::error::{ArborError, Result};
use crate::sql::{self, CreateTable, Delete, Insert, Select, Statement, Update};
use crate::table::{Table, PRIMARY_KEY_COLUMN};
use crate::value::Value;

pub use cache::{CacheKey, CacheStats, QueryCache};
pub use evaluator::{evaluate, intersect, union};
pub use materialize::materialize;
pub use outcome::{Mutation, Outcome, ResultSet};
pub use shared::SharedEngine;

/// The statement executor
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Tables by name
    tables: HashMap<String, Table>,

    /// Memo of `SELECT * FROM t` results, absent when disabled
    cache: Option<QueryCache>,
}

/// Validated right-hand side of an UPDATE
struct UpdatePlan {
    /// Column position and new value
    assignments: Vec<(usize, Value)>,
    /// Target of `SET id = n`
    new_key: Option<i64>,
}

impl Engine {
    /// Create an empty engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let cache = if config.query_cache_enabled {
            NonZeroUsize::new(config.query_cache_capacity).map(QueryCache::new)
        } else {
            None
        };

        debug!(
            btree_order = config.btree_order,
            cache_enabled = cache.is_some(),
            "Engine created"
        );

        Ok(Self {
            config,
            tables: HashMap::new(),
            cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Entry Points
    // =========================================================================

    /// Parse and execute one SQL statement
    pub fn execute_sql(&mut self, sql: &str) -> Result<Outcome> {
        let statement = sql::parse(sql)?;
        self.execute(&statement)
    }

    /// Execute a parsed statement
    pub fn execute(&mut self, statement: &Statement) -> Result<Outcome> {
        match statement {
            Statement::CreateTable(create) => self.create_table(create),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Select(select) => self.select(select),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn create_table(&mut self, create: &CreateTable) -> Result<Outcome> {
        if self.tables.contains_key(&create.table) {
            return Err(ArborError::TableExists(create.table.clone()));
        }

        let columns: Vec<String> = create
            .columns
            .iter()
            .filter(|c| c.as_str() != PRIMARY_KEY_COLUMN)
            .cloned()
            .collect();

        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(column) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ArborError::DuplicateColumn {
                table: create.table.clone(),
                column: column.clone(),
            });
        }

        let table = Table::new(create.table.clone(), columns, self.config.btree_order);
        self.tables.insert(create.table.clone(), table);

        debug!(table = %create.table, "Created table");
        Ok(Outcome::TableCreated(create.table.clone()))
    }

    pub fn insert(&mut self, insert: &Insert) -> Result<Outcome> {
        let table = self
            .tables
            .get_mut(&insert.table)
            .ok_or_else(|| ArborError::TableNotFound(insert.table.clone()))?;

        if insert.values.len() != table.columns().len() {
            return Err(ArborError::ColumnCountMismatch {
                expected: table.columns().len() + 1,
                actual: insert.values.len() + 1,
            });
        }

        let key = primary_key(&insert.primary_key)?;
        if table.contains(key) {
            debug!(table = %insert.table, key, "Insert skipped, primary key exists");
            return Ok(Outcome::DuplicatePrimaryKey);
        }

        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate_table(&insert.table);
        }
        table.insert_row(key, insert.values.clone());

        debug!(table = %insert.table, key, "Inserted row");
        Ok(Outcome::Inserted)
    }

    pub fn select(&mut self, select: &Select) -> Result<Outcome> {
        let table = self
            .tables
            .get(&select.table)
            .ok_or_else(|| ArborError::TableNotFound(select.table.clone()))?;

        let cacheable = QueryCache::is_cacheable(select);
        if cacheable {
            if let Some(cache) = self.cache.as_mut() {
                if let Some(result) = cache.get(&CacheKey::from(select)) {
                    return Ok(Outcome::Selected(result));
                }
            }
        }

        let projection = project(table, select)?;
        let keys = match &select.condition {
            Some(condition) => evaluate(table, condition)?,
            None => table.rows().keys(),
        };

        let names: Vec<String> = projection
            .iter()
            .map(|&i| table.columns()[i].clone())
            .collect();
        let mut result = ResultSet::new(&names);
        result.rows = materialize(table, keys)
            .into_iter()
            .map(|(id, row)| (id, projection.iter().map(|&i| row[i].clone()).collect()))
            .collect();

        debug!(table = %select.table, rows = result.len(), "Executed SELECT");

        if cacheable {
            if let Some(cache) = self.cache.as_mut() {
                cache.put(CacheKey::from(select), result.clone());
            }
        }

        Ok(Outcome::Selected(result))
    }

    pub fn update(&mut self, update: &Update) -> Result<Outcome> {
        let table = self
            .tables
            .get_mut(&update.table)
            .ok_or_else(|| ArborError::TableNotFound(update.table.clone()))?;

        let plan = plan_update(table, update)?;
        let keys = matching_keys(table, update.condition.as_ref())?;

        if table.is_empty() {
            return Ok(Outcome::TableEmpty(Mutation::Updated));
        }
        if keys.is_empty() {
            return Ok(Outcome::Changed {
                mutation: Mutation::Updated,
                count: 0,
            });
        }

        if let Some(new_key) = plan.new_key {
            if keys.len() > 1 {
                return Err(ArborError::DuplicateKey(format!(
                    "{} = {} would be assigned to {} rows",
                    PRIMARY_KEY_COLUMN,
                    new_key,
                    keys.len()
                )));
            }
            if keys[0] != new_key && table.contains(new_key) {
                return Err(ArborError::DuplicateKey(new_key.to_string()));
            }
        }

        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate_table(&update.table);
        }

        for &key in &keys {
            if !plan.assignments.is_empty() {
                table.update_row(key, &plan.assignments)?;
            }
            if let Some(new_key) = plan.new_key {
                table.rekey_row(key, new_key)?;
            }
        }

        debug!(table = %update.table, rows = keys.len(), "Executed UPDATE");
        Ok(Outcome::Changed {
            mutation: Mutation::Updated,
            count: keys.len(),
        })
    }

    pub fn delete(&mut self, delete: &Delete) -> Result<Outcome> {
        let table = self
            .tables
            .get_mut(&delete.table)
            .ok_or_else(|| ArborError::TableNotFound(delete.table.clone()))?;

        let keys = matching_keys(table, delete.condition.as_ref())?;

        if table.is_empty() {
            return Ok(Outcome::TableEmpty(Mutation::Deleted));
        }
        if keys.is_empty() {
            return Ok(Outcome::Changed {
                mutation: Mutation::Deleted,
                count: 0,
            });
        }

        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate_table(&delete.table);
        }

        let count = keys
            .into_iter()
            .filter(|&key| table.delete_row(key).is_some())
            .count();

        debug!(table = %delete.table, rows = count, "Executed DELETE");
        Ok(Outcome::Changed {
            mutation: Mutation::Deleted,
            count,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| ArborError::TableNotFound(name.to_string()))
    }

    /// Table names in ascending order
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drop every table and cached result
    pub fn clear(&mut self) {
        self.tables.clear();
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        debug!("Engine cleared");
    }

    // =========================================================================
    // Cache Introspection
    // =========================================================================

    /// Cache counters, `None` when the cache is disabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(QueryCache::stats)
    }

    pub fn reset_cache_stats(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.reset_stats();
        }
    }
}

// =============================================================================
// Statement Helpers
// =============================================================================

fn primary_key(value: &Value) -> Result<i64> {
    value.as_int().ok_or_else(|| {
        ArborError::InvalidValueType(format!(
            "primary key must be an integer, got {}",
            value.type_name()
        ))
    })
}

/// Column positions a SELECT returns; `id` is always emitted first and is
/// skipped when listed
fn project(table: &Table, select: &Select) -> Result<Vec<usize>> {
    if select.is_select_all() {
        return Ok((0..table.columns().len()).collect());
    }

    select
        .columns
        .iter()
        .filter(|c| c.as_str() != PRIMARY_KEY_COLUMN)
        .map(|c| table.require_column(c))
        .collect()
}

/// Existing primary keys matching an optional WHERE tree, ascending
fn matching_keys(table: &Table, condition: Option<&sql::Condition>) -> Result<Vec<i64>> {
    let Some(condition) = condition else {
        return Ok(table.rows().keys());
    };

    let mut keys: Vec<i64> = evaluate(table, condition)?
        .into_iter()
        .filter(|&key| table.contains(key))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    Ok(keys)
}

fn plan_update(table: &Table, update: &Update) -> Result<UpdatePlan> {
    let mut plan = UpdatePlan {
        assignments: Vec::with_capacity(update.assignments.len()),
        new_key: None,
    };

    for assignment in &update.assignments {
        if assignment.column == PRIMARY_KEY_COLUMN {
            plan.new_key = Some(primary_key(&assignment.value)?);
        } else {
            let column = table.require_column(&assignment.column)?;
            plan.assignments.push((column, assignment.value.clone()));
        }
    }

    Ok(plan)
}
