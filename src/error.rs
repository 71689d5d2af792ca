//! Error types for ArborDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ArborError
pub type Result<T> = std::result::Result<T, ArborError>;

/// Unified error type for ArborDB operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArborError {
    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("Table {0} does not exist")]
    TableNotFound(String),

    #[error("Table {0} already exists")]
    TableExists(String),

    #[error("Column {column} does not exist in table {table}")]
    ColumnNotFound { table: String, column: String },

    #[error("Column {column} is declared more than once in table {table}")]
    DuplicateColumn { table: String, column: String },

    // -------------------------------------------------------------------------
    // Tree Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Key already exists: {0}")]
    DuplicateKey(String),

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported condition structure: {0}")]
    StructuralCondition(String),

    #[error("Unsupported operator: {0}")]
    InvalidOperator(String),

    #[error("Unsupported value type: {0}")]
    InvalidValueType(String),

    #[error("Column count does not match value count: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // SQL Front End Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
