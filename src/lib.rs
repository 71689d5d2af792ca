//! # ArborDB
//!
//! An in-memory relational table engine built on B+Trees:
//! - One B+Tree per table mapping primary key to row
//! - One multi-valued B+Tree index per column
//! - WHERE evaluation through index searches and range scans
//! - Batched row materialization over the leaf chain
//! - LRU memo of full-table reads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SQL Front End                           │
//! │              (tokenizer → parser → Statement)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! │     (validate → evaluate → materialize / mutate)            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │      Table      │                │   Query Cache   │
//!   │ rows + indexes  │                │      (LRU)      │
//!   └────────┬────────┘                └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │   BPlusTree     │
//!   │ (arena + chain) │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod btree;
pub mod value;
pub mod table;
pub mod sql;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ArborError, Result};
pub use config::Config;
pub use engine::{Engine, Outcome, ResultSet, SharedEngine};
pub use value::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ArborDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
