//! B+Tree Module
//!
//! Ordered in-memory index with one-or-many values per key. Used as the
//! primary row store (one row per key) and for every secondary index (many
//! primary keys per column value).
//!
//! ## Responsibilities
//! - Sorted inserts with leaf and internal node splits
//! - Deletes with borrow / merge / root collapse
//! - Inclusive range scans over the leaf chain
//! - Batched lookups for sorted key sets
//!
//! ## Layout
//! ```text
//!                 ┌──────────────┐
//!                 │ Internal [30]│            nodes: Vec<Node>
//!                 └──┬────────┬──┘            children / next are NodeIds
//!                    │        │
//!        ┌───────────▼─┐    ┌─▼───────────┐
//!        │ Leaf 10 20  │───►│ Leaf 30 40  │───► None
//!        │ [v] [v, v]  │    │ [v]  [v]    │
//!        └─────────────┘    └─────────────┘
//! ```
//!
//! Separator `s` at slot `i` sends keys `< s` to child `i` and keys `>= s`
//! to child `i + 1`.

mod delete;
mod key;
mod node;
mod search;
mod tree;


pub use key::{KeyDistance, REDESCEND_RATIO};
pub use node::NodeId;
pub use tree::BPlusTree;
