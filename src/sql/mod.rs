//! SQL Module
//!
//! Front end turning statement text into the `Statement` tree the engine
//! executes. The engine itself never sees text.
//!
//! ## Supported Statements
//! ```text
//! CREATE TABLE name (col, col, ...)
//! INSERT INTO name VALUES (id, v, ...)
//! SELECT * | col, ... FROM name [WHERE cond]
//! UPDATE name SET col = v [, col = v]* [WHERE cond]
//! DELETE FROM name [WHERE cond]
//!
//! cond := column op literal ((AND | OR) column op literal)*
//! op   := = | != | < | <= | > | >=
//! ```

mod parser;
mod statement;
mod tokenizer;

pub use parser::parse;
pub use statement::{
    Assignment, CompareOp, Condition, CreateTable, Delete, Insert, Operand, Select, Statement,
    Update,
};
pub use tokenizer::{tokenize, Token};
