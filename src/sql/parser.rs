//! Recursive-descent parser
//!
//! ## Grammar
//! ```text
//! statement  := create | insert | select | update | delete [";"]
//! create     := CREATE TABLE name "(" ident ("," ident)* ")"
//! insert     := INSERT INTO name VALUES "(" literal ("," literal)* ")"
//! select     := SELECT ("*" | ident ("," ident)*) FROM name [WHERE cond]
//! update     := UPDATE name SET ident "=" literal ("," ident "=" literal)* [WHERE cond]
//! delete     := DELETE FROM name [WHERE cond]
//! cond       := simple ((AND | OR) simple)*        -- left-associative
//! simple     := operand op operand
//! operand    := ident | literal
//! ```
//!
//! Comparison shapes are not checked here; `30 < age` parses and is
//! rejected by the condition evaluator.

use crate::error::{ArborError, Result};
use crate::table::PRIMARY_KEY_COLUMN;
use crate::value::Value;

use super::statement::{
    Assignment, CompareOp, Condition, CreateTable, Delete, Insert, Operand, Select, Statement,
    Update,
};
use super::tokenizer::{tokenize, Token};

/// Parse one statement
pub fn parse(sql: &str) -> Result<Statement> {
    let tokens = tokenize(sql)?;
    Parser::new(tokens).parse_statement()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let statement = match self.peek().cloned() {
            Some(token) if token.is_keyword("CREATE") => {
                Statement::CreateTable(self.parse_create()?)
            }
            Some(token) if token.is_keyword("INSERT") => Statement::Insert(self.parse_insert()?),
            Some(token) if token.is_keyword("SELECT") => Statement::Select(self.parse_select()?),
            Some(token) if token.is_keyword("UPDATE") => Statement::Update(self.parse_update()?),
            Some(token) if token.is_keyword("DELETE") => Statement::Delete(self.parse_delete()?),
            Some(token) => {
                return Err(ArborError::Parse(format!(
                    "Unsupported SQL statement starting with {:?}",
                    token
                )))
            }
            None => return Err(ArborError::Parse("Empty statement".to_string())),
        };

        self.eat(&Token::Semicolon);
        if let Some(token) = self.peek() {
            return Err(ArborError::Parse(format!(
                "Unexpected trailing token {:?}",
                token
            )));
        }

        Ok(statement)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_create(&mut self) -> Result<CreateTable> {
        self.expect_keyword("CREATE")?;
        self.expect_keyword("TABLE")?;
        let table = self.expect_identifier()?;

        self.expect(&Token::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            if column != PRIMARY_KEY_COLUMN {
                columns.push(column);
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;

        Ok(CreateTable { table, columns })
    }

    fn parse_insert(&mut self) -> Result<Insert> {
        self.expect_keyword("INSERT")?;
        self.expect_keyword("INTO")?;
        let table = self.expect_identifier()?;
        self.expect_keyword("VALUES")?;

        self.expect(&Token::LeftParen)?;
        let primary_key = self.expect_literal()?;
        let mut values = Vec::new();
        while self.eat(&Token::Comma) {
            values.push(self.expect_literal()?);
        }
        self.expect(&Token::RightParen)?;

        Ok(Insert {
            table,
            primary_key,
            values,
        })
    }

    fn parse_select(&mut self) -> Result<Select> {
        self.expect_keyword("SELECT")?;

        let columns = if self.eat(&Token::Star) {
            vec!["*".to_string()]
        } else {
            let mut columns = vec![self.expect_identifier()?];
            while self.eat(&Token::Comma) {
                columns.push(self.expect_identifier()?);
            }
            columns
        };

        self.expect_keyword("FROM")?;
        let table = self.expect_identifier()?;
        let condition = self.parse_where()?;

        Ok(Select {
            table,
            columns,
            condition,
        })
    }

    fn parse_update(&mut self) -> Result<Update> {
        self.expect_keyword("UPDATE")?;
        let table = self.expect_identifier()?;
        self.expect_keyword("SET")?;

        let mut assignments = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            match self.next() {
                Some(Token::Operator(op)) if op == "=" => {}
                other => {
                    return Err(ArborError::Parse(format!(
                        "Expected = in assignment, got {:?}",
                        other
                    )))
                }
            }
            let value = self.expect_literal()?;
            assignments.push(Assignment { column, value });

            if !self.eat(&Token::Comma) {
                break;
            }
        }

        let condition = self.parse_where()?;

        Ok(Update {
            table,
            assignments,
            condition,
        })
    }

    fn parse_delete(&mut self) -> Result<Delete> {
        self.expect_keyword("DELETE")?;
        self.expect_keyword("FROM")?;
        let table = self.expect_identifier()?;
        let condition = self.parse_where()?;

        Ok(Delete { table, condition })
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    fn parse_where(&mut self) -> Result<Option<Condition>> {
        if !self.eat_keyword("WHERE") {
            return Ok(None);
        }
        self.parse_condition().map(Some)
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let mut condition = self.parse_simple_condition()?;

        loop {
            if self.eat_keyword("AND") {
                condition = condition.and(self.parse_simple_condition()?);
            } else if self.eat_keyword("OR") {
                condition = condition.or(self.parse_simple_condition()?);
            } else {
                return Ok(condition);
            }
        }
    }

    fn parse_simple_condition(&mut self) -> Result<Condition> {
        let left = self.parse_operand()?;
        let op = match self.next() {
            Some(Token::Operator(op)) => op.parse::<CompareOp>()?,
            other => {
                return Err(ArborError::Parse(format!(
                    "Expected comparison operator, got {:?}",
                    other
                )))
            }
        };
        let right = self.parse_operand()?;

        Ok(Condition::Compare { left, op, right })
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match self.next() {
            Some(Token::Identifier(name)) => Ok(Operand::Column(name)),
            Some(Token::Literal(value)) => Ok(Operand::Literal(value)),
            other => Err(ArborError::Parse(format!(
                "Unexpected token in expression: {:?}",
                other
            ))),
        }
    }

    // =========================================================================
    // Token Helpers
    // =========================================================================

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume `expected` if it is the next token
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(word)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ArborError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.peek()
            )))
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<()> {
        if self.eat_keyword(word) {
            Ok(())
        } else {
            Err(ArborError::Parse(format!(
                "Expected {}, got {:?}",
                word,
                self.peek()
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Identifier(name)) => Ok(name),
            other => Err(ArborError::Parse(format!(
                "Expected identifier, got {:?}",
                other
            ))),
        }
    }

    fn expect_literal(&mut self) -> Result<Value> {
        match self.next() {
            Some(Token::Literal(value)) => Ok(value),
            other => Err(ArborError::Parse(format!(
                "Expected literal, got {:?}",
                other
            ))),
        }
    }
}
