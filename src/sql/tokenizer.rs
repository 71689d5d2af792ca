//! SQL tokenizer
//!
//! Splits statement text into keywords, identifiers, literals, operators and
//! punctuation.

use crate::error::{ArborError, Result};
use crate::value::Value;

/// Reserved words, matched case-insensitively
const KEYWORDS: &[&str] = &[
    "CREATE", "TABLE", "INSERT", "INTO", "VALUES", "SELECT", "FROM", "WHERE", "UPDATE", "SET",
    "DELETE", "AND", "OR",
];

/// Characters that make up comparison operators
const OPERATOR_CHARS: &[char] = &['=', '!', '<', '>'];

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Upper-cased reserved word
    Keyword(String),
    Identifier(String),
    Literal(Value),
    /// Raw operator text, validated by the parser
    Operator(String),
    Comma,
    LeftParen,
    RightParen,
    Star,
    Semicolon,
}

impl Token {
    pub fn is_keyword(&self, word: &str) -> bool {
        matches!(self, Token::Keyword(k) if k == word)
    }
}

/// Tokenize a statement
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        match c {
            ',' => tokens.push(Token::Comma),
            '(' => tokens.push(Token::LeftParen),
            ')' => tokens.push(Token::RightParen),
            '*' => tokens.push(Token::Star),
            ';' => tokens.push(Token::Semicolon),
            '\'' => {
                let (text, end) = read_string(&chars, pos)?;
                tokens.push(Token::Literal(Value::Text(text)));
                pos = end;
                continue;
            }
            c if OPERATOR_CHARS.contains(&c) => {
                let start = pos;
                while pos < chars.len() && OPERATOR_CHARS.contains(&chars[pos]) && pos - start < 2 {
                    pos += 1;
                }
                tokens.push(Token::Operator(chars[start..pos].iter().collect()));
                continue;
            }
            c if c.is_ascii_digit() || starts_negative_number(&chars, pos) => {
                let (value, end) = read_number(&chars, pos)?;
                tokens.push(Token::Literal(value));
                pos = end;
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                let upper = word.to_ascii_uppercase();

                if KEYWORDS.contains(&upper.as_str()) {
                    tokens.push(Token::Keyword(upper));
                } else {
                    tokens.push(Token::Identifier(word));
                }
                continue;
            }
            other => {
                return Err(ArborError::Parse(format!(
                    "Unexpected character '{}' at position {}",
                    other, pos
                )));
            }
        }

        pos += 1;
    }

    Ok(tokens)
}

fn starts_negative_number(chars: &[char], pos: usize) -> bool {
    chars[pos] == '-' && chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit())
}

/// Read a single-quoted string starting at `start`; `''` escapes a quote
fn read_string(chars: &[char], start: usize) -> Result<(String, usize)> {
    let mut text = String::new();
    let mut pos = start + 1;

    while pos < chars.len() {
        if chars[pos] == '\'' {
            if chars.get(pos + 1) == Some(&'\'') {
                text.push('\'');
                pos += 2;
                continue;
            }
            return Ok((text, pos + 1));
        }
        text.push(chars[pos]);
        pos += 1;
    }

    Err(ArborError::Parse(format!(
        "Unterminated string literal starting at position {}",
        start
    )))
}

/// Read an integer or float literal starting at `start`
fn read_number(chars: &[char], start: usize) -> Result<(Value, usize)> {
    let mut pos = start;
    if chars[pos] == '-' {
        pos += 1;
    }

    let mut is_float = false;
    while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
        if chars[pos] == '.' {
            if is_float {
                break;
            }
            is_float = true;
        }
        pos += 1;
    }

    let text: String = chars[start..pos].iter().collect();
    let value = if is_float {
        text.parse::<f64>().map(Value::Float).map_err(|e| {
            ArborError::Parse(format!("Invalid float literal {}: {}", text, e))
        })?
    } else {
        text.parse::<i64>().map(Value::Int).map_err(|e| {
            ArborError::Parse(format!("Invalid integer literal {}: {}", text, e))
        })?
    };

    Ok((value, pos))
}
