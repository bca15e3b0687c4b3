//! # Introduction
//!
//! `exprparse` turns a single-line expression written in a JavaScript-like
//! syntax into an abstract syntax tree. It does not evaluate anything.
//!
//! ```
//! use exprparse::Parser;
//!
//! let parser = Parser::new();
//! let tree = parser.parse("a.b(1) + 2 * c").unwrap();
//! assert_eq!(tree.type_name(), "BinaryExpression");
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Source → Cursor → Productions → AST
//!            ↑
//!          Config (literals, operators, features)
//! ```
//!
//! 1. [`config`]: the literal table, operator tables and feature switches.
//!    Updates are merged from a [`PartialConfig`] and validated.
//! 2. [`parser`]: the character cursor, the grammar productions and the
//!    [`Node`] tree they build.
//!
//! Trees and configurations serialize with serde; nodes use ESTree-style
//! JSON (`{"type": "Literal", "value": 1, "raw": "1", "kind": "number"}`).

pub mod config;
pub mod parser;

pub use config::{Config, ConfigError, PartialConfig};
pub use parser::ast::{LiteralKind, LiteralValue, Node};
pub use parser::{Parser, ParsingError, MAX_NESTING_DEPTH};

/// Parses `expr` with the default configuration.
pub fn parse(expr: &str) -> Result<Node, ParsingError> {
    Parser::new().parse(expr)
}
