//! Expression parser
//!
//! This module transforms a single-line expression into an AST:
//! - [`lexer`]: Character classification and the input cursor
//! - [`parse`]: The [`Parser`] entry point, run state and errors
//! - [`ast`]: AST node definitions
//!
//! # Supported Grammar
//!
//! - Literals: numbers (`1`, `.5`, `1e3`), strings, arrays, configured names
//! - Identifiers, member access (`a.b`, `a[b]`) and calls (`f(x)`)
//! - Configurable unary and binary operators
//! - Ternary: `? :`
//! - Several expressions separated by `;` or `,`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over characters, with an operand/operator
//! stack for binary precedence. No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;

pub use parse::{Parser, ParsingError, MAX_NESTING_DEPTH};
