//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the [`ParsingError`] type and
//! the per-call [`ParseRun`] state the grammar productions operate on.
//!
//! # Parser Architecture
//!
//! - [`Parser`] owns the active [`Config`] and nothing else.
//! - Each call to [`Parser::parse`] builds a fresh [`ParseRun`] holding the
//!   input cursor and a shared borrow of the config. The run is dropped when
//!   the call returns, on success or error, so no cursor state can leak from
//!   one call into the next.
//! - `expressions` extends [`ParseRun`] with the grammar productions via a
//!   separate `impl` block.

use crate::config::{Config, ConfigError, PartialConfig};
use crate::parser::ast::Node;
use crate::parser::lexer::Cursor;
use thiserror::Error;
use tracing::{debug, trace};

/// Deepest nesting of sub-expressions a single parse accepts.
///
/// Groups, brackets, argument lists, ternary branches and unary operators
/// each add one level.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A parse failure at a char offset of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Index {index} of {input:?}: {message}")]
pub struct ParsingError {
    pub message: String,
    /// The complete input of the failed call.
    pub input: String,
    /// Char offset where the error was detected.
    pub index: usize,
}

/// Configurable expression parser.
///
/// `Parser` is cheap to keep around: it only holds its [`Config`]. Parsing
/// takes `&self`, so one parser can serve any number of sequential calls.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with a complete configuration.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration a fresh parser starts with.
    pub fn default_config() -> Config {
        Config::default()
    }

    /// Returns an independent copy of the active configuration.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Merges `partial` into the active configuration and returns the result.
    ///
    /// Rejected updates leave the configuration unchanged.
    pub fn set_config(&mut self, partial: PartialConfig) -> Result<Config, ConfigError> {
        self.config.merge(partial)?;
        debug!(
            max_unary_len = self.config.operators.unary.max_len(),
            max_binary_len = self.config.operators.binary.max_len(),
            "parser configuration updated"
        );
        Ok(self.config.clone())
    }

    /// Parses `expr` into a single root node.
    pub fn parse(&self, expr: &str) -> Result<Node, ParsingError> {
        trace!(input = expr, "parsing expression");
        let result = ParseRun::new(&self.config, expr).gobble_compound();
        match &result {
            Ok(node) => trace!(root = node.type_name(), "parsed expression"),
            Err(err) => debug!(index = err.index, message = %err.message, "parse failed"),
        }
        result
    }
}

/// State of a single parse call.
pub(crate) struct ParseRun<'a> {
    pub(crate) config: &'a Config,
    pub(crate) cursor: Cursor,
    source: &'a str,
    depth: usize,
}

impl<'a> ParseRun<'a> {
    pub(crate) fn new(config: &'a Config, source: &'a str) -> Self {
        Self {
            config,
            cursor: Cursor::new(source),
            source,
            depth: 0,
        }
    }

    /// Enters one nesting level. Errors past [`MAX_NESTING_DEPTH`].
    pub(crate) fn descend(&mut self) -> Result<(), ParsingError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("Maximum nesting depth exceeded"));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Builds an error positioned at the cursor.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParsingError {
        ParsingError {
            message: message.into(),
            input: self.source.to_string(),
            index: self.cursor.position(),
        }
    }
}
