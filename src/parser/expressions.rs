//! Expression parsing implementation
//!
//! This module holds the grammar productions. Each one consumes characters
//! from the run's cursor and returns:
//! - `Ok(Some(node))` when it recognized its construct,
//! - `Ok(None)` when nothing at the cursor starts its construct (callers
//!   decide whether that is an error),
//! - `Err(_)` for a fatal error. Errors are never caught or downgraded.
//!
//! # Precedence
//!
//! Binary operators come from the configuration, so there is no fixed
//! function-per-level ladder. [`ParseRun::gobble_binary_expression`] instead
//! keeps an operand stack and an operator stack and reduces whenever the
//! incoming operator does not bind tighter than the one on top.
//!
//! All parsing methods are implemented as `pub(crate)` methods on [`ParseRun`].

use crate::parser::ast::Node;
use crate::parser::lexer::{is_decimal_digit, is_identifier_part, is_identifier_start};
use crate::parser::parse::{ParseRun, ParsingError};

type Production = Result<Option<Node>, ParsingError>;

impl ParseRun<'_> {
    /// Parse the whole input: expressions separated by `;`, `,` or nothing.
    pub(crate) fn gobble_compound(&mut self) -> Result<Node, ParsingError> {
        let mut nodes = Vec::new();

        while !self.cursor.is_at_end() {
            if matches!(self.cursor.peek(), Some(';') | Some(',')) {
                self.cursor.advance();
                continue;
            }

            match self.gobble_expression()? {
                Some(node) => {
                    if !nodes.is_empty() && !self.config.features.compound {
                        return Err(self.error("Unexpected compound expression"));
                    }
                    nodes.push(node);
                }
                None => {
                    if let Some(ch) = self.cursor.peek() {
                        return Err(self.error(format!("Unexpected `{ch}`")));
                    }
                }
            }
        }

        if nodes.len() == 1 {
            return Ok(nodes.remove(0));
        }
        if nodes.is_empty() && !self.config.features.compound {
            return Err(self.error("Expected expression"));
        }
        Ok(Node::Compound { body: nodes })
    }

    /// Parse expression, including `test ? consequent : alternate`
    pub(crate) fn gobble_expression(&mut self) -> Production {
        self.descend()?;
        let node = self.gobble_conditional()?;
        self.ascend();
        Ok(node)
    }

    fn gobble_conditional(&mut self) -> Production {
        let Some(test) = self.gobble_binary_expression()? else {
            return Ok(None);
        };
        if !self.config.features.conditional {
            return Ok(Some(test));
        }

        self.cursor.gobble_spaces();
        if !self.cursor.eat('?') {
            return Ok(Some(test));
        }

        let consequent = self.require_expression()?;

        self.cursor.gobble_spaces();
        if !self.cursor.eat(':') {
            return Err(self.error("Expected `:`"));
        }

        let alternate = self.require_expression()?;

        Ok(Some(Node::conditional(test, consequent, alternate)))
    }

    fn require_expression(&mut self) -> Result<Node, ParsingError> {
        match self.gobble_expression()? {
            Some(node) => Ok(node),
            None => Err(self.error("Expected expression")),
        }
    }

    /// Scan the longest configured binary operator at the cursor.
    fn gobble_binary_op(&mut self) -> Option<(String, u32)> {
        self.cursor.gobble_spaces();
        let config = self.config;
        let binary = &config.operators.binary;
        let op = self
            .cursor
            .gobble_operator(binary.max_len(), |candidate| binary.contains(candidate))?;
        let prec = binary.precedence(&op);
        Some((op, prec))
    }

    /// Parse a chain of tokens joined by binary operators.
    pub(crate) fn gobble_binary_expression(&mut self) -> Production {
        let Some(first) = self.gobble_token()? else {
            return Ok(None);
        };

        let mut operands = vec![first];
        let mut operators: Vec<(String, u32)> = Vec::new();

        while let Some((op, prec)) = self.gobble_binary_op() {
            // Reduce while the pending operator binds at least as tightly
            while operators.last().is_some_and(|&(_, top)| prec <= top) {
                reduce(&mut operands, &mut operators);
            }

            let Some(right) = self.gobble_token()? else {
                return Err(self.error(format!("Expected expression after `{op}`")));
            };
            operators.push((op, prec));
            operands.push(right);
        }

        // What is left has strictly increasing precedence, so fold from the right
        while !operators.is_empty() {
            reduce(&mut operands, &mut operators);
        }
        Ok(operands.pop())
    }

    /// Parse a single operand: literal, array, unary expression or variable
    pub(crate) fn gobble_token(&mut self) -> Production {
        self.cursor.gobble_spaces();
        let Some(ch) = self.cursor.peek() else {
            return Ok(None);
        };
        let literals = self.config.features.literals;

        if literals.numeric && (is_decimal_digit(ch) || ch == '.') {
            return self.gobble_numeric_literal().map(Some);
        }
        if literals.string && (ch == '\'' || ch == '"') {
            return self.gobble_string_literal().map(Some);
        }
        if literals.array && ch == '[' {
            return self.gobble_array().map(Some);
        }

        let config = self.config;
        let unary = &config.operators.unary;
        if let Some(op) = self
            .cursor
            .gobble_operator(unary.max_len(), |candidate| unary.contains(candidate))
        {
            self.descend()?;
            let Some(argument) = self.gobble_token()? else {
                return Err(self.error(format!("Expected expression after `{op}`")));
            };
            self.ascend();
            return Ok(Some(Node::unary(op, argument)));
        }

        if is_identifier_start(ch) || ch == '(' {
            return self.gobble_variable().map(Some);
        }

        Ok(None)
    }

    /// Consume a run of digits, honoring the configured separator between
    /// digits. Returns the digits with separators stripped.
    fn gobble_decimal(&mut self) -> String {
        let separator = self.config.features.literals.numeric_separator;
        let mut digits = String::new();

        while let Some(ch) = self.cursor.peek() {
            if is_decimal_digit(ch) {
                digits.push(ch);
                self.cursor.advance();
            } else if Some(ch) == separator
                && !digits.is_empty()
                && self.cursor.peek_ahead(1).is_some_and(is_decimal_digit)
            {
                self.cursor.advance();
            } else {
                break;
            }
        }

        digits
    }

    /// Parse numeric literal: `12`, `3.4`, `.5`, `1e-3`
    fn gobble_numeric_literal(&mut self) -> Result<Node, ParsingError> {
        let start = self.cursor.position();

        let integer = self.gobble_decimal();
        let mut fraction = String::new();
        if self.cursor.eat('.') {
            fraction = self.gobble_decimal();
            if integer.is_empty() && fraction.is_empty() {
                return Err(self.error("Unexpected period"));
            }
        }

        let mut exponent = String::new();
        if self.cursor.eat('e') || self.cursor.eat('E') {
            if self.cursor.eat('-') {
                exponent.push('-');
            } else {
                self.cursor.eat('+');
            }
            let digits = self.gobble_decimal();
            if digits.is_empty() {
                let partial = self.cursor.slice_from(start);
                return Err(self.error(format!("Expected exponent after `{partial}`")));
            }
            exponent.push_str(&digits);
        }

        let raw = self.cursor.slice_from(start);
        match self.cursor.peek() {
            Some(ch) if is_identifier_start(ch) => {
                return Err(self.error(format!(
                    "Variable names cannot start with a number `{raw}{ch}`"
                )));
            }
            Some('.') => return Err(self.error("Unexpected period")),
            _ => {}
        }

        let normalized = format!(
            "{}.{}e{}",
            if integer.is_empty() { "0" } else { &integer },
            if fraction.is_empty() { "0" } else { &fraction },
            if exponent.is_empty() { "0" } else { &exponent },
        );
        let value: f64 = normalized
            .parse()
            .map_err(|_| self.error(format!("Invalid number `{raw}`")))?;

        Ok(Node::number(value, raw))
    }

    /// Parse string literal in single or double quotes
    fn gobble_string_literal(&mut self) -> Result<Node, ParsingError> {
        let start = self.cursor.position();
        let quote = self.cursor.advance();
        let mut value = String::new();

        loop {
            let ch = match self.cursor.advance() {
                Some(ch) if Some(ch) == quote => break,
                Some('\\') => match self.cursor.advance() {
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('t') => '\t',
                    Some('b') => '\u{8}',
                    Some('f') => '\u{c}',
                    Some('v') => '\u{b}',
                    // Anything else, including `\\` and quotes, is copied as is
                    Some(other) => other,
                    None => return Err(self.unclosed_quote(&value)),
                },
                Some(ch) => ch,
                None => return Err(self.unclosed_quote(&value)),
            };
            value.push(ch);
        }

        Ok(Node::string(value, self.cursor.slice_from(start)))
    }

    fn unclosed_quote(&self, partial: &str) -> ParsingError {
        self.error(format!("Unclosed quote after `{partial}`"))
    }

    /// Consume an identifier spelling.
    fn gobble_identifier_name(&mut self) -> Result<String, ParsingError> {
        let start = self.cursor.position();
        match self.cursor.peek() {
            None => return Err(self.error("Expected literal")),
            Some(ch) if !is_identifier_start(ch) => {
                return Err(self.error(format!("Unexpected `{ch}`")));
            }
            Some(_) => {}
        }
        self.cursor.eat_while(is_identifier_part);
        Ok(self.cursor.slice_from(start))
    }

    /// Parse identifier, resolving configured literal names
    fn gobble_identifier(&mut self) -> Result<Node, ParsingError> {
        let name = self.gobble_identifier_name()?;

        if let Some(value) = self.config.literals.get(&name) {
            return Ok(Node::named_literal(value.clone(), name));
        }
        if !self.config.features.identifiers {
            return Err(self.error(format!("Unknown literal `{name}`")));
        }
        Ok(Node::identifier(name))
    }

    /// Parse identifier or group followed by `.x`, `[x]` and `(args)` suffixes
    fn gobble_variable(&mut self) -> Result<Node, ParsingError> {
        let mut node = if self.cursor.peek() == Some('(') {
            self.gobble_group()?
        } else {
            self.gobble_identifier()?
        };

        let features = self.config.features;
        loop {
            self.cursor.gobble_spaces();
            match self.cursor.peek() {
                Some('.') => {
                    if !features.members.r#static {
                        return Err(self.error("Unexpected static member access"));
                    }
                    self.cursor.advance();
                    self.cursor.gobble_spaces();
                    let property = self.gobble_identifier()?;
                    node = Node::member(node, property, false);
                }
                Some('[') => {
                    if !features.members.computed {
                        return Err(self.error("Unexpected computed member access"));
                    }
                    self.cursor.advance();
                    let property = self.require_expression()?;
                    self.cursor.gobble_spaces();
                    if !self.cursor.eat(']') {
                        return Err(self.error("Unclosed `[`"));
                    }
                    node = Node::member(node, property, true);
                }
                Some('(') => {
                    if !features.calls {
                        return Err(self.error("Unexpected function call"));
                    }
                    self.cursor.advance();
                    let arguments = self.gobble_arguments('(', ')')?;
                    node = Node::call(node, arguments);
                }
                _ => break,
            }
        }

        Ok(node)
    }

    /// Parse `( expression )`
    fn gobble_group(&mut self) -> Result<Node, ParsingError> {
        self.cursor.advance();
        let node = self.require_expression()?;

        self.cursor.gobble_spaces();
        if !self.cursor.eat(')') {
            return Err(self.error("Unclosed `(`"));
        }
        Ok(node)
    }

    /// Parse array literal `[a, b, c]`
    fn gobble_array(&mut self) -> Result<Node, ParsingError> {
        self.cursor.advance();
        let elements = self.gobble_arguments('[', ']')?;
        Ok(Node::array(elements))
    }

    /// Parse comma-separated expressions up to `terminator`. The opener has
    /// already been consumed.
    fn gobble_arguments(
        &mut self,
        opener: char,
        terminator: char,
    ) -> Result<Vec<Node>, ParsingError> {
        let mut args = Vec::new();
        let mut after_comma = false;

        loop {
            self.cursor.gobble_spaces();
            match self.cursor.peek() {
                None => return Err(self.error(format!("Unclosed `{opener}`"))),
                Some(ch) if ch == terminator => {
                    if after_comma {
                        return Err(self.error("Expected expression after `,`"));
                    }
                    self.cursor.advance();
                    return Ok(args);
                }
                Some(',') => {
                    if args.is_empty() || after_comma {
                        return Err(self.error("Unexpected `,`"));
                    }
                    self.cursor.advance();
                    after_comma = true;
                }
                Some(_) => {
                    if !args.is_empty() && !after_comma {
                        return Err(self.error("Expected `,`"));
                    }
                    match self.gobble_expression()? {
                        Some(Node::Compound { .. }) | None => {
                            return Err(self.error("Expected `,`"));
                        }
                        Some(node) => args.push(node),
                    }
                    after_comma = false;
                }
            }
        }
    }
}

/// Pop two operands and one operator and push their combination back.
fn reduce(operands: &mut Vec<Node>, operators: &mut Vec<(String, u32)>) {
    if let (Some((op, _)), Some(right), Some(left)) =
        (operators.pop(), operands.pop(), operands.pop())
    {
        operands.push(Node::binary(op, left, right));
    }
}
