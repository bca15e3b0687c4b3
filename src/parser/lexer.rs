//! Character-level scanning primitives
//!
//! The expression grammar is scanned directly from characters rather than
//! from a token stream: what counts as an operator depends on the active
//! configuration, so operators are matched against the configured tables at
//! the point the grammar asks for one.
//!
//! Offsets are char indices into the input, which is also what error
//! positions report.

/// Checks for an ASCII decimal digit.
pub fn is_decimal_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Checks if `ch` may start an identifier: `$`, `_`, ASCII letters, or any
/// non-ASCII character.
pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_ascii_alphabetic() || !ch.is_ascii()
}

/// Checks if `ch` may continue an identifier.
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_decimal_digit(ch)
}

/// Cursor over a single-line expression
pub struct Cursor {
    input: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Current char offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Peek at current character without consuming
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    pub fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    /// Consumes `expected` if it is the current character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Check if at end of input
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Skips spaces and tabs. Expressions are single-line, so nothing else
    /// counts as whitespace.
    pub fn gobble_spaces(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.position += 1;
        }
    }

    /// Consumes characters while `pred` holds.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.position += 1;
        }
        self.position - start
    }

    /// Source text between `start` and the cursor.
    pub fn slice_from(&self, start: usize) -> String {
        self.input[start.min(self.position)..self.position].iter().collect()
    }

    /// Longest-match operator scan.
    ///
    /// Takes up to `max_len` chars at the cursor and shrinks the candidate
    /// one char at a time until `is_operator` accepts it. On a match the
    /// cursor moves past it; otherwise the cursor is left where it was.
    pub fn gobble_operator(
        &mut self,
        max_len: usize,
        is_operator: impl Fn(&str) -> bool,
    ) -> Option<String> {
        let end = (self.position + max_len).min(self.input.len());
        let mut candidate: String = self.input[self.position..end].iter().collect();
        let mut len = end - self.position;

        while len > 0 {
            if is_operator(&candidate) {
                self.position += len;
                return Some(candidate);
            }
            candidate.pop();
            len -= 1;
        }

        None
    }
}
