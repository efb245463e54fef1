//! Character-level scanner over TSX/TS source
//!
//! Positions are char indices into the scanned buffer, not byte offsets;
//! every span in the crate uses the same convention.

use crate::error::{LintError, Result};

pub struct Scanner<'a> {
    input: &'a [char],
    file: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [char], file: &'a str) -> Self {
        Self {
            input,
            file,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Char immediately before the current position, if any.
    pub fn prev(&self) -> Option<char> {
        if self.position == 0 {
            None
        } else {
            self.input.get(self.position - 1).copied()
        }
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    pub fn eat_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Reads an identifier starting at the current position. Dots are
    /// included so namespaced JSX tags (`Foo.Bar`) read as one name.
    pub fn read_identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    /// Reads an attribute name: identifier chars plus `-` and `:` for
    /// `data-*`/`aria-*` and namespaced attributes.
    pub fn read_attribute_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '-' || c == ':' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    /// Consumes a string body after the opening quote has been consumed.
    pub fn skip_string(&mut self, quote: char) -> Result<()> {
        let start_line = self.line;
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                c if c == quote => return Ok(()),
                _ => {}
            }
        }
        Err(self.err_at(start_line, "unterminated string literal"))
    }

    /// Consumes a template literal body after the opening backtick.
    pub fn skip_template(&mut self) -> Result<()> {
        let start_line = self.line;
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '`' => return Ok(()),
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    self.skip_interpolation()?;
                }
                _ => {}
            }
        }
        Err(self.err_at(start_line, "unterminated template literal"))
    }

    /// Consumes a `${ ... }` interpolation body after the opening brace.
    fn skip_interpolation(&mut self) -> Result<()> {
        let start_line = self.line;
        let mut depth = 1usize;
        while let Some(c) = self.advance() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' => self.skip_string(c)?,
                '`' => self.skip_template()?,
                '/' if self.peek() == Some('/') => self.skip_line_comment(),
                '/' if self.peek() == Some('*') => self.skip_block_comment()?,
                _ => {}
            }
        }
        Err(self.err_at(start_line, "unterminated template interpolation"))
    }

    /// Consumes the rest of a `//` comment, leaving the newline unconsumed.
    pub fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Consumes a `/* ... */` comment; the leading `/` has been consumed
    /// and `*` is current.
    pub fn skip_block_comment(&mut self) -> Result<()> {
        let start_line = self.line;
        self.advance(); // '*'
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                return Ok(());
            }
        }
        Err(self.err_at(start_line, "unterminated block comment"))
    }

    pub fn error(&self, message: impl Into<String>) -> LintError {
        LintError::scan(self.file, self.line, message)
    }

    fn err_at(&self, line: usize, message: impl Into<String>) -> LintError {
        LintError::scan(self.file, line, message)
    }
}
