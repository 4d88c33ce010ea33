//! Scanner over the raw filter text. Tracks a byte position, skips
//! whitespace and comments between tokens, and reads the token shapes that
//! do not depend on a column's kind (identifiers, quoted strings, digits).

use crate::error::{FilterError, FilterResult};

pub fn is_ident_start(c: char) -> bool { c.is_ascii_alphabetic() || c == '_' }
pub fn is_ident_part(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' }

#[derive(Debug, Clone)]
pub struct Scan<'a> {
    pub src: &'a str,
    pub pos: usize,
}

impl<'a> Scan<'a> {
    pub fn new(src: &'a str) -> Self { Scan { src, pos: 0 } }

    pub fn at_end(&self) -> bool { self.pos >= self.src.len() }

    pub fn peek(&self) -> Option<char> { self.src[self.pos..].chars().next() }

    pub fn advance(&mut self, ch: char) { self.pos += ch.len_utf8(); }

    /// Syntax error anchored at the current position.
    pub fn syntax_here<S: Into<String>>(&self, msg: S) -> FilterError {
        FilterError::syntax(self.src, self.pos, msg)
    }

    /// Skip whitespace and comments. Comments are `--` to end of line and
    /// `/* ... */` blocks (nesting supported); they separate tokens exactly
    /// like whitespace does.
    pub fn skip_space(&mut self) -> FilterResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.advance(c),
                Some('-') if self.src[self.pos..].starts_with("--") => {
                    match self.src[self.pos..].find('\n') {
                        Some(i) => self.pos += i + 1,
                        None => self.pos = self.src.len(),
                    }
                }
                Some('/') if self.src[self.pos..].starts_with("/*") => {
                    let open = self.pos;
                    self.pos += 2;
                    let mut depth = 1usize;
                    while depth > 0 {
                        if self.src[self.pos..].starts_with("/*") {
                            depth += 1;
                            self.pos += 2;
                        } else if self.src[self.pos..].starts_with("*/") {
                            depth -= 1;
                            self.pos += 2;
                        } else {
                            match self.peek() {
                                Some(c) => self.advance(c),
                                None => {
                                    return Err(FilterError::unterminated_comment(
                                        self.src, open, "block comment not terminated"));
                                }
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Consume a single expected character; false if not present.
    pub fn eat_char(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => { self.advance(c); true }
            _ => false,
        }
    }

    /// Consume a case-insensitive keyword with a word boundary after it.
    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        let rest = &self.src[self.pos..];
        if rest.len() < kw.len()
            || !rest.is_char_boundary(kw.len())
            || !rest[..kw.len()].eq_ignore_ascii_case(kw)
        {
            return false;
        }
        if rest[kw.len()..].chars().next().map(is_ident_part).unwrap_or(false) {
            return false;
        }
        self.pos += kw.len();
        true
    }

    /// Read an identifier `[A-Za-z_][A-Za-z0-9_]*`, returning (text, offset).
    pub fn scan_ident(&mut self) -> Option<(&'a str, usize)> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_ident_start(c) => self.advance(c),
            _ => return None,
        }
        while let Some(c) = self.peek() {
            if is_ident_part(c) { self.advance(c) } else { break }
        }
        Some((&self.src[start..self.pos], start))
    }

    /// Read a run of decimal digits, returning (text, offset).
    pub fn scan_digits(&mut self) -> Option<(&'a str, usize)> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() { self.advance(c) } else { break }
        }
        if self.pos == start { None } else { Some((&self.src[start..self.pos], start)) }
    }

    /// Read a quoted string literal (single or double quotes, no escape
    /// sequences). Returns None when the next character is not a quote.
    /// The literal must close before a line terminator or end of input.
    pub fn scan_string(&mut self) -> FilterResult<Option<String>> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Ok(None),
        };
        let open = self.pos;
        self.advance(quote);
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance(c);
                    return Ok(Some(value));
                }
                Some('\n') | Some('\r') | None => {
                    return Err(FilterError::unterminated_string(
                        self.src, open, "string literal not terminated"));
                }
                Some(c) => {
                    value.push(c);
                    self.advance(c);
                }
            }
        }
    }
}
