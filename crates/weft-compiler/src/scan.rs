//! Low-level scanning helpers for rule sources.
//!
//! `Cursor` is a byte-offset view into one source fragment. All scanners are
//! restartable: on failure the cursor is left at the offending token so the
//! caller can report an accurate position.
//!
//! `#` introduces a comment running to end of line wherever whitespace is
//! permitted.

use thiserror::Error;

/// Errors raised by the scanning helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("string not terminated before end of line or end of input")]
    UnterminatedString,

    #[error("number out of range")]
    NumberOutOfRange,

    #[error("malformed number")]
    MalformedNumber,

    #[error("unknown keyword, expected one of: {expected}")]
    UnknownKeyword { expected: String },

    #[error("duplicate definition of '{0}'")]
    DuplicateKeyword(String),

    /// A keyword list exceeded the tracking mask capacity.
    #[error("keyword list exceeds the tracking capacity of {0} entries")]
    KeywordCapacity(usize),
}

/// Bitmask tracking which keyword indices were already consumed in the
/// current context. Capacity is a hard limit, enforced loudly.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMask(u32);

impl KeywordMask {
    pub const CAPACITY: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    /// Flag index `idx`. Returns false if it was already flagged.
    pub fn set(&mut self, idx: usize) -> bool {
        let bit = 1u32 << idx;
        if self.0 & bit != 0 {
            return false;
        }
        self.0 |= bit;
        true
    }

    pub fn is_set(&self, idx: usize) -> bool {
        self.0 & (1u32 << idx) != 0
    }
}

/// Cursor into one UTF-8 source fragment.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `c` if it is next. Returns whether it was consumed.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and `#` end-of-line comments. Comments may follow
    /// each other separated only by whitespace.
    pub fn skip_spaces(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if self.peek() != Some('#') {
                return;
            }
            while let Some(c) = self.bump() {
                if c == '\n' {
                    break;
                }
            }
        }
    }

    /// Consume an identifier: alphabetic or `_` start, then a run of
    /// alphanumerics and `_`. Returns None without consuming if the next
    /// character cannot start one.
    pub fn parse_identifier(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return None,
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        Some(&self.src[start..self.pos])
    }

    /// Consume a quoted string (single or double quote), interpreting
    /// backslash escapes by dropping the backslash. A literal newline or end
    /// of input before the closing quote is an error.
    pub fn parse_string(&mut self) -> Result<String, ScanError> {
        self.parse_quoted(false)
    }

    /// Like `parse_string`, but escape sequences are preserved verbatim.
    /// The payload is handed unmodified to the scanner backend, which has
    /// its own escape rules.
    pub fn parse_regex(&mut self) -> Result<String, ScanError> {
        self.parse_quoted(true)
    }

    fn parse_quoted(&mut self, verbatim: bool) -> Result<String, ScanError> {
        let start = self.pos;
        let quote = self.bump().ok_or(ScanError::UnterminatedString)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    self.pos = start;
                    return Err(ScanError::UnterminatedString);
                }
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let Some(next) = self.bump() else {
                        self.pos = start;
                        return Err(ScanError::UnterminatedString);
                    };
                    if next == '\n' {
                        self.pos = start;
                        return Err(ScanError::UnterminatedString);
                    }
                    if verbatim {
                        out.push('\\');
                    }
                    out.push(next);
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Decimal unsigned integer. Overflow is an error, not a wrap; a
    /// trailing alphabetic character is rejected so the start of an
    /// identifier is never swallowed into a number.
    pub fn parse_unsigned(&mut self) -> Result<u32, ScanError> {
        let start = self.pos;
        let mut value: u32 = 0;
        let mut any = false;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            match value.checked_mul(10).and_then(|v| v.checked_add(d)) {
                Some(v) => value = v,
                None => {
                    self.pos = start;
                    return Err(ScanError::NumberOutOfRange);
                }
            }
            self.bump();
            any = true;
        }
        if !any {
            return Err(ScanError::MalformedNumber);
        }
        self.reject_trailing_alpha(start)?;
        Ok(value)
    }

    /// Decimal signed integer with the same overflow and trailing rules as
    /// `parse_unsigned`.
    pub fn parse_integer(&mut self) -> Result<i64, ScanError> {
        let start = self.pos;
        let negative = self.eat('-');
        let mut value: i64 = 0;
        let mut any = false;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            match value.checked_mul(10).and_then(|v| v.checked_add(d as i64)) {
                Some(v) => value = v,
                None => {
                    self.pos = start;
                    return Err(ScanError::NumberOutOfRange);
                }
            }
            self.bump();
            any = true;
        }
        if !any {
            self.pos = start;
            return Err(ScanError::MalformedNumber);
        }
        self.reject_trailing_alpha(start)?;
        Ok(if negative { -value } else { value })
    }

    /// Decimal floating point number: optional sign, digits, optional
    /// fraction. No exponent form.
    pub fn parse_float(&mut self) -> Result<f64, ScanError> {
        let start = self.pos;
        self.eat('-');
        let mut digits = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            digits = true;
        }
        if !digits {
            self.pos = start;
            return Err(ScanError::MalformedNumber);
        }
        if self.eat('.') {
            let mut fraction = false;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                fraction = true;
            }
            if !fraction {
                self.pos = start;
                return Err(ScanError::MalformedNumber);
            }
        }
        self.reject_trailing_alpha(start)?;
        let Ok(value) = self.src[start..self.pos].parse::<f64>() else {
            self.pos = start;
            return Err(ScanError::MalformedNumber);
        };
        if !value.is_finite() {
            self.pos = start;
            return Err(ScanError::NumberOutOfRange);
        }
        Ok(value)
    }

    fn reject_trailing_alpha(&mut self, start: usize) -> Result<(), ScanError> {
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.pos = start;
                Err(ScanError::MalformedNumber)
            }
            _ => Ok(()),
        }
    }

    /// Match the next identifier against an ordered keyword list
    /// (case-insensitive). On failure the cursor stays at the identifier and
    /// the error lists every accepted keyword.
    pub fn parse_keyword(&mut self, keywords: &[&str]) -> Result<usize, ScanError> {
        let start = self.pos;
        let unknown = || ScanError::UnknownKeyword {
            expected: keywords.join(", "),
        };
        let Some(ident) = self.parse_identifier() else {
            return Err(unknown());
        };
        match keywords
            .iter()
            .position(|kw| kw.eq_ignore_ascii_case(ident))
        {
            Some(idx) => Ok(idx),
            None => {
                self.pos = start;
                Err(unknown())
            }
        }
    }

    /// `parse_keyword`, additionally flagging the matched index in `mask`.
    /// A repeated keyword in the same context is a duplicate-definition
    /// error.
    pub fn parse_keyword_tracked(
        &mut self,
        mask: &mut KeywordMask,
        keywords: &[&str],
    ) -> Result<usize, ScanError> {
        if keywords.len() > KeywordMask::CAPACITY {
            return Err(ScanError::KeywordCapacity(KeywordMask::CAPACITY));
        }
        let start = self.pos;
        let idx = self.parse_keyword(keywords)?;
        if !mask.set(idx) {
            self.pos = start;
            return Err(ScanError::DuplicateKeyword(keywords[idx].to_string()));
        }
        Ok(idx)
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.src.len());
        let before = &self.src[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        (line, column)
    }

    /// Short sanitized view of the unparsed remainder, for error messages.
    /// At most 20 bytes, cut on a character boundary, control characters
    /// replaced by spaces.
    pub fn snippet(&self) -> String {
        const MAX_BYTES: usize = 20;
        let mut out = String::new();
        for c in self.rest().chars() {
            if out.len() + c.len_utf8() > MAX_BYTES {
                break;
            }
            out.push(if c.is_control() { ' ' } else { c });
        }
        out
    }
}
