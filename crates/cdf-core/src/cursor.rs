//! Parse state shared by every sub-parser.
//!
//! The cursor owns the input buffer, the current byte offset and the
//! nesting depth. Sub-parsers borrow it mutably, advance it past what they
//! consume and leave it at the failure point on error.
//!
//! # Performance
//!
//! - Zero-copy: slices borrow directly from input
//! - SIMD-accelerated delimiter scanning via `memchr` (see `find_either`)

use memchr::{memchr2, memchr3};

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::span::Span;

/// Cursor over a CDF input buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// The complete input text.
    input: &'a str,
    /// Input as bytes for efficient scanning.
    bytes: &'a [u8],
    /// Current byte offset.
    offset: usize,
    /// Number of currently open tags.
    depth: usize,
    /// Maximum nesting depth, if guarded.
    max_depth: Option<usize>,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of `input` with no nesting limit.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            depth: 0,
            max_depth: None,
        }
    }

    /// Limit how many tags may be open at once.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The complete input buffer.
    #[inline(always)]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Get the current byte offset.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current nesting depth.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Byte at the cursor, if any.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    /// Byte `n` positions past the cursor, if any.
    #[inline(always)]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.offset + n).copied()
    }

    /// Check whether the unconsumed input starts with `literal`.
    #[inline(always)]
    pub fn starts_with(&self, literal: &str) -> bool {
        self.bytes[self.offset.min(self.bytes.len())..].starts_with(literal.as_bytes())
    }

    /// Advance the cursor by `n` bytes.
    #[inline(always)]
    pub fn advance(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.bytes.len());
    }

    /// Consume `literal` or fail.
    ///
    /// Fails with `UnexpectedEndOfInput` when the buffer is too short to
    /// hold the literal, `MalformedTag` when different bytes are present.
    pub fn expect(&mut self, literal: &str) -> Result<()> {
        if self.offset + literal.len() > self.bytes.len() {
            if literal.as_bytes().starts_with(&self.bytes[self.offset..]) {
                return Err(ParseError::unexpected_eof(self.bytes.len()));
            }
            return Err(ParseError::malformed_tag(literal, self.offset));
        }
        if !self.starts_with(literal) {
            return Err(ParseError::malformed_tag(literal, self.offset));
        }
        self.offset += literal.len();
        Ok(())
    }

    /// Skip whitespace (space, tab, CR, LF) and return the count skipped.
    #[inline]
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.offset;
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.offset += 1;
        }
        self.offset - start
    }

    /// Skip whitespace, failing if the buffer runs out.
    #[inline]
    pub fn skip_whitespace_required(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.is_eof() {
            Err(ParseError::unexpected_eof(self.offset))
        } else {
            Ok(())
        }
    }

    /// Consume a maximal run of ASCII letters and `-`.
    pub fn take_name(&mut self) -> &'a str {
        let start = self.offset;
        while let Some(b) = self.peek() {
            if !(b.is_ascii_alphabetic() || b == b'-') {
                break;
            }
            self.offset += 1;
        }
        self.slice(start, self.offset)
    }

    /// Absolute position of the next `a` or `b` at or after the cursor.
    #[inline(always)]
    pub fn find_either(&self, from: usize, a: u8, b: u8) -> Option<usize> {
        memchr2(a, b, self.bytes.get(from..)?).map(|pos| from + pos)
    }

    /// Absolute position of the next `a`, `b` or `c` at or after `from`.
    #[inline(always)]
    pub fn find_any(&self, from: usize, a: u8, b: u8, c: u8) -> Option<usize> {
        memchr3(a, b, c, self.bytes.get(from..)?).map(|pos| from + pos)
    }

    /// Byte at an absolute position.
    #[inline(always)]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    /// Move the cursor to an absolute position.
    #[inline(always)]
    pub fn seek(&mut self, pos: usize) {
        self.offset = pos.min(self.bytes.len());
    }

    /// Get a slice of the input between two absolute positions.
    ///
    /// Callers only pass positions adjacent to ASCII delimiters, which are
    /// always UTF-8 character boundaries.
    #[inline(always)]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Get the remaining unconsumed input.
    #[inline(always)]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Enter one level of tag nesting.
    ///
    /// Fails with `NestingTooDeep` when the configured limit is exceeded.
    pub fn descend(&mut self, span: Span) -> Result<()> {
        self.depth += 1;
        match self.max_depth {
            Some(max) if self.depth > max => Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                format!("tags nested deeper than {} levels", max),
                span,
            )),
            _ => Ok(()),
        }
    }

    /// Leave one level of tag nesting.
    #[inline]
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
