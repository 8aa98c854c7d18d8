//! Source location tracking for AST nodes and errors.
//!
//! Every AST node and every `ParseError` carries a `Span` pointing back into
//! the input buffer.

/// Longest input whose byte offsets fit in a [`Span`].
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// A byte range in the source text.
///
/// Spans use byte offsets (not character offsets).
/// Both `start` and `end` are inclusive-exclusive: `[start, end)`.
///
/// # Example
///
/// ```rust
/// use cdf_core::span::Span;
///
/// let span = Span::new(0, 10);
/// assert_eq!(span.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: u32,
    /// Ending byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from `usize` cursor positions.
    ///
    /// Offsets must not exceed [`MAX_INPUT_LEN`]; [`crate::Parser::parse`]
    /// rejects longer input before any span is built.
    #[inline]
    pub const fn from_range(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// An empty span marking a single position.
    #[inline]
    pub const fn at(offset: usize) -> Self {
        Self::from_range(offset, offset)
    }

    /// Get the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
