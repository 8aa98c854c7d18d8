use crate::span::Span;
use thiserror::Error;

/// Result type alias for CDF parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error kinds for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The buffer ended mid-tag or inside an unclosed region.
    UnexpectedEndOfInput,
    /// An expected literal (`[[`, `]]`, `/`) was missing.
    MalformedTag,
    /// An attribute name was not followed by `=`.
    MissingEquals,
    /// An attribute value contained a forbidden character.
    InvalidAttributeValue,
    /// A block position held a tag name outside the block table.
    UnknownBlockTag,
    /// A prose position held a tag name outside the inline table.
    UnknownInlineTag,
    /// A tag lacked an attribute its kind requires.
    MissingRequiredAttribute,
    /// `align` was not one of `none`, `left`, `right`, `center`.
    InvalidAlignment,
    /// Heading class `c` was not `1`..`5`.
    InvalidHeadingClass,
    /// A `size` tag did not carry exactly one unit attribute.
    InvalidSizeAttribute,
    /// A `color` tag had no `fg`/`bg`, extra keys, or a bad color literal.
    InvalidColorAttribute,
    /// A numeric attribute value did not parse as a finite number.
    InvalidNumericLiteral,
    /// Two unit attributes were given for the same image axis.
    ConflictingSizeAttributes,
    /// A table held something other than rows of cells.
    InvalidTableStructure,
    /// A collapse was not exactly `summary`, `content`, close.
    InvalidCollapseStructure,
    /// A closing tag appeared where nothing was open.
    MismatchedClosingTag,
    /// The document did not start with a `cdf` tag.
    MissingDocumentTag,
    /// Non-whitespace input followed the document's closing tag.
    TrailingContent,
    /// Tags were nested deeper than the configured limit.
    NestingTooDeep,
    /// The input was too long for 32-bit byte offsets.
    InputTooLarge,
}

impl ParseErrorKind {
    /// Stable identifier for the kind, used in CLI/JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            Self::MalformedTag => "MalformedTag",
            Self::MissingEquals => "MissingEquals",
            Self::InvalidAttributeValue => "InvalidAttributeValue",
            Self::UnknownBlockTag => "UnknownBlockTag",
            Self::UnknownInlineTag => "UnknownInlineTag",
            Self::MissingRequiredAttribute => "MissingRequiredAttribute",
            Self::InvalidAlignment => "InvalidAlignment",
            Self::InvalidHeadingClass => "InvalidHeadingClass",
            Self::InvalidSizeAttribute => "InvalidSizeAttribute",
            Self::InvalidColorAttribute => "InvalidColorAttribute",
            Self::InvalidNumericLiteral => "InvalidNumericLiteral",
            Self::ConflictingSizeAttributes => "ConflictingSizeAttributes",
            Self::InvalidTableStructure => "InvalidTableStructure",
            Self::InvalidCollapseStructure => "InvalidCollapseStructure",
            Self::MismatchedClosingTag => "MismatchedClosingTag",
            Self::MissingDocumentTag => "MissingDocumentTag",
            Self::TrailingContent => "TrailingContent",
            Self::NestingTooDeep => "NestingTooDeep",
            Self::InputTooLarge => "InputTooLarge",
        }
    }
}

/// A parse error with its kind and source location.
///
/// Parsing is fail-fast: the first error aborts the whole parse and no
/// partial document is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at bytes {}..{}", span.start, span.end)]
pub struct ParseError {
    /// Error categorization
    pub kind: ParseErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source location where the error occurred
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Create an error for unexpected end of input.
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEndOfInput,
            "unexpected end of input",
            Span::at(offset),
        )
    }

    /// Create an error for a missing literal token.
    pub fn malformed_tag(expected: &str, offset: usize) -> Self {
        Self::new(
            ParseErrorKind::MalformedTag,
            format!("expected '{}'", expected),
            Span::at(offset),
        )
    }

    /// Create an error for a tag without a required attribute.
    pub fn missing_attribute(tag: &str, attribute: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::MissingRequiredAttribute,
            format!("'{}' tag expects a '{}' attribute", tag, attribute),
            span,
        )
    }

    /// Create an error for a numeric attribute that failed to parse.
    pub fn invalid_number(attribute: &str, value: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::InvalidNumericLiteral,
            format!("'{}' is not a valid number for '{}'", value, attribute),
            span,
        )
    }

    /// Byte offset at which the error was detected.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.span.start
    }
}
