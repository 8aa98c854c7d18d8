//! Tag tokenizer.
//!
//! Tags are tokenized lazily, at the exact cursor position a parser needs;
//! there is no separate token stream.
//!
//! ```text
//! [[ name key=value | key=value ]]    opening tag
//! [[ / ]]                             closing tag
//! ```

use crate::attribute::{parse_attribute, Attributes};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::span::Span;

/// One tokenized tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag<'a> {
    /// An opening tag with its name and attributes.
    Open(OpenTag<'a>),
    /// A closing `[[/]]` marker.
    Close(Span),
}

impl<'a> Tag<'a> {
    /// Source span of the tag itself.
    pub fn span(&self) -> Span {
        match self {
            Tag::Open(tag) => tag.span,
            Tag::Close(span) => *span,
        }
    }
}

/// An opening tag.
///
/// The attribute set lives only as long as the constructor for the tag's
/// node needs it; typed accessors are in [`crate::attribute`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTag<'a> {
    /// Tag name (ASCII letters and `-`), may be empty.
    pub name: &'a str,
    /// Decoded attributes.
    pub attributes: Attributes<'a>,
    /// Span from `[[` through `]]`.
    pub span: Span,
}

/// Tokenize the tag at the cursor.
///
/// The cursor must sit exactly on `[[`; callers skip leading whitespace
/// themselves. On success the cursor is left just past the closing `]]`.
///
/// # Errors
///
/// - `UnexpectedEndOfInput` if the buffer ends before `]]`
/// - `MalformedTag` if `[[` or `]]` is missing
/// - any attribute error from [`parse_attribute`]
pub fn next_tag<'a>(cursor: &mut Cursor<'a>) -> Result<Tag<'a>> {
    let start = cursor.offset();
    cursor.expect("[[")?;
    cursor.skip_whitespace_required()?;

    if cursor.peek() == Some(b'/') {
        cursor.advance(1);
        cursor.skip_whitespace_required()?;
        cursor.expect("]]")?;
        return Ok(Tag::Close(Span::from_range(start, cursor.offset())));
    }

    let name = cursor.take_name();
    cursor.skip_whitespace_required()?;

    let mut attributes = Attributes::new();
    if cursor.peek() == Some(b']') {
        cursor.expect("]]")?;
    } else {
        loop {
            let (key, value, more) = parse_attribute(cursor)?;
            attributes.insert(key, value);
            if !more {
                break;
            }
            cursor.skip_whitespace_required()?;
        }
    }

    Ok(Tag::Open(OpenTag {
        name,
        attributes,
        span: Span::from_range(start, cursor.offset()),
    }))
}
