//! Inline parser for prose regions (paragraphs, headings, captions, ...).
//!
//! Scans forward with SIMD-accelerated `memchr` for the next `\` or `[`,
//! accumulating a text chunk until an un-escaped `[[` starts a tag. Text
//! borrows from the input unless an escape had to be decoded.
//!
//! Every prose region must be closed by `[[/]]`; running off the end of
//! the buffer is an error.

use tracing::trace;

use crate::ast::{Colored, Font, Formatting, FormattingStyle, Inline, InlineImage, Link, Size, Text};
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::escape;
use crate::span::Span;
use crate::tag::{next_tag, OpenTag, Tag};

/// Parse prose at the cursor up to and including its closing tag.
///
/// The returned sequence never holds an empty text node.
pub fn parse_inlines<'a>(cursor: &mut Cursor<'a>) -> Result<Vec<Inline<'a>>> {
    let mut inlines = Vec::with_capacity(4);
    let mut chunk_start = cursor.offset();
    let mut pos = chunk_start;

    loop {
        let hit = cursor
            .find_either(pos, b'\\', b'[')
            .ok_or_else(|| ParseError::unexpected_eof(cursor.input().len()))?;

        if cursor.byte_at(hit) == Some(b'\\') {
            pos = hit + 2;
            continue;
        }
        match cursor.byte_at(hit + 1) {
            Some(b'[') => {}
            Some(_) => {
                pos = hit + 1;
                continue;
            }
            None => return Err(ParseError::unexpected_eof(cursor.input().len())),
        }

        if hit > chunk_start {
            inlines.push(Inline::Text(Text {
                content: escape::decode(cursor.slice(chunk_start, hit)),
                span: Span::from_range(chunk_start, hit),
            }));
        }

        cursor.seek(hit);
        match next_tag(cursor)? {
            Tag::Close(_) => return Ok(inlines),
            Tag::Open(tag) => inlines.push(parse_inline_tag(cursor, tag)?),
        }

        chunk_start = cursor.offset();
        pos = chunk_start;
    }
}

/// Parse the children of an opening inline tag, then build its node.
fn parse_inline_tag<'a>(cursor: &mut Cursor<'a>, tag: OpenTag<'a>) -> Result<Inline<'a>> {
    trace!(tag = tag.name, offset = tag.span.start, "inline tag");

    cursor.descend(tag.span)?;
    let content = parse_inlines(cursor)?;
    cursor.ascend();
    let span = Span::new(tag.span.start, cursor.offset() as u32);

    if let Some(style) = FormattingStyle::from_tag(tag.name) {
        return Ok(Inline::Formatting(Formatting {
            style,
            content,
            span,
        }));
    }

    let inline = match tag.name {
        "link" => Inline::Link(Link {
            destination: escape::strip_newlines(tag.required("dest")?),
            content,
            span,
        }),
        "size" => Inline::Size(Size {
            size: tag.size()?,
            content,
            span,
        }),
        "font" => Inline::Font(Font {
            family: escape::strip_newlines(tag.required("family")?),
            content,
            span,
        }),
        "color" => {
            let (foreground, background) = tag.colors()?;
            Inline::Color(Colored {
                foreground,
                background,
                content,
                span,
            })
        }
        // Children are parsed for well-formedness and dropped.
        "inline-image" => Inline::Image(InlineImage {
            src: escape::strip_newlines(tag.required("src")?),
            width: tag.dimension("width")?,
            height: tag.dimension("height")?,
            span,
        }),
        other => {
            return Err(ParseError::new(
                ParseErrorKind::UnknownInlineTag,
                format!("unknown inline tag '{}'", other),
                tag.span,
            ))
        }
    };

    Ok(inline)
}
