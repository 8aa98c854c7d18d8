//! Block parser and document assembly.
//!
//! Recursive descent over sibling tags: each opening tag is dispatched on
//! its name to a block constructor, which consumes the block's whole
//! subtree through its matching `[[/]]` before the node is appended to its
//! parent. Prose content is handed to [`crate::inline`].
//!
//! Parsing is fail-fast. The first error aborts the parse and no partial
//! document is returned.

use tracing::{debug, trace};

use crate::ast::{
    Block, Collapse, Container, Document, Heading, HorizontalRule, Image, Inline, Layout, List,
    ListKind, Paragraph, Table, TableCell, TableRow,
};
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::escape;
use crate::inline::parse_inlines;
use crate::span::{Span, MAX_INPUT_LEN};
use crate::tag::{next_tag, OpenTag, Tag};

/// Default limit on simultaneously open tags.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tag names the block parser dispatches on.
pub const BLOCK_TAGS: [&str; 10] = [
    "p", "block", "quote", "image", "h", "hr", "list", "table", "collapse", "break",
];

/// CDF parser with a configurable nesting limit.
///
/// A parser holds no per-document state; every call to [`Parser::parse`]
/// starts from a fresh cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    max_depth: Option<usize>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser with the default nesting limit.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Set the nesting limit.
    ///
    /// `None` removes the guard; deeply nested input then recurses until
    /// the thread's stack is exhausted.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a complete document.
    pub fn parse<'a>(&self, input: &'a str) -> Result<Document<'a>> {
        check_input_len(input.len())?;
        let mut cursor = Cursor::new(input).with_max_depth(self.max_depth);
        let result = parse_document(&mut cursor);

        match &result {
            Ok(doc) => debug!(
                blocks = doc.content.len(),
                bytes = input.len(),
                "parsed document"
            ),
            Err(err) => debug!(
                kind = err.kind.as_str(),
                offset = err.offset(),
                "document failed to parse"
            ),
        }

        result
    }
}

/// Fail with `InputTooLarge` when `len` bytes cannot be addressed by a [`Span`].
pub fn check_input_len(len: usize) -> Result<()> {
    if len > MAX_INPUT_LEN {
        return Err(ParseError::new(
            ParseErrorKind::InputTooLarge,
            format!(
                "input is {} bytes, the limit is {} bytes",
                len, MAX_INPUT_LEN
            ),
            Span::at(0),
        ));
    }
    Ok(())
}

/// Parse the `[[cdf ...]] ... [[/]]` document envelope.
pub fn parse_document<'a>(cursor: &mut Cursor<'a>) -> Result<Document<'a>> {
    cursor.skip_whitespace_required()?;

    let mut root = match next_tag(cursor)? {
        Tag::Open(tag) if tag.name == "cdf" => tag,
        Tag::Open(tag) => {
            return Err(ParseError::new(
                ParseErrorKind::MissingDocumentTag,
                format!("expected a 'cdf' tag, found '{}'", tag.name),
                tag.span,
            ))
        }
        Tag::Close(span) => return Err(unmatched_close(span)),
    };

    cursor.descend(root.span)?;
    let content = parse_blocks(cursor)?;
    cursor.ascend();

    cursor.skip_whitespace();
    if !cursor.is_eof() {
        let trailing = cursor.offset();
        if let Ok(Tag::Close(span)) = next_tag(&mut cursor.clone()) {
            return Err(unmatched_close(span));
        }
        return Err(ParseError::new(
            ParseErrorKind::TrailingContent,
            "unexpected content after the document's closing tag",
            Span::from_range(trailing, cursor.input().len()),
        ));
    }

    Ok(Document {
        title: root.attributes.take("title"),
        subtitle: root.attributes.take("subtitle"),
        date: root.attributes.take("date"),
        author: root.attributes.take("author"),
        content,
        span: Span::from_range(0, cursor.input().len()),
    })
}

/// Parse sibling blocks up to and including the enclosing closing tag.
pub fn parse_blocks<'a>(cursor: &mut Cursor<'a>) -> Result<Vec<Block<'a>>> {
    let mut blocks = Vec::with_capacity(8);

    loop {
        cursor.skip_whitespace_required()?;
        match next_tag(cursor)? {
            Tag::Close(_) => return Ok(blocks),
            Tag::Open(tag) => blocks.push(parse_block(cursor, tag)?),
        }
    }
}

/// Build the block for an already tokenized opening tag.
fn parse_block<'a>(cursor: &mut Cursor<'a>, tag: OpenTag<'a>) -> Result<Block<'a>> {
    if !BLOCK_TAGS.contains(&tag.name) {
        return Err(ParseError::new(
            ParseErrorKind::UnknownBlockTag,
            format!("unknown block tag '{}'", tag.name),
            tag.span,
        ));
    }
    trace!(tag = tag.name, offset = tag.span.start, "block tag");

    let layout = Layout {
        alignment: tag.alignment()?,
        wrap: tag.flag("wrap"),
    };

    cursor.descend(tag.span)?;
    let block = match tag.name {
        "p" => {
            let content = parse_inlines(cursor)?;
            Block::Paragraph(Paragraph {
                layout,
                content,
                span: span_since(&tag, cursor),
            })
        }
        "block" | "quote" => {
            let container = Container {
                layout,
                content: parse_blocks(cursor)?,
                span: span_since(&tag, cursor),
            };
            if tag.name == "block" {
                Block::BasicBlock(container)
            } else {
                Block::Quote(container)
            }
        }
        "image" => parse_image(cursor, &tag, layout)?,
        "h" => {
            let level = tag.heading_level()?;
            let content = parse_inlines(cursor)?;
            Block::Heading(Heading {
                layout,
                level,
                content,
                span: span_since(&tag, cursor),
            })
        }
        "hr" => {
            parse_inlines(cursor)?;
            Block::HorizontalRule(HorizontalRule {
                layout,
                span: span_since(&tag, cursor),
            })
        }
        "list" => {
            let kind = if tag.flag("ordered") {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            let items = parse_blocks(cursor)?;
            Block::List(List {
                layout,
                kind,
                items,
                span: span_since(&tag, cursor),
            })
        }
        "table" => {
            let rows = parse_table(cursor)?;
            Block::Table(Table {
                layout,
                rows,
                span: span_since(&tag, cursor),
            })
        }
        "collapse" => {
            let (summary, content) = parse_collapse(cursor)?;
            Block::Collapse(Collapse {
                layout,
                summary,
                content,
                span: span_since(&tag, cursor),
            })
        }
        // "break"
        _ => {
            parse_inlines(cursor)?;
            Block::PageBreak(span_since(&tag, cursor))
        }
    };
    cursor.ascend();

    Ok(block)
}

fn parse_image<'a>(
    cursor: &mut Cursor<'a>,
    tag: &OpenTag<'a>,
    layout: Layout,
) -> Result<Block<'a>> {
    let src = escape::strip_newlines(tag.required("src")?);
    let width = tag.dimension("width")?;
    let height = tag.dimension("height")?;

    let caption = parse_inlines(cursor)?;
    Ok(Block::Image(Image {
        layout,
        src,
        width,
        height,
        caption: tag.flag("has-caption").then_some(caption),
        span: span_since(tag, cursor),
    }))
}

fn parse_table<'a>(cursor: &mut Cursor<'a>) -> Result<Vec<TableRow<'a>>> {
    let mut rows = Vec::new();

    loop {
        cursor.skip_whitespace_required()?;
        let tag = match next_tag(cursor)? {
            Tag::Close(_) => return Ok(rows),
            Tag::Open(tag) if tag.name == "row" => tag,
            Tag::Open(tag) => {
                let message = format!("table should only contain rows, found '{}'", tag.name);
                return Err(invalid_table(message, tag.span));
            }
        };

        cursor.descend(tag.span)?;
        let cells = parse_row(cursor)?;
        cursor.ascend();
        rows.push(TableRow {
            cells,
            span: span_since(&tag, cursor),
        });
    }
}

fn parse_row<'a>(cursor: &mut Cursor<'a>) -> Result<Vec<TableCell<'a>>> {
    let mut cells = Vec::new();

    loop {
        cursor.skip_whitespace_required()?;
        let tag = match next_tag(cursor)? {
            Tag::Close(_) => return Ok(cells),
            Tag::Open(tag) if tag.name == "cell" => tag,
            Tag::Open(tag) => {
                let message = format!("row should only contain cells, found '{}'", tag.name);
                return Err(invalid_table(message, tag.span));
            }
        };

        cursor.descend(tag.span)?;
        let content = parse_blocks(cursor)?;
        cursor.ascend();
        cells.push(TableCell {
            header: tag.flag("is-header"),
            content,
            span: span_since(&tag, cursor),
        });
    }
}

/// Parse `[[summary]]...[[/]] [[content]]...[[/]] [[/]]`.
fn parse_collapse<'a>(cursor: &mut Cursor<'a>) -> Result<(Vec<Inline<'a>>, Vec<Block<'a>>)> {
    let summary_tag = expect_section(cursor, "summary")?;
    cursor.descend(summary_tag.span)?;
    let summary = parse_inlines(cursor)?;
    cursor.ascend();

    let content_tag = expect_section(cursor, "content")?;
    cursor.descend(content_tag.span)?;
    let content = parse_blocks(cursor)?;
    cursor.ascend();

    cursor.skip_whitespace_required()?;
    match next_tag(cursor)? {
        Tag::Close(_) => Ok((summary, content)),
        Tag::Open(tag) => Err(invalid_collapse(
            format!("expected the collapse to close, found '{}'", tag.name),
            tag.span,
        )),
    }
}

fn expect_section<'a>(cursor: &mut Cursor<'a>, name: &str) -> Result<OpenTag<'a>> {
    cursor.skip_whitespace_required()?;
    match next_tag(cursor)? {
        Tag::Open(tag) if tag.name == name => Ok(tag),
        Tag::Open(tag) => Err(invalid_collapse(
            format!("expected a '{}' tag in collapse, found '{}'", name, tag.name),
            tag.span,
        )),
        Tag::Close(span) => Err(invalid_collapse(
            format!("expected a '{}' tag in collapse, found a closing tag", name),
            span,
        )),
    }
}

/// Span from an opening tag through the cursor (just past its closing tag).
#[inline]
fn span_since(tag: &OpenTag<'_>, cursor: &Cursor<'_>) -> Span {
    Span::new(tag.span.start, cursor.offset() as u32)
}

fn unmatched_close(span: Span) -> ParseError {
    ParseError::new(
        ParseErrorKind::MismatchedClosingTag,
        "closing tag without a matching opening tag",
        span,
    )
}

fn invalid_table(message: String, span: Span) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidTableStructure, message, span)
}

fn invalid_collapse(message: String, span: Span) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidCollapseStructure, message, span)
}
