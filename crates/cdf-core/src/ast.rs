//! Abstract Syntax Tree types for CDF documents.
//!
//! This module contains all the AST node types produced by the parser.
//! The AST is designed to be:
//!
//! - **Zero-copy**: Uses `Cow<'a, str>` to borrow from input when no escape
//!   sequence had to be decoded
//! - **Span-tracked**: Every node includes source location information
//! - **Strongly typed**: Attributes are converted to enums and numbers at
//!   parse time; no raw attribute maps survive into the tree
//!
//! `Block` and `Inline` are closed sums, so every consumer (the HTML exporter,
//! the CLI) matches them exhaustively.

use std::fmt;

use crate::color::Color;
use crate::span::Span;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// A parsed CDF document.
///
/// The document is the root of the AST. Its metadata comes from the
/// attributes of the opening `cdf` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    /// Document title (`title` attribute).
    pub title: Option<CowStr<'a>>,
    /// Document subtitle (`subtitle` attribute).
    pub subtitle: Option<CowStr<'a>>,
    /// Free-form date string (`date` attribute).
    pub date: Option<CowStr<'a>>,
    /// Author name (`author` attribute).
    pub author: Option<CowStr<'a>>,
    /// Content blocks in document order.
    pub content: Vec<Block<'a>>,
    /// Source span covering the entire document.
    pub span: Span,
}

/// Per-block layout hint from the `align` attribute.
///
/// `align=none` and an absent `align` both map to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
}

impl Alignment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Alignment::None => "none",
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

/// Unit of a size value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Percent,
    Pixel,
    Point,
    Centimeter,
    Millimeter,
}

impl SizeUnit {
    /// All units, in the order attribute lookups try them.
    pub const ALL: [SizeUnit; 5] = [
        SizeUnit::Percent,
        SizeUnit::Pixel,
        SizeUnit::Point,
        SizeUnit::Centimeter,
        SizeUnit::Millimeter,
    ];

    /// Attribute spelling (`percent`, `px`, ...), also the suffix of
    /// `width-*`/`height-*` keys.
    pub const fn attribute_name(self) -> &'static str {
        match self {
            SizeUnit::Percent => "percent",
            SizeUnit::Pixel => "px",
            SizeUnit::Point => "pt",
            SizeUnit::Centimeter => "cm",
            SizeUnit::Millimeter => "mm",
        }
    }

    /// CSS unit suffix.
    pub const fn css_suffix(self) -> &'static str {
        match self {
            SizeUnit::Percent => "%",
            SizeUnit::Pixel => "px",
            SizeUnit::Point => "pt",
            SizeUnit::Centimeter => "cm",
            SizeUnit::Millimeter => "mm",
        }
    }
}

/// A numeric size with its unit, e.g. `12px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f32,
    pub unit: SizeUnit,
}

impl Dimension {
    pub const fn new(value: f32, unit: SizeUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.css_suffix())
    }
}

/// Block-level AST nodes.
///
/// Blocks are the primary structural elements of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    /// `p`: prose paragraph.
    Paragraph(Paragraph<'a>),
    /// `block`: generic container of blocks.
    BasicBlock(Container<'a>),
    /// `quote`: block quotation.
    Quote(Container<'a>),
    /// `image`: block image with optional caption.
    Image(Image<'a>),
    /// `h`: section heading (classes 1-5).
    Heading(Heading<'a>),
    /// `hr`: horizontal rule.
    HorizontalRule(HorizontalRule),
    /// `list`: ordered or unordered list.
    List(List<'a>),
    /// `table`: rows of cells.
    Table(Table<'a>),
    /// `collapse`: summary line with collapsible content.
    Collapse(Collapse<'a>),
    /// `break`: page break.
    PageBreak(Span),
}

impl<'a> Block<'a> {
    /// Source span of the block, from its opening tag through its closing tag.
    pub fn span(&self) -> Span {
        match self {
            Block::Paragraph(b) => b.span,
            Block::BasicBlock(b) | Block::Quote(b) => b.span,
            Block::Image(b) => b.span,
            Block::Heading(b) => b.span,
            Block::HorizontalRule(b) => b.span,
            Block::List(b) => b.span,
            Block::Table(b) => b.span,
            Block::Collapse(b) => b.span,
            Block::PageBreak(span) => *span,
        }
    }

    /// Layout of the block; `None` for page breaks, which carry none.
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Block::Paragraph(b) => Some(b.layout),
            Block::BasicBlock(b) | Block::Quote(b) => Some(b.layout),
            Block::Image(b) => Some(b.layout),
            Block::Heading(b) => Some(b.layout),
            Block::HorizontalRule(b) => Some(b.layout),
            Block::List(b) => Some(b.layout),
            Block::Table(b) => Some(b.layout),
            Block::Collapse(b) => Some(b.layout),
            Block::PageBreak(_) => None,
        }
    }

    /// The tag name this block was written with.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "p",
            Block::BasicBlock(_) => "block",
            Block::Quote(_) => "quote",
            Block::Image(_) => "image",
            Block::Heading(_) => "h",
            Block::HorizontalRule(_) => "hr",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::Collapse(_) => "collapse",
            Block::PageBreak(_) => "break",
        }
    }
}

/// Alignment and wrap flag shared by every block except page breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub alignment: Alignment,
    /// Presence of the `wrap` flag (float instead of text alignment).
    pub wrap: bool,
}

/// Prose paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph<'a> {
    pub layout: Layout,
    /// Inline content with formatting.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Block container, used by both `block` and `quote`.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<'a> {
    pub layout: Layout,
    /// Nested blocks.
    pub content: Vec<Block<'a>>,
    /// Source span.
    pub span: Span,
}

/// Block image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<'a> {
    pub layout: Layout,
    /// Image source URL or path.
    pub src: CowStr<'a>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    /// Caption prose, present when the tag carries `has-caption`.
    pub caption: Option<Vec<Inline<'a>>>,
    /// Source span.
    pub span: Span,
}

/// Section heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    pub layout: Layout,
    /// Heading class (1-5).
    pub level: u8,
    /// Inline content (may include formatting).
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Horizontal rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalRule {
    pub layout: Layout,
    pub span: Span,
}

/// List ordering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Numbered list.
    Ordered,
    /// Bulleted list.
    Unordered,
}

/// A list block; each child block is one item.
#[derive(Debug, Clone, PartialEq)]
pub struct List<'a> {
    pub layout: Layout,
    /// Ordered or unordered.
    pub kind: ListKind,
    pub items: Vec<Block<'a>>,
    /// Source span.
    pub span: Span,
}

/// Data table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    pub layout: Layout,
    pub rows: Vec<TableRow<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    /// Cells in this row.
    pub cells: Vec<TableCell<'a>>,
    /// Source span.
    pub span: Span,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell<'a> {
    /// Whether this is a header cell (`is-header`).
    pub header: bool,
    /// Cell content blocks.
    pub content: Vec<Block<'a>>,
    /// Source span.
    pub span: Span,
}

/// Collapsible section.
#[derive(Debug, Clone, PartialEq)]
pub struct Collapse<'a> {
    pub layout: Layout,
    /// Always-visible summary prose.
    pub summary: Vec<Inline<'a>>,
    /// Collapsed content blocks.
    pub content: Vec<Block<'a>>,
    /// Source span.
    pub span: Span,
}

/// Inline-level AST nodes (within paragraphs, headings, captions, ...).
///
/// Every variant other than `Text` and `Image` nests further inlines.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline<'a> {
    /// Plain text run with escapes decoded.
    Text(Text<'a>),
    /// `link`: hyperlink.
    Link(Link<'a>),
    /// `b`, `i`, `s`, `u`, `t`: text formatting.
    Formatting(Formatting<'a>),
    /// `size`: font size.
    Size(Size<'a>),
    /// `font`: font family.
    Font(Font<'a>),
    /// `color`: foreground and/or background color.
    Color(Colored<'a>),
    /// `inline-image`: image in running text.
    Image(InlineImage<'a>),
}

impl<'a> Inline<'a> {
    /// Source span of the node.
    pub fn span(&self) -> Span {
        match self {
            Inline::Text(i) => i.span,
            Inline::Link(i) => i.span,
            Inline::Formatting(i) => i.span,
            Inline::Size(i) => i.span,
            Inline::Font(i) => i.span,
            Inline::Color(i) => i.span,
            Inline::Image(i) => i.span,
        }
    }

    /// Nested inline content; empty for text and images.
    pub fn children(&self) -> &[Inline<'a>] {
        match self {
            Inline::Text(_) | Inline::Image(_) => &[],
            Inline::Link(i) => &i.content,
            Inline::Formatting(i) => &i.content,
            Inline::Size(i) => &i.content,
            Inline::Font(i) => &i.content,
            Inline::Color(i) => &i.content,
        }
    }
}

/// Plain text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Text<'a> {
    /// The decoded text content.
    pub content: CowStr<'a>,
    /// Source span.
    pub span: Span,
}

/// Hyperlink.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<'a> {
    /// Link destination (`dest` attribute).
    pub destination: CowStr<'a>,
    /// Link text.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Formatting style of a `Formatting` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingStyle {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Teletype,
}

impl FormattingStyle {
    /// Map a tag name (`b`, `i`, `s`, `u`, `t`) to its style.
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "b" => Some(FormattingStyle::Bold),
            "i" => Some(FormattingStyle::Italic),
            "s" => Some(FormattingStyle::Strikethrough),
            "u" => Some(FormattingStyle::Underline),
            "t" => Some(FormattingStyle::Teletype),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FormattingStyle::Bold => "bold",
            FormattingStyle::Italic => "italic",
            FormattingStyle::Strikethrough => "strikethrough",
            FormattingStyle::Underline => "underline",
            FormattingStyle::Teletype => "teletype",
        }
    }
}

/// Formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatting<'a> {
    pub style: FormattingStyle,
    /// Nested inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Text with an explicit font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Size<'a> {
    pub size: Dimension,
    /// Nested inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Text in a specific font family.
#[derive(Debug, Clone, PartialEq)]
pub struct Font<'a> {
    /// Font family name (`family` attribute).
    pub family: CowStr<'a>,
    /// Nested inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Colored text. At least one of the two colors is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Colored<'a> {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    /// Nested inline content.
    pub content: Vec<Inline<'a>>,
    /// Source span.
    pub span: Span,
}

/// Image in running text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage<'a> {
    /// Image source URL or path.
    pub src: CowStr<'a>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    /// Source span.
    pub span: Span,
}
