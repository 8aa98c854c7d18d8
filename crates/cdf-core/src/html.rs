//! HTML export.
//!
//! A tree walk over a parsed [`Document`] writing an HTML fragment. Text is
//! escaped with `html-escape`; layout and sizes become inline `style`
//! attributes.

use std::io::{self, Write};

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::ast::{
    Alignment, Block, Dimension, Document, FormattingStyle, Inline, Layout, ListKind,
};

pub const DEFAULT_QUOTE_CLASS: &str = "cdf-quote";
pub const DEFAULT_IMAGE_CLASS: &str = "cdf-image";
pub const DEFAULT_CAPTION_CLASS: &str = "cdf-caption";

/// Options for [`HtmlExporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSettings {
    pub omit_title: bool,
    pub omit_subtitle: bool,
    pub omit_date: bool,
    pub omit_author: bool,
    /// CSS class of the `<div>` wrapping a quote.
    pub quote_class: String,
    /// CSS class of the `<div>` wrapping a block image.
    pub image_class: String,
    /// CSS class of an image caption.
    pub caption_class: String,
}

impl Default for HtmlSettings {
    fn default() -> Self {
        Self {
            omit_title: false,
            omit_subtitle: false,
            omit_date: false,
            omit_author: false,
            quote_class: DEFAULT_QUOTE_CLASS.to_string(),
            image_class: DEFAULT_IMAGE_CLASS.to_string(),
            caption_class: DEFAULT_CAPTION_CLASS.to_string(),
        }
    }
}

/// Render `doc` to an HTML string.
pub fn to_html(doc: &Document<'_>, settings: &HtmlSettings) -> io::Result<String> {
    let mut exporter = HtmlExporter::new(Vec::new(), settings.clone());
    exporter.export(doc)?;
    String::from_utf8(exporter.into_inner())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Writes a document as HTML to any [`io::Write`].
pub struct HtmlExporter<W: Write> {
    out: W,
    settings: HtmlSettings,
}

impl<W: Write> HtmlExporter<W> {
    pub fn new(out: W, settings: HtmlSettings) -> Self {
        Self { out, settings }
    }

    /// Consume the exporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the metadata header followed by every content block.
    pub fn export(&mut self, doc: &Document<'_>) -> io::Result<()> {
        let header = [
            ("h1", doc.title.as_deref(), self.settings.omit_title),
            ("h2", doc.subtitle.as_deref(), self.settings.omit_subtitle),
            ("h3", doc.date.as_deref(), self.settings.omit_date),
            ("h3", doc.author.as_deref(), self.settings.omit_author),
        ];

        let mut has_header = false;
        for (element, value, omit) in header {
            if let Some(value) = value.filter(|v| !omit && !v.is_empty()) {
                writeln!(self.out, "<{0}>{1}</{0}>", element, encode_text(value))?;
                has_header = true;
            }
        }
        if has_header {
            writeln!(self.out, "<hr>")?;
        }

        for block in &doc.content {
            self.export_block(block)?;
        }
        Ok(())
    }

    fn export_block(&mut self, block: &Block<'_>) -> io::Result<()> {
        let style = block.layout().map(layout_style).unwrap_or_default();

        match block {
            Block::Paragraph(p) => {
                write!(self.out, "<p{}>", style_attribute(&style))?;
                self.export_inlines(&p.content)?;
                writeln!(self.out, "</p>")
            }
            Block::BasicBlock(b) => {
                write!(self.out, "<div{}>", style_attribute(&style))?;
                self.export_blocks(&b.content)?;
                writeln!(self.out, "</div>")
            }
            Block::Quote(q) => {
                write!(
                    self.out,
                    "<div{} class=\"{}\">",
                    style_attribute(&style),
                    encode_double_quoted_attribute(&self.settings.quote_class)
                )?;
                self.export_blocks(&q.content)?;
                writeln!(self.out, "</div>")
            }
            Block::Image(image) => {
                write!(
                    self.out,
                    "<div{} class=\"{}\"><img{} src=\"{}\">",
                    style_attribute(&style),
                    encode_double_quoted_attribute(&self.settings.image_class),
                    style_attribute(&size_style(image.width, image.height)),
                    encode_double_quoted_attribute(&image.src)
                )?;
                if let Some(caption) = &image.caption {
                    write!(
                        self.out,
                        "<div class=\"{}\">",
                        encode_double_quoted_attribute(&self.settings.caption_class)
                    )?;
                    self.export_inlines(caption)?;
                    write!(self.out, "</div>")?;
                }
                writeln!(self.out, "</div>")
            }
            Block::Heading(h) => {
                write!(self.out, "<h{}{}>", h.level, style_attribute(&style))?;
                self.export_inlines(&h.content)?;
                writeln!(self.out, "</h{}>", h.level)
            }
            Block::HorizontalRule(_) => writeln!(self.out, "<hr>"),
            Block::List(list) => {
                let element = match list.kind {
                    ListKind::Ordered => "ol",
                    ListKind::Unordered => "ul",
                };
                writeln!(self.out, "<{}{}>", element, style_attribute(&style))?;
                for item in &list.items {
                    write!(self.out, "<li>")?;
                    self.export_block(item)?;
                    writeln!(self.out, "</li>")?;
                }
                writeln!(self.out, "</{}>", element)
            }
            Block::Table(table) => {
                writeln!(self.out, "<table{}>", style_attribute(&style))?;
                for row in &table.rows {
                    write!(self.out, "<tr>")?;
                    for cell in &row.cells {
                        let element = if cell.header { "th" } else { "td" };
                        write!(self.out, "<{}>", element)?;
                        self.export_blocks(&cell.content)?;
                        write!(self.out, "</{}>", element)?;
                    }
                    writeln!(self.out, "</tr>")?;
                }
                writeln!(self.out, "</table>")
            }
            Block::Collapse(c) => {
                write!(self.out, "<details{}><summary>", style_attribute(&style))?;
                self.export_inlines(&c.summary)?;
                writeln!(self.out, "</summary>")?;
                self.export_blocks(&c.content)?;
                writeln!(self.out, "</details>")
            }
            Block::PageBreak(_) => {
                writeln!(self.out, "<div style=\"page-break-after: always;\"></div>")
            }
        }
    }

    fn export_blocks(&mut self, blocks: &[Block<'_>]) -> io::Result<()> {
        blocks.iter().try_for_each(|b| self.export_block(b))
    }

    fn export_inlines(&mut self, inlines: &[Inline<'_>]) -> io::Result<()> {
        inlines.iter().try_for_each(|i| self.export_inline(i))
    }

    fn export_inline(&mut self, inline: &Inline<'_>) -> io::Result<()> {
        match inline {
            Inline::Text(text) => {
                write!(self.out, "{}", encode_text(&text.content).replace('\n', "<br>"))
            }
            Inline::Link(link) => {
                write!(
                    self.out,
                    "<a href=\"{}\">",
                    encode_double_quoted_attribute(&link.destination)
                )?;
                self.export_inlines(&link.content)?;
                write!(self.out, "</a>")
            }
            Inline::Formatting(f) => {
                let element = formatting_element(f.style);
                write!(self.out, "<{}>", element)?;
                self.export_inlines(&f.content)?;
                write!(self.out, "</{}>", element)
            }
            Inline::Size(s) => {
                write!(self.out, "<span style=\"font-size: {};\">", s.size)?;
                self.export_inlines(&s.content)?;
                write!(self.out, "</span>")
            }
            Inline::Font(font) => {
                write!(
                    self.out,
                    "<span style=\"font-family: {};\">",
                    encode_double_quoted_attribute(&font.family)
                )?;
                self.export_inlines(&font.content)?;
                write!(self.out, "</span>")
            }
            Inline::Color(c) => {
                let mut style = String::new();
                if let Some(fg) = c.foreground {
                    style.push_str(&format!("color: {};", fg));
                }
                if let Some(bg) = c.background {
                    style.push_str(&format!("background-color: {};", bg));
                }
                write!(self.out, "<span style=\"{}\">", style)?;
                self.export_inlines(&c.content)?;
                write!(self.out, "</span>")
            }
            Inline::Image(image) => write!(
                self.out,
                "<img{} src=\"{}\">",
                style_attribute(&size_style(image.width, image.height)),
                encode_double_quoted_attribute(&image.src)
            ),
        }
    }
}

/// `text-align` for plain blocks, `float` for wrapped ones.
fn layout_style(layout: Layout) -> String {
    let property = if layout.wrap { "float" } else { "text-align" };
    match layout.alignment {
        Alignment::None => String::new(),
        alignment => format!("{}: {};", property, alignment.as_str()),
    }
}

fn size_style(width: Option<Dimension>, height: Option<Dimension>) -> String {
    let mut style = String::new();
    if let Some(width) = width {
        style.push_str(&format!("width: {};", width));
    }
    if let Some(height) = height {
        style.push_str(&format!("height: {};", height));
    }
    style
}

/// ` style="..."`, or nothing for an empty style.
fn style_attribute(style: &str) -> String {
    if style.trim().is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", style)
    }
}

const fn formatting_element(style: FormattingStyle) -> &'static str {
    match style {
        FormattingStyle::Bold => "b",
        FormattingStyle::Italic => "i",
        FormattingStyle::Strikethrough => "s",
        FormattingStyle::Underline => "u",
        FormattingStyle::Teletype => "code",
    }
}
