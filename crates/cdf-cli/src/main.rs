//! CDF CLI - Parse, validate, and convert CDF documents
//!
//! Usage:
//!   cdf [OPTIONS] <COMMAND>
//!
//! Commands:
//!   parse     Parse and display document structure
//!   validate  Check a document for errors
//!   stats     Show document statistics
//!   html      Convert documents to HTML

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use cdf_core::ast::{Dimension, FormattingStyle, Layout, ListKind};
use cdf_core::color::Color;
use cdf_core::html::{DEFAULT_CAPTION_CLASS, DEFAULT_IMAGE_CLASS, DEFAULT_QUOTE_CLASS};
use cdf_core::parser::DEFAULT_MAX_DEPTH;
use cdf_core::{to_html, Block, Document, HtmlSettings, Inline, Parser as DocumentParser};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "cdf",
    version,
    about = "CDF document parser, validator and HTML converter"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Maximum tag nesting depth; 0 disables the limit
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and display document structure
    Parse {
        /// Show detailed AST structure
        #[arg(short, long)]
        verbose: bool,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,

        file: PathBuf,
    },

    /// Check a document for errors without output
    Validate {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,

        file: PathBuf,
    },

    /// Show document statistics
    Stats { file: PathBuf },

    /// Convert documents to HTML
    Html(HtmlArgs),
}

#[derive(Debug, Args)]
struct HtmlArgs {
    /// Output file, or directory for several inputs; `-` writes to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave the document title out of the header
    #[arg(long)]
    omit_title: bool,

    /// Leave the subtitle out of the header
    #[arg(long)]
    omit_subtitle: bool,

    /// Leave the date out of the header
    #[arg(long)]
    omit_date: bool,

    /// Leave the author out of the header
    #[arg(long)]
    omit_author: bool,

    /// CSS class for quote blocks
    #[arg(long, default_value = DEFAULT_QUOTE_CLASS)]
    quote_class: String,

    /// CSS class for image blocks
    #[arg(long, default_value = DEFAULT_IMAGE_CLASS)]
    image_class: String,

    /// CSS class for image captions
    #[arg(long, default_value = DEFAULT_CAPTION_CLASS)]
    caption_class: String,

    /// Documents to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl HtmlArgs {
    fn settings(&self) -> HtmlSettings {
        HtmlSettings {
            omit_title: self.omit_title,
            omit_subtitle: self.omit_subtitle,
            omit_date: self.omit_date,
            omit_author: self.omit_author,
            quote_class: self.quote_class.clone(),
            image_class: self.image_class.clone(),
            caption_class: self.caption_class.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let fallback = if debug { "cdf=debug,cdf_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let max_depth = (cli.max_depth > 0).then_some(cli.max_depth);
    let parser = DocumentParser::new().with_max_depth(max_depth);

    match cli.command {
        Command::Parse {
            verbose,
            json,
            file,
        } => cmd_parse(&parser, &file, verbose, json),
        Command::Validate { json, file } => cmd_validate(&parser, &file, json),
        Command::Stats { file } => cmd_stats(&parser, &file),
        Command::Html(args) => cmd_html(&parser, &args),
    }
}

fn read_input(path: &Path) -> Result<String> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    debug!(file = %path.display(), bytes = input.len(), "read input");
    Ok(input)
}

/// Parse `input`, prefixing any error with `file:line:column`.
fn parse_input<'a>(
    parser: &DocumentParser,
    path: &Path,
    input: &'a str,
) -> Result<Document<'a>> {
    parser.parse(input).map_err(|e| {
        let (line, column) = line_column(input, e.offset() as usize);
        anyhow::Error::new(e).context(format!("{}:{}:{}", path.display(), line, column))
    })
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let before = &input.as_bytes()[..offset.min(input.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
    (line, column)
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(parser: &DocumentParser, path: &Path, verbose: bool, json: bool) -> Result<()> {
    let input = read_input(path)?;
    let doc = parse_input(parser, path, &input)?;

    if json {
        print_json(&doc)?;
    } else if verbose {
        print_document_verbose(&doc);
    } else {
        print_document_summary(&doc);
    }

    Ok(())
}

// =============================================================================
// Validate Command
// =============================================================================

fn cmd_validate(parser: &DocumentParser, path: &Path, json: bool) -> Result<()> {
    let input = read_input(path)?;

    match parser.parse(&input) {
        Ok(doc) => {
            if json {
                println!("{}", serde_json::json!({"valid": true, "error": null}));
            } else {
                println!("Valid: {} top-level block(s)", doc.content.len());
            }
            Ok(())
        }
        Err(e) => {
            let (line, column) = line_column(&input, e.offset() as usize);
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "error": {
                            "kind": e.kind.as_str(),
                            "message": e.message,
                            "span": {"start": e.span.start, "end": e.span.end},
                            "line": line,
                            "column": column,
                        }
                    })
                );
            } else {
                eprintln!(
                    "Invalid: {}:{}:{}: {} ({})",
                    path.display(),
                    line,
                    column,
                    e.message,
                    e.kind.as_str()
                );
            }
            bail!("'{}' is not a valid CDF document", path.display())
        }
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(parser: &DocumentParser, path: &Path) -> Result<()> {
    let input = read_input(path)?;
    let doc = parse_input(parser, path, &input)?;

    let stats = DocumentStats::from_document(&doc, &input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Title:        {}", doc.title.as_deref().unwrap_or("-"));
    println!("Author:       {}", doc.author.as_deref().unwrap_or("-"));
    println!();
    println!("Blocks:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Headings:       {}", stats.headings);
    println!("  Basic blocks:   {}", stats.basic_blocks);
    println!("  Quotes:         {}", stats.quotes);
    println!("  Images:         {}", stats.images);
    println!("  Rules:          {}", stats.rules);
    println!("  Lists:          {}", stats.lists);
    println!("  Tables:         {}", stats.tables);
    println!("  Collapses:      {}", stats.collapses);
    println!("  Page breaks:    {}", stats.page_breaks);
    println!();
    println!("Inline:");
    println!("  Inline tags:    {}", stats.inline_tags);
    println!("  Text runs:      {}", stats.text_runs);
    println!();
    println!("Structure:");
    println!("  Max depth:      {}", stats.max_depth);
    println!("  Bytes:          {}", stats.bytes);
    println!("  Lines:          {}", stats.lines);

    Ok(())
}

/// Node counts; depth counts open tags below the `cdf` root.
#[derive(Debug, Default)]
struct DocumentStats {
    total_blocks: usize,
    paragraphs: usize,
    headings: usize,
    basic_blocks: usize,
    quotes: usize,
    images: usize,
    rules: usize,
    lists: usize,
    tables: usize,
    collapses: usize,
    page_breaks: usize,
    inline_tags: usize,
    text_runs: usize,
    max_depth: usize,
    bytes: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            bytes: input.len(),
            lines: input.lines().count(),
            ..Self::default()
        };

        stats.count_blocks(&doc.content, 1);
        stats
    }

    fn reach(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    fn count_blocks(&mut self, blocks: &[Block], depth: usize) {
        for block in blocks {
            self.total_blocks += 1;
            self.reach(depth);
            match block {
                Block::Paragraph(p) => {
                    self.paragraphs += 1;
                    self.count_inlines(&p.content, depth + 1);
                }
                Block::Heading(h) => {
                    self.headings += 1;
                    self.count_inlines(&h.content, depth + 1);
                }
                Block::BasicBlock(b) => {
                    self.basic_blocks += 1;
                    self.count_blocks(&b.content, depth + 1);
                }
                Block::Quote(q) => {
                    self.quotes += 1;
                    self.count_blocks(&q.content, depth + 1);
                }
                Block::Image(i) => {
                    self.images += 1;
                    if let Some(caption) = &i.caption {
                        self.count_inlines(caption, depth + 1);
                    }
                }
                Block::HorizontalRule(_) => self.rules += 1,
                Block::List(l) => {
                    self.lists += 1;
                    self.count_blocks(&l.items, depth + 1);
                }
                Block::Table(t) => {
                    self.tables += 1;
                    for row in &t.rows {
                        self.reach(depth + 1);
                        for cell in &row.cells {
                            self.reach(depth + 2);
                            self.count_blocks(&cell.content, depth + 3);
                        }
                    }
                }
                Block::Collapse(c) => {
                    self.collapses += 1;
                    self.reach(depth + 1);
                    self.count_inlines(&c.summary, depth + 2);
                    self.count_blocks(&c.content, depth + 2);
                }
                Block::PageBreak(_) => self.page_breaks += 1,
            }
        }
    }

    fn count_inlines(&mut self, inlines: &[Inline], depth: usize) {
        for inline in inlines {
            if let Inline::Text(_) = inline {
                self.text_runs += 1;
            } else {
                self.inline_tags += 1;
                self.reach(depth);
                self.count_inlines(inline.children(), depth + 1);
            }
        }
    }
}

// =============================================================================
// HTML Command
// =============================================================================

/// Where one converted document is written.
enum OutputTarget {
    Stdout,
    File(PathBuf),
}

fn cmd_html(parser: &DocumentParser, args: &HtmlArgs) -> Result<()> {
    let settings = args.settings();
    if args.files.len() > 1 && matches!(&args.output, Some(out) if out.as_os_str() == "-") {
        warn!("writing {} documents to stdout", args.files.len());
    }

    let mut failed = 0;
    for file in &args.files {
        match convert_file(parser, file, args, &settings) {
            Ok(target) => info!(input = %file.display(), output = %target, "converted"),
            Err(e) => {
                // One bad document does not stop the rest of the batch.
                failed += 1;
                eprintln!("error: {:#}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) failed to convert", failed, args.files.len());
    }
    Ok(())
}

/// Convert one file and return a description of where it was written.
fn convert_file(
    parser: &DocumentParser,
    path: &Path,
    args: &HtmlArgs,
    settings: &HtmlSettings,
) -> Result<String> {
    let input = read_input(path)?;
    let doc = parse_input(parser, path, &input)?;
    let html = to_html(&doc, settings).context("failed to render HTML")?;

    match output_target(args, path) {
        OutputTarget::Stdout => {
            io::stdout()
                .lock()
                .write_all(html.as_bytes())
                .context("failed to write to stdout")?;
            Ok("-".to_string())
        }
        OutputTarget::File(target) => {
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            fs::write(&target, html)
                .with_context(|| format!("failed to write '{}'", target.display()))?;
            Ok(target.display().to_string())
        }
    }
}

fn output_target(args: &HtmlArgs, input: &Path) -> OutputTarget {
    let html_path = input.with_extension("html");

    match &args.output {
        None => OutputTarget::File(html_path),
        Some(out) if out.as_os_str() == "-" => OutputTarget::Stdout,
        Some(out) if args.files.len() > 1 || out.is_dir() => {
            OutputTarget::File(out.join(html_path.file_name().unwrap_or_default()))
        }
        Some(out) => OutputTarget::File(out.clone()),
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: Option<&'a str>,
    subtitle: Option<&'a str>,
    date: Option<&'a str>,
    author: Option<&'a str>,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
struct JsonLayout {
    align: &'static str,
    wrap: bool,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Paragraph {
        layout: JsonLayout,
        content: Vec<JsonInline<'a>>,
    },
    Block {
        layout: JsonLayout,
        blocks: Vec<JsonBlock<'a>>,
    },
    Quote {
        layout: JsonLayout,
        blocks: Vec<JsonBlock<'a>>,
    },
    Image {
        layout: JsonLayout,
        src: &'a str,
        width: Option<String>,
        height: Option<String>,
        caption: Option<Vec<JsonInline<'a>>>,
    },
    Heading {
        layout: JsonLayout,
        level: u8,
        content: Vec<JsonInline<'a>>,
    },
    HorizontalRule {
        layout: JsonLayout,
    },
    List {
        layout: JsonLayout,
        kind: &'static str,
        items: Vec<JsonBlock<'a>>,
    },
    Table {
        layout: JsonLayout,
        rows: Vec<Vec<JsonTableCell<'a>>>,
    },
    Collapse {
        layout: JsonLayout,
        summary: Vec<JsonInline<'a>>,
        blocks: Vec<JsonBlock<'a>>,
    },
    PageBreak,
}

#[derive(Serialize)]
struct JsonTableCell<'a> {
    header: bool,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline<'a> {
    Text {
        content: &'a str,
    },
    Link {
        dest: &'a str,
        content: Vec<JsonInline<'a>>,
    },
    Formatting {
        style: &'static str,
        content: Vec<JsonInline<'a>>,
    },
    Size {
        size: String,
        content: Vec<JsonInline<'a>>,
    },
    Font {
        family: &'a str,
        content: Vec<JsonInline<'a>>,
    },
    Color {
        fg: Option<String>,
        bg: Option<String>,
        content: Vec<JsonInline<'a>>,
    },
    InlineImage {
        src: &'a str,
        width: Option<String>,
        height: Option<String>,
    },
}

fn print_json(doc: &Document) -> Result<()> {
    let json_doc = convert_document(doc);
    println!("{}", serde_json::to_string_pretty(&json_doc)?);
    Ok(())
}

fn convert_document<'a>(doc: &'a Document) -> JsonDocument<'a> {
    JsonDocument {
        title: doc.title.as_deref(),
        subtitle: doc.subtitle.as_deref(),
        date: doc.date.as_deref(),
        author: doc.author.as_deref(),
        blocks: convert_blocks(&doc.content),
    }
}

fn convert_layout(layout: Layout) -> JsonLayout {
    JsonLayout {
        align: layout.alignment.as_str(),
        wrap: layout.wrap,
    }
}

fn convert_blocks<'a>(blocks: &'a [Block]) -> Vec<JsonBlock<'a>> {
    blocks.iter().map(convert_block).collect()
}

fn convert_inlines<'a>(inlines: &'a [Inline]) -> Vec<JsonInline<'a>> {
    inlines.iter().map(convert_inline).collect()
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Paragraph(p) => JsonBlock::Paragraph {
            layout: convert_layout(p.layout),
            content: convert_inlines(&p.content),
        },
        Block::BasicBlock(b) => JsonBlock::Block {
            layout: convert_layout(b.layout),
            blocks: convert_blocks(&b.content),
        },
        Block::Quote(q) => JsonBlock::Quote {
            layout: convert_layout(q.layout),
            blocks: convert_blocks(&q.content),
        },
        Block::Image(i) => JsonBlock::Image {
            layout: convert_layout(i.layout),
            src: &i.src,
            width: i.width.map(|d| d.to_string()),
            height: i.height.map(|d| d.to_string()),
            caption: i.caption.as_deref().map(convert_inlines),
        },
        Block::Heading(h) => JsonBlock::Heading {
            layout: convert_layout(h.layout),
            level: h.level,
            content: convert_inlines(&h.content),
        },
        Block::HorizontalRule(r) => JsonBlock::HorizontalRule {
            layout: convert_layout(r.layout),
        },
        Block::List(l) => JsonBlock::List {
            layout: convert_layout(l.layout),
            kind: list_kind(l.kind),
            items: convert_blocks(&l.items),
        },
        Block::Table(t) => JsonBlock::Table {
            layout: convert_layout(t.layout),
            rows: t
                .rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| JsonTableCell {
                            header: cell.header,
                            blocks: convert_blocks(&cell.content),
                        })
                        .collect()
                })
                .collect(),
        },
        Block::Collapse(c) => JsonBlock::Collapse {
            layout: convert_layout(c.layout),
            summary: convert_inlines(&c.summary),
            blocks: convert_blocks(&c.content),
        },
        Block::PageBreak(_) => JsonBlock::PageBreak,
    }
}

fn convert_inline<'a>(inline: &'a Inline) -> JsonInline<'a> {
    let color = |c: Option<Color>| c.map(|c| c.to_string());
    let size = |d: Option<Dimension>| d.map(|d| d.to_string());

    match inline {
        Inline::Text(t) => JsonInline::Text {
            content: &t.content,
        },
        Inline::Link(l) => JsonInline::Link {
            dest: &l.destination,
            content: convert_inlines(&l.content),
        },
        Inline::Formatting(f) => JsonInline::Formatting {
            style: f.style.as_str(),
            content: convert_inlines(&f.content),
        },
        Inline::Size(s) => JsonInline::Size {
            size: s.size.to_string(),
            content: convert_inlines(&s.content),
        },
        Inline::Font(f) => JsonInline::Font {
            family: &f.family,
            content: convert_inlines(&f.content),
        },
        Inline::Color(c) => JsonInline::Color {
            fg: color(c.foreground),
            bg: color(c.background),
            content: convert_inlines(&c.content),
        },
        Inline::Image(i) => JsonInline::InlineImage {
            src: &i.src,
            width: size(i.width),
            height: size(i.height),
        },
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_document_summary(doc: &Document) {
    print_metadata(doc, "");

    println!("Blocks: {}", doc.content.len());
    for (i, block) in doc.content.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_block(block));
    }
}

fn print_document_verbose(doc: &Document) {
    println!("=== CDF AST ===");
    println!();
    println!("Span: {}..{}", doc.span.start, doc.span.end);
    println!();

    println!("--- Metadata ---");
    print_metadata(doc, "  ");
    println!();

    println!("--- Blocks ---");
    for (i, block) in doc.content.iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, describe_block(block));
        print_block_verbose(block, 1);
    }
}

fn print_metadata(doc: &Document, prefix: &str) {
    let fields = [
        ("Title", &doc.title),
        ("Subtitle", &doc.subtitle),
        ("Date", &doc.date),
        ("Author", &doc.author),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}{}: {}", prefix, label, value);
        }
    }
}

fn list_kind(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Ordered => "ordered",
        ListKind::Unordered => "unordered",
    }
}

fn describe_block(block: &Block) -> String {
    let description = match block {
        Block::Paragraph(_) => "Paragraph".to_string(),
        Block::BasicBlock(b) => format!("Block ({} children)", b.content.len()),
        Block::Quote(q) => format!("Quote ({} children)", q.content.len()),
        Block::Image(i) => format!("Image (src: {})", i.src),
        Block::Heading(h) => format!("Heading (class {})", h.level),
        Block::HorizontalRule(_) => "HorizontalRule".to_string(),
        Block::List(l) => format!("List ({}, {} items)", list_kind(l.kind), l.items.len()),
        Block::Table(t) => format!("Table ({} rows)", t.rows.len()),
        Block::Collapse(c) => format!("Collapse ({} children)", c.content.len()),
        Block::PageBreak(_) => "PageBreak".to_string(),
    };

    match block.layout() {
        Some(layout) if layout != Layout::default() => format!(
            "{} [align: {}{}]",
            description,
            layout.alignment.as_str(),
            if layout.wrap { ", wrap" } else { "" }
        ),
        _ => description,
    }
}

fn print_block_verbose(block: &Block, indent: usize) {
    let prefix = "  ".repeat(indent);

    let print_children = |blocks: &[Block]| {
        for (i, block) in blocks.iter().enumerate() {
            println!("{}Block {}: {}", prefix, i + 1, describe_block(block));
            print_block_verbose(block, indent + 1);
        }
    };

    match block {
        Block::Paragraph(p) => println!("{}Content: {}", prefix, format_inlines(&p.content)),
        Block::Heading(h) => println!("{}Content: {}", prefix, format_inlines(&h.content)),
        Block::BasicBlock(b) | Block::Quote(b) => print_children(&b.content),
        Block::Image(i) => {
            if let Some(width) = i.width {
                println!("{}Width: {}", prefix, width);
            }
            if let Some(height) = i.height {
                println!("{}Height: {}", prefix, height);
            }
            if let Some(caption) = &i.caption {
                println!("{}Caption: {}", prefix, format_inlines(caption));
            }
        }
        Block::List(l) => print_children(&l.items),
        Block::Table(t) => {
            for (i, row) in t.rows.iter().enumerate() {
                println!("{}Row {}:", prefix, i + 1);
                for (j, cell) in row.cells.iter().enumerate() {
                    let header_marker = if cell.header { " (header)" } else { "" };
                    println!("{}  Cell {}{}:", prefix, j + 1, header_marker);
                    for block in &cell.content {
                        print_block_verbose(block, indent + 2);
                    }
                }
            }
        }
        Block::Collapse(c) => {
            println!("{}Summary: {}", prefix, format_inlines(&c.summary));
            print_children(&c.content);
        }
        Block::HorizontalRule(_) | Block::PageBreak(_) => {}
    }
}

/// Escape the characters that end or split an attribute value.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '|' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render inline nodes back as CDF markup, escaping text.
fn format_inlines(inlines: &[Inline]) -> String {
    let mut result = String::new();
    for inline in inlines {
        let open = match inline {
            Inline::Text(t) => {
                result.push_str(&t.content.replace('\\', "\\\\").replace('[', "\\["));
                continue;
            }
            Inline::Link(l) => format!("link dest={}", escape_value(&l.destination)),
            Inline::Formatting(f) => formatting_tag(f.style).to_string(),
            Inline::Size(s) => format!("size {}={}", s.size.unit.attribute_name(), s.size.value),
            Inline::Font(f) => format!("font family={}", escape_value(&f.family)),
            Inline::Color(c) => {
                let sides = [("fg", c.foreground), ("bg", c.background)];
                let attrs: Vec<String> = sides
                    .iter()
                    .filter_map(|(key, color)| {
                        color.map(|color| format!("{}={}", key, escape_value(&color.to_string())))
                    })
                    .collect();
                format!("color {}", attrs.join("|"))
            }
            Inline::Image(i) => format!("inline-image src={}", escape_value(&i.src)),
        };
        result.push_str("[[");
        result.push_str(&open);
        result.push_str("]]");
        result.push_str(&format_inlines(inline.children()));
        result.push_str("[[/]]");
    }
    result
}

const fn formatting_tag(style: FormattingStyle) -> &'static str {
    match style {
        FormattingStyle::Bold => "b",
        FormattingStyle::Italic => "i",
        FormattingStyle::Strikethrough => "s",
        FormattingStyle::Underline => "u",
        FormattingStyle::Teletype => "t",
    }
}
