//! Integration tests for the CDF parser

use cdf_core::ast::{Alignment, Dimension, FormattingStyle, ListKind, SizeUnit};
use cdf_core::color::Color;
use cdf_core::{Block, Inline, ParseErrorKind, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse(input: &str) -> cdf_core::Document<'_> {
    Parser::new().parse(input).unwrap()
}

fn parse_err(input: &str) -> ParseErrorKind {
    Parser::new().parse(input).unwrap_err().kind
}

/// Wrap prose in a document with one paragraph and return its inlines.
fn paragraph_inlines(prose: &str) -> Vec<Inline<'static>> {
    let input = format!("[[cdf]][[p]]{}[[/]][[/]]", prose);
    let input: &'static str = Box::leak(input.into_boxed_str());
    match Parser::new().parse(input).unwrap().content.into_iter().next() {
        Some(Block::Paragraph(p)) => p.content,
        other => panic!("Expected paragraph, got {:?}", other),
    }
}

fn text_of<'a>(inline: &'a Inline<'_>) -> &'a str {
    match inline {
        Inline::Text(t) => t.content.as_ref(),
        other => panic!("Expected text, got {:?}", other),
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_document_title_and_paragraph() {
    let doc = parse("[[cdf title=Hi]][[p]]hello[[/]][[/]]");

    assert_eq!(doc.title.as_deref(), Some("Hi"));
    assert_eq!(doc.subtitle, None);
    assert_eq!(doc.content.len(), 1);
    if let Block::Paragraph(p) = &doc.content[0] {
        assert_eq!(p.content.len(), 1);
        assert_eq!(text_of(&p.content[0]), "hello");
    } else {
        panic!("Expected paragraph");
    }
}

#[test]
fn test_escaped_bracket_is_text() {
    let inlines = paragraph_inlines(r"a\[[b");
    assert_eq!(inlines.len(), 1);
    assert_eq!(text_of(&inlines[0]), "a[[b");
}

#[test]
fn test_hyperlink() {
    let inlines = paragraph_inlines("[[link dest=http://x]]go[[/]]");
    assert_eq!(inlines.len(), 1);
    if let Inline::Link(link) = &inlines[0] {
        assert_eq!(link.destination.as_ref(), "http://x");
        assert_eq!(link.content.len(), 1);
        assert_eq!(text_of(&link.content[0]), "go");
    } else {
        panic!("Expected link");
    }
}

#[test]
fn test_heading_class_out_of_range() {
    assert_eq!(
        parse_err("[[cdf]][[h c=9]]Title[[/]][[/]]"),
        ParseErrorKind::InvalidHeadingClass
    );
}

#[test]
fn test_row_containing_paragraph() {
    assert_eq!(
        parse_err("[[cdf]][[table]][[row]][[p]]x[[/]][[/]][[/]][[/]]"),
        ParseErrorKind::InvalidTableStructure
    );
}

#[test]
fn test_size_in_paragraph() {
    let inlines = paragraph_inlines("[[size px=12]]big[[/]]");
    if let Inline::Size(size) = &inlines[0] {
        assert_eq!(size.size, Dimension::new(12.0, SizeUnit::Pixel));
        assert_eq!(text_of(&size.content[0]), "big");
    } else {
        panic!("Expected size");
    }
}

// ============================================================================
// Document Envelope Tests
// ============================================================================

#[test]
fn test_document_metadata() {
    let doc = parse(
        "[[cdf title=Report | subtitle=Q3 | date=2024-01-01 | author=Ada Lovelace]]\n[[/]]",
    );
    assert_eq!(doc.title.as_deref(), Some("Report "));
    assert_eq!(doc.subtitle.as_deref(), Some("Q3 "));
    assert_eq!(doc.date.as_deref(), Some("2024-01-01 "));
    assert_eq!(doc.author.as_deref(), Some("Ada Lovelace"));
    assert!(doc.content.is_empty());
}

#[test]
fn test_document_surrounding_whitespace() {
    let doc = parse("\n\n  [[cdf]]\n  [[p]]x[[/]]\n[[/]]\n\n");
    assert_eq!(doc.content.len(), 1);
}

#[test]
fn test_document_span_covers_input() {
    let input = "[[cdf]][[/]]";
    let doc = parse(input);
    assert_eq!(doc.span.start, 0);
    assert_eq!(doc.span.end as usize, input.len());
}

#[rstest]
#[case("", ParseErrorKind::UnexpectedEndOfInput)]
#[case("   \n", ParseErrorKind::UnexpectedEndOfInput)]
#[case("[[p]]x[[/]]", ParseErrorKind::MissingDocumentTag)]
#[case("[[/]]", ParseErrorKind::MismatchedClosingTag)]
#[case("[[cdf]][[/]][[/]]", ParseErrorKind::MismatchedClosingTag)]
#[case("[[cdf]][[/]] trailing", ParseErrorKind::TrailingContent)]
#[case("[[cdf]][[/]][[p]]x[[/]]", ParseErrorKind::TrailingContent)]
#[case("hello", ParseErrorKind::MalformedTag)]
#[case("[[cdf]]", ParseErrorKind::UnexpectedEndOfInput)]
#[case("[[cdf]][[p]]unterminated", ParseErrorKind::UnexpectedEndOfInput)]
fn test_document_envelope_errors(#[case] input: &str, #[case] expected: ParseErrorKind) {
    assert_eq!(parse_err(input), expected);
}

#[rstest]
#[case("[[cdf]][[p align]]x[[/]][[/]]", ParseErrorKind::MissingEquals)]
#[case("[[cdf title=a\u{0}b]][[/]]", ParseErrorKind::InvalidAttributeValue)]
#[case("[[cdf]][[p =left]]x[[/]][[/]]", ParseErrorKind::MalformedTag)]
#[case("[[cdf]][[p]]x[[/]", ParseErrorKind::UnexpectedEndOfInput)]
fn test_attribute_grammar_errors(#[case] input: &str, #[case] expected: ParseErrorKind) {
    assert_eq!(parse_err(input), expected);
}

#[test]
fn test_text_between_blocks_is_malformed() {
    assert_eq!(
        parse_err("[[cdf]][[p]]a[[/]] stray [[/]]"),
        ParseErrorKind::MalformedTag
    );
}

// ============================================================================
// Block Tests
// ============================================================================

#[rstest]
#[case("", Alignment::None)]
#[case(" align=none", Alignment::None)]
#[case(" align=left", Alignment::Left)]
#[case(" align=right", Alignment::Right)]
#[case(" align=center", Alignment::Center)]
fn test_paragraph_alignment(#[case] attrs: &str, #[case] expected: Alignment) {
    let input = format!("[[cdf]][[p{}]]x[[/]][[/]]", attrs);
    let doc = Parser::new().parse(&input).unwrap();
    let layout = doc.content[0].layout().unwrap();
    assert_eq!(layout.alignment, expected);
    assert!(!layout.wrap);
}

#[test]
fn test_invalid_alignment() {
    assert_eq!(
        parse_err("[[cdf]][[p align=justify]]x[[/]][[/]]"),
        ParseErrorKind::InvalidAlignment
    );
}

#[test]
fn test_invalid_alignment_on_break() {
    assert_eq!(
        parse_err("[[cdf]][[break align=up]][[/]][[/]]"),
        ParseErrorKind::InvalidAlignment
    );
}

#[test]
fn test_wrap_flag() {
    let doc = parse("[[cdf]][[quote align=right | wrap=]][[p]]q[[/]][[/]][[/]]");
    let layout = doc.content[0].layout().unwrap();
    assert_eq!(layout.alignment, Alignment::Right);
    assert!(layout.wrap);
}

#[test]
fn test_basic_block_and_quote_nest_blocks() {
    let doc = parse("[[cdf]][[block]][[quote]][[p]]deep[[/]][[/]][[p]]side[[/]][[/]][[/]]");

    let Block::BasicBlock(outer) = &doc.content[0] else {
        panic!("Expected basic block");
    };
    assert_eq!(outer.content.len(), 2);
    let Block::Quote(quote) = &outer.content[0] else {
        panic!("Expected quote");
    };
    assert!(matches!(&quote.content[0], Block::Paragraph(_)));
    assert!(matches!(&outer.content[1], Block::Paragraph(_)));
}

#[rstest]
#[case("1", 1)]
#[case("2", 2)]
#[case("3", 3)]
#[case("4", 4)]
#[case("5", 5)]
fn test_heading_levels(#[case] class: &str, #[case] level: u8) {
    let input = format!("[[cdf]][[h c={}]]Title[[/]][[/]]", class);
    let doc = Parser::new().parse(&input).unwrap();
    if let Block::Heading(h) = &doc.content[0] {
        assert_eq!(h.level, level);
        assert_eq!(text_of(&h.content[0]), "Title");
    } else {
        panic!("Expected heading");
    }
}

#[test]
fn test_heading_without_class() {
    assert_eq!(
        parse_err("[[cdf]][[h]]Title[[/]][[/]]"),
        ParseErrorKind::MissingRequiredAttribute
    );
}

#[test]
fn test_heading_class_zero() {
    assert_eq!(
        parse_err("[[cdf]][[h c=0]]Title[[/]][[/]]"),
        ParseErrorKind::InvalidHeadingClass
    );
}

#[test]
fn test_horizontal_rule_discards_content() {
    let doc = parse("[[cdf]][[hr]]ignored [[b]]too[[/]][[/]][[p]]after[[/]][[/]]");
    assert_eq!(doc.content.len(), 2);
    assert!(matches!(&doc.content[0], Block::HorizontalRule(_)));
    assert!(matches!(&doc.content[1], Block::Paragraph(_)));
}

#[test]
fn test_page_break() {
    let doc = parse("[[cdf]][[break]][[/]][[/]]");
    assert!(matches!(&doc.content[0], Block::PageBreak(_)));
    assert_eq!(doc.content[0].layout(), None);
}

#[test]
fn test_unordered_list() {
    let doc = parse("[[cdf]][[list]][[p]]one[[/]][[p]]two[[/]][[/]][[/]]");
    if let Block::List(list) = &doc.content[0] {
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(list.items.len(), 2);
    } else {
        panic!("Expected list");
    }
}

#[test]
fn test_ordered_nested_list() {
    let doc = parse(
        "[[cdf]][[list ordered=]][[p]]one[[/]][[list]][[p]]inner[[/]][[/]][[/]][[/]]",
    );
    if let Block::List(list) = &doc.content[0] {
        assert_eq!(list.kind, ListKind::Ordered);
        assert_eq!(list.items.len(), 2);
        assert!(matches!(&list.items[1], Block::List(inner) if inner.kind == ListKind::Unordered));
    } else {
        panic!("Expected list");
    }
}

#[test]
fn test_image_with_caption_and_size() {
    let doc = parse(
        "[[cdf]][[image src=cat.png|width-px=120|height-percent=50|has-caption=]]A [[i]]cat[[/]][[/]][[/]]",
    );
    if let Block::Image(image) = &doc.content[0] {
        assert_eq!(image.src.as_ref(), "cat.png");
        assert_eq!(image.width, Some(Dimension::new(120.0, SizeUnit::Pixel)));
        assert_eq!(image.height, Some(Dimension::new(50.0, SizeUnit::Percent)));
        let caption = image.caption.as_ref().unwrap();
        assert_eq!(caption.len(), 2);
        assert_eq!(text_of(&caption[0]), "A ");
    } else {
        panic!("Expected image");
    }
}

#[test]
fn test_image_without_caption_flag_drops_content() {
    let doc = parse("[[cdf]][[image src=a.png]]not shown[[/]][[/]]");
    if let Block::Image(image) = &doc.content[0] {
        assert_eq!(image.caption, None);
        assert_eq!(image.width, None);
        assert_eq!(image.height, None);
    } else {
        panic!("Expected image");
    }
}

#[test]
fn test_image_src_newlines_removed() {
    let doc = parse("[[cdf]][[image src=long/\npath.png]][[/]][[/]]");
    if let Block::Image(image) = &doc.content[0] {
        assert_eq!(image.src.as_ref(), "long/path.png");
    } else {
        panic!("Expected image");
    }
}

#[test]
fn test_image_without_src() {
    assert_eq!(
        parse_err("[[cdf]][[image width-px=3]][[/]][[/]]"),
        ParseErrorKind::MissingRequiredAttribute
    );
}

#[test]
fn test_image_conflicting_widths() {
    assert_eq!(
        parse_err("[[cdf]][[image src=a | width-px=3 | width-cm=2]][[/]][[/]]"),
        ParseErrorKind::ConflictingSizeAttributes
    );
}

#[test]
fn test_image_bad_number() {
    assert_eq!(
        parse_err("[[cdf]][[image src=a | height-mm=tall]][[/]][[/]]"),
        ParseErrorKind::InvalidNumericLiteral
    );
}

#[test]
fn test_table() {
    let doc = parse(
        "[[cdf]][[table]]
            [[row]][[cell is-header=]][[p]]Name[[/]][[/]][[cell is-header=]][[p]]Age[[/]][[/]][[/]]
            [[row]][[cell]][[p]]Ada[[/]][[/]][[cell]][[p]]36[[/]][[/]][[/]]
        [[/]][[/]]",
    );
    if let Block::Table(table) = &doc.content[0] {
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].cells.iter().all(|c| c.header));
        assert!(table.rows[1].cells.iter().all(|c| !c.header));
        assert_eq!(table.rows[1].cells[0].content.len(), 1);
    } else {
        panic!("Expected table");
    }
}

#[test]
fn test_table_with_direct_cell() {
    assert_eq!(
        parse_err("[[cdf]][[table]][[cell]][[/]][[/]][[/]]"),
        ParseErrorKind::InvalidTableStructure
    );
}

#[test]
fn test_collapse() {
    let doc = parse(
        "[[cdf]][[collapse]][[summary]]More [[b]]info[[/]][[/]][[content]][[p]]hidden[[/]][[/]][[/]][[/]]",
    );
    if let Block::Collapse(collapse) = &doc.content[0] {
        assert_eq!(collapse.summary.len(), 2);
        assert_eq!(collapse.content.len(), 1);
    } else {
        panic!("Expected collapse");
    }
}

#[rstest]
#[case("[[collapse]][[content]][[/]][[summary]]s[[/]][[/]]")]
#[case("[[collapse]][[/]]")]
#[case("[[collapse]][[summary]]s[[/]][[/]]")]
#[case("[[collapse]][[summary]]s[[/]][[content]][[/]][[p]]extra[[/]][[/]]")]
fn test_collapse_structure_errors(#[case] body: &str) {
    let input = format!("[[cdf]]{}[[/]]", body);
    assert_eq!(
        Parser::new().parse(&input).unwrap_err().kind,
        ParseErrorKind::InvalidCollapseStructure
    );
}

#[test]
fn test_unknown_block_tag() {
    assert_eq!(
        parse_err("[[cdf]][[section]][[/]][[/]]"),
        ParseErrorKind::UnknownBlockTag
    );
}

#[test]
fn test_inline_tag_at_block_level() {
    assert_eq!(
        parse_err("[[cdf]][[b]]x[[/]][[/]]"),
        ParseErrorKind::UnknownBlockTag
    );
}

// ============================================================================
// Inline Tests
// ============================================================================

#[rstest]
#[case("b", FormattingStyle::Bold)]
#[case("i", FormattingStyle::Italic)]
#[case("s", FormattingStyle::Strikethrough)]
#[case("u", FormattingStyle::Underline)]
#[case("t", FormattingStyle::Teletype)]
fn test_formatting_styles(#[case] tag: &str, #[case] style: FormattingStyle) {
    let inlines = paragraph_inlines(&format!("x[[{}]]y[[/]]z", tag));
    assert_eq!(inlines.len(), 3);
    assert_eq!(text_of(&inlines[0]), "x");
    match &inlines[1] {
        Inline::Formatting(f) => {
            assert_eq!(f.style, style);
            assert_eq!(text_of(&f.content[0]), "y");
        }
        other => panic!("Expected formatting, got {:?}", other),
    }
    assert_eq!(text_of(&inlines[2]), "z");
}

#[test]
fn test_nested_inline() {
    let inlines = paragraph_inlines("[[b]]bold [[i]]and italic[[/]][[/]]");
    let Inline::Formatting(bold) = &inlines[0] else {
        panic!("Expected bold");
    };
    assert_eq!(bold.content.len(), 2);
    assert!(matches!(&bold.content[1], Inline::Formatting(i) if i.style == FormattingStyle::Italic));
}

#[test]
fn test_empty_formatting() {
    let inlines = paragraph_inlines("[[b]][[/]]");
    assert!(matches!(&inlines[0], Inline::Formatting(f) if f.content.is_empty()));
}

#[test]
fn test_empty_paragraph() {
    let doc = parse("[[cdf]][[p]][[/]][[/]]");
    assert!(matches!(&doc.content[0], Block::Paragraph(p) if p.content.is_empty()));
}

#[test]
fn test_single_bracket_is_text() {
    let inlines = paragraph_inlines("a [b] c]]");
    assert_eq!(inlines.len(), 1);
    assert_eq!(text_of(&inlines[0]), "a [b] c]]");
}

#[test]
fn test_escaped_backslash_before_tag() {
    let inlines = paragraph_inlines(r"a\\[[b]]x[[/]]");
    assert_eq!(inlines.len(), 2);
    assert_eq!(text_of(&inlines[0]), "a\\");
    assert!(matches!(&inlines[1], Inline::Formatting(_)));
}

#[test]
fn test_text_preserves_whitespace() {
    let inlines = paragraph_inlines("  line one\nline two  ");
    assert_eq!(text_of(&inlines[0]), "  line one\nline two  ");
}

#[test]
fn test_link_requires_dest() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[link]]go[[/]][[/]][[/]]"),
        ParseErrorKind::MissingRequiredAttribute
    );
}

#[test]
fn test_link_dest_with_escapes() {
    let inlines = paragraph_inlines(r"[[link dest=http://x/?a=1\|b=2\]\]]]go[[/]]");
    if let Inline::Link(link) = &inlines[0] {
        assert_eq!(link.destination.as_ref(), "http://x/?a=1|b=2]]");
    } else {
        panic!("Expected link");
    }
}

#[rstest]
#[case("percent=150", 150.0, SizeUnit::Percent)]
#[case("px=12", 12.0, SizeUnit::Pixel)]
#[case("pt=10.5", 10.5, SizeUnit::Point)]
#[case("cm=2", 2.0, SizeUnit::Centimeter)]
#[case("mm= 7 ", 7.0, SizeUnit::Millimeter)]
fn test_size_units(#[case] attr: &str, #[case] value: f32, #[case] unit: SizeUnit) {
    let inlines = paragraph_inlines(&format!("[[size {}]]x[[/]]", attr));
    match &inlines[0] {
        Inline::Size(s) => assert_eq!(s.size, Dimension::new(value, unit)),
        other => panic!("Expected size, got {:?}", other),
    }
}

#[rstest]
#[case("[[size]]x[[/]]", ParseErrorKind::InvalidSizeAttribute)]
#[case("[[size em=2]]x[[/]]", ParseErrorKind::InvalidSizeAttribute)]
#[case("[[size px=2|pt=3]]x[[/]]", ParseErrorKind::InvalidSizeAttribute)]
#[case("[[size px=big]]x[[/]]", ParseErrorKind::InvalidNumericLiteral)]
#[case("[[size px=inf]]x[[/]]", ParseErrorKind::InvalidNumericLiteral)]
fn test_size_errors(#[case] prose: &str, #[case] expected: ParseErrorKind) {
    let input = format!("[[cdf]][[p]]{}[[/]][[/]]", prose);
    assert_eq!(Parser::new().parse(&input).unwrap_err().kind, expected);
}

#[test]
fn test_font() {
    let inlines = paragraph_inlines("[[font family=Fira Code]]code[[/]]");
    match &inlines[0] {
        Inline::Font(f) => assert_eq!(f.family.as_ref(), "Fira Code"),
        other => panic!("Expected font, got {:?}", other),
    }
}

#[test]
fn test_font_requires_family() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[font name=x]]a[[/]][[/]][[/]]"),
        ParseErrorKind::MissingRequiredAttribute
    );
}

#[test]
fn test_color_foreground_and_background() {
    let inlines = paragraph_inlines("[[color fg=#ff0000|bg=rgba(0, 0, 255, 0.5)]]hot[[/]]");
    match &inlines[0] {
        Inline::Color(c) => {
            assert_eq!(c.foreground, Some(Color::rgb(255, 0, 0)));
            assert_eq!(c.background, Some(Color::rgba(0, 0, 255, 0.5)));
        }
        other => panic!("Expected color, got {:?}", other),
    }
}

#[test]
fn test_color_background_only() {
    let inlines = paragraph_inlines("[[color bg=navy]]x[[/]]");
    match &inlines[0] {
        Inline::Color(c) => {
            assert_eq!(c.foreground, None);
            assert_eq!(c.background, Some(Color::rgb(0, 0, 128)));
        }
        other => panic!("Expected color, got {:?}", other),
    }
}

#[test]
fn test_color_hue_and_percentage_literals() {
    let inlines = paragraph_inlines("[[color fg=hsl(0,100%,50%)|bg=hsla(120, 50%, 50%, 0.5)]]x[[/]]");
    match &inlines[0] {
        Inline::Color(c) => {
            assert_eq!(c.foreground, Some(Color::rgb(255, 0, 0)));
            assert_eq!(c.background, Some(Color::rgba(64, 191, 64, 0.5)));
        }
        other => panic!("Expected color, got {:?}", other),
    }

    let inlines = paragraph_inlines("[[color fg=rgb(100%,0%,0%)]]x[[/]]");
    assert!(matches!(
        &inlines[0],
        Inline::Color(c) if c.foreground == Some(Color::rgb(255, 0, 0))
    ));
}

#[rstest]
#[case("[[color]]x[[/]]")]
#[case("[[color size=2]]x[[/]]")]
#[case("[[color fg=red|extra=1]]x[[/]]")]
#[case("[[color fg=notacolor]]x[[/]]")]
#[case("[[color fg=hsl(0, 100, 50)]]x[[/]]")]
fn test_color_errors(#[case] prose: &str) {
    let input = format!("[[cdf]][[p]]{}[[/]][[/]]", prose);
    assert_eq!(
        Parser::new().parse(&input).unwrap_err().kind,
        ParseErrorKind::InvalidColorAttribute
    );
}

#[test]
fn test_inline_image() {
    let inlines = paragraph_inlines("see [[inline-image src=icon.png|width-pt=12]][[/]] here");
    assert_eq!(inlines.len(), 3);
    match &inlines[1] {
        Inline::Image(image) => {
            assert_eq!(image.src.as_ref(), "icon.png");
            assert_eq!(image.width, Some(Dimension::new(12.0, SizeUnit::Point)));
            assert_eq!(image.height, None);
        }
        other => panic!("Expected inline image, got {:?}", other),
    }
}

#[test]
fn test_inline_image_requires_src() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[inline-image]][[/]][[/]][[/]]"),
        ParseErrorKind::MissingRequiredAttribute
    );
}

#[test]
fn test_unknown_inline_tag() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[blink]]x[[/]][[/]][[/]]"),
        ParseErrorKind::UnknownInlineTag
    );
}

#[test]
fn test_block_tag_in_prose() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[p]]x[[/]][[/]][[/]]"),
        ParseErrorKind::UnknownInlineTag
    );
}

// ============================================================================
// Structural Invariants
// ============================================================================

#[test]
fn test_unclosed_inline_tag() {
    assert_eq!(
        parse_err("[[cdf]][[p]][[b]]never closed"),
        ParseErrorKind::UnexpectedEndOfInput
    );
}

#[test]
fn test_unclosed_block() {
    assert_eq!(
        parse_err("[[cdf]][[quote]][[p]]x[[/]]"),
        ParseErrorKind::UnexpectedEndOfInput
    );
}

#[test]
fn test_block_spans_cover_closing_tag() {
    let input = "[[cdf]][[p]]hi[[/]][[hr]][[/]][[/]]";
    let doc = parse(input);
    let first = doc.content[0].span();
    assert_eq!(&input[first.start as usize..first.end as usize], "[[p]]hi[[/]]");
    let second = doc.content[1].span();
    assert_eq!(&input[second.start as usize..second.end as usize], "[[hr]][[/]]");
}

#[test]
fn test_inline_spans() {
    let input = "[[cdf]][[p]]ab[[b]]cd[[/]][[/]][[/]]";
    let doc = parse(input);
    let Block::Paragraph(p) = &doc.content[0] else {
        panic!("Expected paragraph");
    };
    let text = p.content[0].span();
    assert_eq!(&input[text.start as usize..text.end as usize], "ab");
    let bold = p.content[1].span();
    assert_eq!(&input[bold.start as usize..bold.end as usize], "[[b]]cd[[/]]");
}

#[test]
fn test_error_offset_points_at_failure() {
    let input = "[[cdf]][[p]]ok[[/]][[zz]][[/]][[/]]";
    let err = Parser::new().parse(input).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownBlockTag);
    assert_eq!(err.offset() as usize, input.find("[[zz]]").unwrap());
    assert!(err.to_string().contains("'zz'"));
}

#[test]
fn test_nesting_limit() {
    let depth = 50;
    let input = format!(
        "[[cdf]]{}[[p]]x[[/]]{}[[/]]",
        "[[block]]".repeat(depth),
        "[[/]]".repeat(depth)
    );

    assert!(Parser::new().parse(&input).is_ok());
    assert_eq!(
        Parser::new()
            .with_max_depth(Some(10))
            .parse(&input)
            .unwrap_err()
            .kind,
        ParseErrorKind::NestingTooDeep
    );
    assert!(Parser::new().with_max_depth(None).parse(&input).is_ok());
}

#[test]
fn test_input_length_limit() {
    use cdf_core::parser::check_input_len;
    use cdf_core::span::MAX_INPUT_LEN;

    assert!(check_input_len(0).is_ok());
    assert!(check_input_len(MAX_INPUT_LEN).is_ok());
    if let Some(too_long) = MAX_INPUT_LEN.checked_add(1) {
        let err = check_input_len(too_long).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InputTooLarge);
        assert_eq!(err.offset(), 0);
    }
}

#[test]
fn test_nesting_limit_counts_inline_tags() {
    let input = format!(
        "[[cdf]][[p]]{}x{}[[/]][[/]]",
        "[[b]]".repeat(5),
        "[[/]]".repeat(5)
    );
    assert!(Parser::new().with_max_depth(Some(7)).parse(&input).is_ok());
    assert_eq!(
        Parser::new()
            .with_max_depth(Some(6))
            .parse(&input)
            .unwrap_err()
            .kind,
        ParseErrorKind::NestingTooDeep
    );
}

#[test]
fn test_fresh_parses_are_identical() {
    let input = "[[cdf title=T]][[list]][[p]][[b]]a[[/]][[/]][[/]][[collapse]][[summary]]s[[/]][[content]][[/]][[/]][[/]]";
    let parser = Parser::new();
    assert_eq!(parser.parse(input).unwrap(), parser.parse(input).unwrap());
    assert_eq!(parser.parse(input).unwrap(), Parser::default().parse(input).unwrap());
}

#[test]
fn test_unescaped_text_borrows_input() {
    let doc = parse("[[cdf]][[p]]plain[[/]][[/]]");
    let Block::Paragraph(p) = &doc.content[0] else {
        panic!("Expected paragraph");
    };
    assert!(matches!(&p.content[0], Inline::Text(t) if matches!(t.content, std::borrow::Cow::Borrowed(_))));
}
