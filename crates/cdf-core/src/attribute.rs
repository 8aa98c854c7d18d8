//! Attribute grammar and typed attribute access.
//!
//! An opening tag carries `key=value` pairs separated by `|`:
//!
//! ```text
//! [[image src=cat.png | width-px=120 | has-caption=]]
//! ```
//!
//! Values are unquoted: everything up to an un-escaped `|` or `]]` belongs
//! to the value, and `\` escapes the following character. Node constructors
//! convert the raw map into enums and numbers right away through the
//! accessors on [`OpenTag`].

use std::collections::HashMap;

use crate::ast::{Alignment, CowStr, Dimension, SizeUnit};
use crate::color::Color;
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::escape;
use crate::span::Span;
use crate::tag::OpenTag;

/// Decoded attributes of one tag. Keys are unique; a repeated key keeps
/// the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes<'a> {
    entries: HashMap<&'a str, CowStr<'a>>,
}

impl<'a> Attributes<'a> {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any earlier value for `key`.
    pub fn insert(&mut self, key: &'a str, value: CowStr<'a>) {
        self.entries.insert(key, value);
    }

    /// Look up a decoded value.
    pub fn get(&self, key: &str) -> Option<&CowStr<'a>> {
        self.entries.get(key)
    }

    /// Remove and return a decoded value.
    pub fn take(&mut self, key: &str) -> Option<CowStr<'a>> {
        self.entries.remove(key)
    }

    /// Whether `key` is present (with any value).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no attributes were given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }
}

/// Parse one `name=value` attribute at the cursor.
///
/// Returns the name, the decoded value and whether another attribute
/// follows (`|`) or the tag ended (`]]`). The cursor is left past the
/// terminator.
///
/// # Errors
///
/// - `MalformedTag` if no attribute name is present
/// - `MissingEquals` if the name is not followed by `=`
/// - `InvalidAttributeValue` if the value holds a control character
/// - `UnexpectedEndOfInput` if the buffer ends before `|` or `]]`
pub fn parse_attribute<'a>(cursor: &mut Cursor<'a>) -> Result<(&'a str, CowStr<'a>, bool)> {
    let name = cursor.take_name();
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MalformedTag,
            "expected an attribute name",
            Span::at(cursor.offset()),
        ));
    }

    cursor.skip_whitespace_required()?;
    if cursor.peek() != Some(b'=') {
        return Err(ParseError::new(
            ParseErrorKind::MissingEquals,
            format!("expected '=' after attribute '{}'", name),
            Span::at(cursor.offset()),
        ));
    }
    cursor.advance(1);
    cursor.skip_whitespace_required()?;

    let start = cursor.offset();
    let mut pos = start;
    let (end, more) = loop {
        let hit = cursor
            .find_any(pos, b'\\', b'|', b']')
            .ok_or_else(|| ParseError::unexpected_eof(cursor.input().len()))?;
        match cursor.byte_at(hit) {
            Some(b'\\') => pos = hit + 2,
            Some(b'|') => break (hit, true),
            _ => match cursor.byte_at(hit + 1) {
                Some(b']') => break (hit, false),
                Some(_) => pos = hit + 1,
                None => return Err(ParseError::unexpected_eof(cursor.input().len())),
            },
        }
    };

    let raw = cursor.slice(start, end);
    if let Some(bad) = raw
        .bytes()
        .position(|b| b.is_ascii_control() && !matches!(b, b'\t' | b'\n' | b'\r'))
    {
        return Err(ParseError::new(
            ParseErrorKind::InvalidAttributeValue,
            format!("control character in value of attribute '{}'", name),
            Span::at(start + bad),
        ));
    }

    cursor.seek(if more { end + 1 } else { end + 2 });
    Ok((name, escape::decode(raw), more))
}

impl<'a> OpenTag<'a> {
    /// Look up a decoded attribute value.
    pub fn get(&self, key: &str) -> Option<&CowStr<'a>> {
        self.attributes.get(key)
    }

    /// Presence-only flag such as `wrap` or `ordered`.
    pub fn flag(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    /// A value the tag cannot do without.
    pub fn required(&self, key: &str) -> Result<CowStr<'a>> {
        self.attributes
            .get(key)
            .cloned()
            .ok_or_else(|| ParseError::missing_attribute(self.name, key, self.span))
    }

    /// The `align` attribute; absent and `none` are the same.
    pub fn alignment(&self) -> Result<Alignment> {
        match self.get("align").map(|v| v.trim()) {
            None | Some("none") => Ok(Alignment::None),
            Some("left") => Ok(Alignment::Left),
            Some("right") => Ok(Alignment::Right),
            Some("center") => Ok(Alignment::Center),
            Some(other) => Err(ParseError::new(
                ParseErrorKind::InvalidAlignment,
                format!(
                    "invalid alignment '{}' (expected none, left, right or center)",
                    other
                ),
                self.span,
            )),
        }
    }

    /// Heading class `c`, `1` through `5`.
    pub fn heading_level(&self) -> Result<u8> {
        let class = self.required("c")?;
        match class.trim() {
            "1" => Ok(1),
            "2" => Ok(2),
            "3" => Ok(3),
            "4" => Ok(4),
            "5" => Ok(5),
            other => Err(ParseError::new(
                ParseErrorKind::InvalidHeadingClass,
                format!("'h' tag expects a class from 1 to 5, found '{}'", other),
                self.span,
            )),
        }
    }

    /// Size of one image axis from `{axis}-percent`, `{axis}-px`, ...
    ///
    /// At most one unit may be given per axis.
    pub fn dimension(&self, axis: &str) -> Result<Option<Dimension>> {
        let mut found: Option<(String, &CowStr<'a>, SizeUnit)> = None;
        for unit in SizeUnit::ALL {
            let key = format!("{}-{}", axis, unit.attribute_name());
            let Some(value) = self.get(&key) else {
                continue;
            };
            if let Some((previous, _, _)) = &found {
                return Err(ParseError::new(
                    ParseErrorKind::ConflictingSizeAttributes,
                    format!("both '{}' and '{}' given on '{}' tag", previous, key, self.name),
                    self.span,
                ));
            }
            found = Some((key, value, unit));
        }

        found
            .map(|(key, value, unit)| {
                parse_number(&key, value, self.span).map(|v| Dimension::new(v, unit))
            })
            .transpose()
    }

    /// Size of a `size` tag: exactly one unit attribute.
    pub fn size(&self) -> Result<Dimension> {
        let invalid = || {
            ParseError::new(
                ParseErrorKind::InvalidSizeAttribute,
                "'size' tag expects exactly one of 'percent', 'px', 'pt', 'cm', 'mm'",
                self.span,
            )
        };
        if self.attributes.len() != 1 {
            return Err(invalid());
        }
        SizeUnit::ALL
            .into_iter()
            .find_map(|unit| {
                let key = unit.attribute_name();
                self.get(key).map(|value| {
                    parse_number(key, value, self.span).map(|v| Dimension::new(v, unit))
                })
            })
            .unwrap_or_else(|| Err(invalid()))
    }

    /// Foreground and background of a `color` tag.
    pub fn colors(&self) -> Result<(Option<Color>, Option<Color>)> {
        let invalid = |message: String| {
            ParseError::new(ParseErrorKind::InvalidColorAttribute, message, self.span)
        };
        if self.attributes.is_empty() {
            return Err(invalid(
                "'color' tag expects an 'fg' or 'bg' attribute".to_string(),
            ));
        }
        if let Some(key) = self.attributes.keys().find(|k| !matches!(*k, "fg" | "bg")) {
            return Err(invalid(format!(
                "'color' tag accepts only 'fg' and 'bg', found '{}'",
                key
            )));
        }

        let parse = |key: &str| -> Result<Option<Color>> {
            self.get(key)
                .map(|value| value.parse::<Color>().map_err(|e| invalid(e.to_string())))
                .transpose()
        };
        Ok((parse("fg")?, parse("bg")?))
    }
}

/// Parse a finite number, ignoring surrounding whitespace.
fn parse_number(key: &str, value: &str, span: Span) -> Result<f32> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::invalid_number(key, value, span)),
    }
}
