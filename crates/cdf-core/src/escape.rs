//! Backslash escape decoding.
//!
//! `\X` decodes to the literal `X` for any character `X`. This is the only
//! escape mechanism in CDF and the only way to write a literal `[[`, `]]`,
//! `|` or `\` inside prose and attribute values.
//!
//! Decoding runs once per raw span, after the scanners have located the
//! span's boundaries (they skip the byte after every `\`). Decoded text must
//! never be decoded again.

use std::borrow::Cow;

use memchr::memchr;

/// Decode every backslash escape in `raw`.
///
/// Borrows when `raw` contains no backslash. A trailing lone `\` is dropped.
///
/// ```rust
/// use cdf_core::escape::decode;
///
/// assert_eq!(decode(r"a\[[b"), "a[[b");
/// assert_eq!(decode(r"\\"), "\\");
/// ```
pub fn decode(raw: &str) -> Cow<'_, str> {
    let Some(first) = memchr(b'\\', raw.as_bytes()) else {
        return Cow::Borrowed(raw);
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);

    let mut chars = raw[first..].chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => break,
            }
        } else {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

/// Remove line breaks from an already decoded value.
///
/// Used for single-line values such as link destinations and image sources.
pub fn strip_newlines(value: Cow<'_, str>) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.replace(['\r', '\n'], ""))
    } else {
        value
    }
}
