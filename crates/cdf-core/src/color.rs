//! CSS-like color literals for `color` tags.
//!
//! Supports:
//! - RGB hex: `#fff`, `#ffff`, `#ff0000`, `#ff000080`
//! - Functional: `rgb(255, 0, 0)`, `rgb(100%, 0%, 0%)`, `rgba(255, 0, 0, 0.5)`
//! - Hue based: `hsl(120, 50%, 50%)`, `hsla(120, 50%, 50%, 0.5)`
//! - Named colors: the basic CSS palette (`red`, `navy`, `transparent`, ...)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

/// Error returned when a color literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color literal '{0}'")]
pub struct ColorParseError(pub String);

impl Color {
    /// Opaque color from its channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Color from its channels and an opacity.
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl fmt::Display for Color {
    /// Opaque colors print as `#rrggbb`, translucent ones as `rgba(...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            write!(
                f,
                "rgba({},{},{},{})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let lower = literal.trim().to_ascii_lowercase();
        let invalid = || ColorParseError(literal.to_string());

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&lower, "rgba") {
            return parse_channels(args, true).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&lower, "rgb") {
            return parse_channels(args, false).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&lower, "hsla") {
            return parse_hsl(args, true).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&lower, "hsl") {
            return parse_hsl(args, false).ok_or_else(invalid);
        }
        named(&lower).ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(Color::rgba(
            short(0)?,
            short(1)?,
            short(2)?,
            f32::from(short(3)?) / 255.0,
        )),
        6 => Some(Color::rgb(long(0)?, long(2)?, long(4)?)),
        8 => Some(Color::rgba(
            long(0)?,
            long(2)?,
            long(4)?,
            f32::from(long(6)?) / 255.0,
        )),
        _ => None,
    }
}

/// Argument text of `name(...)`, if `literal` has that shape.
fn function_args<'s>(literal: &'s str, name: &str) -> Option<&'s str> {
    literal
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Split `args` on commas, requiring three parts plus one for alpha.
fn split_args(args: &str, with_alpha: bool) -> Option<Vec<&str>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    (parts.len() == expected).then_some(parts)
}

fn parse_channels(args: &str, with_alpha: bool) -> Option<Color> {
    let parts = split_args(args, with_alpha)?;
    let red = channel(parts[0])?;
    let green = channel(parts[1])?;
    let blue = channel(parts[2])?;
    let alpha = if with_alpha { alpha(parts[3])? } else { 1.0 };

    Some(Color::rgba(red, green, blue, alpha))
}

fn parse_hsl(args: &str, with_alpha: bool) -> Option<Color> {
    let parts = split_args(args, with_alpha)?;
    let hue = parts[0].strip_suffix("deg").unwrap_or(parts[0]).trim();
    let hue = hue.parse::<f32>().ok().filter(|h| h.is_finite())?;
    let saturation = percentage(parts[1])?;
    let lightness = percentage(parts[2])?;
    let alpha = if with_alpha { alpha(parts[3])? } else { 1.0 };

    let (red, green, blue) = hsl_to_rgb(hue.rem_euclid(360.0), saturation, lightness);
    Some(Color::rgba(red, green, blue, alpha))
}

/// An RGB channel: an integer `0..=255` or a percentage of 255.
fn channel(part: &str) -> Option<u8> {
    if part.ends_with('%') {
        return percentage(part).map(unit_to_byte);
    }
    part.parse::<u8>().ok()
}

/// `N%` with `N` in `0..=100`, as a fraction.
fn percentage(part: &str) -> Option<f32> {
    let value = part.strip_suffix('%')?.trim().parse::<f32>().ok()?;
    (0.0..=100.0).contains(&value).then(|| value / 100.0)
}

fn alpha(part: &str) -> Option<f32> {
    let alpha = part.parse::<f32>().ok()?;
    (0.0..=1.0).contains(&alpha).then_some(alpha)
}

fn unit_to_byte(value: f32) -> u8 {
    (value * 255.0).round() as u8
}

/// Convert hue in degrees `[0, 360)` and fractional saturation/lightness.
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (unit_to_byte(r + m), unit_to_byte(g + m), unit_to_byte(b + m))
}

fn named(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "lime" => Color::rgb(0, 255, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "silver" => Color::rgb(192, 192, 192),
        "maroon" => Color::rgb(128, 0, 0),
        "olive" => Color::rgb(128, 128, 0),
        "teal" => Color::rgb(0, 128, 128),
        "navy" => Color::rgb(0, 0, 128),
        "purple" => Color::rgb(128, 0, 128),
        "orange" => Color::rgb(255, 165, 0),
        "transparent" => Color::rgba(0, 0, 0, 0.0),
        _ => return None,
    };
    Some(color)
}
