//! CSS-style colors as they appear in fill/stroke properties and QR
//! foreground settings.
//!
//! Parsing is built on `winnow` and accepts `#RGB`, `#RGBA`, `#RRGGBB`,
//! `#RRGGBBAA`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a handful of
//! keywords. Colors are stored as 8-bit channels so that property diffs
//! compare exactly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, delimited, opt, preceded, separated_pair};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse any supported CSS color notation.
    pub fn parse(input: &str) -> Option<Self> {
        css_color.parse(input.trim()).ok()
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| format!("invalid color: {s:?}"))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

fn css_color(input: &mut &str) -> ModalResult<Color> {
    alt((hex_color, rgb_function, keyword)).parse_next(input)
}

fn hex_val(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

fn hex_color(input: &mut &str) -> ModalResult<Color> {
    let digits: &str =
        preceded('#', take_while(3..=8, |c: char| c.is_ascii_hexdigit())).parse_next(input)?;
    let d = digits.as_bytes();
    let short = |i: usize| hex_val(d[i]) * 17;
    let long = |i: usize| hex_val(d[i]) << 4 | hex_val(d[i + 1]);
    match d.len() {
        3 => Ok(Color::rgb(short(0), short(1), short(2))),
        4 => Ok(Color::rgba(short(0), short(1), short(2), short(3))),
        6 => Ok(Color::rgb(long(0), long(2), long(4))),
        8 => Ok(Color::rgba(long(0), long(2), long(4), long(6))),
        _ => Err(winnow::error::ErrMode::Backtrack(ContextError::new())),
    }
}

fn channel(input: &mut &str) -> ModalResult<u8> {
    delimited(space0, digit1, space0)
        .try_map(|s: &str| s.parse::<u16>().map(|v| v.min(255) as u8))
        .parse_next(input)
}

/// Alpha in `rgba()` is a float in `[0, 1]`.
fn alpha(input: &mut &str) -> ModalResult<u8> {
    let raw: &str = delimited(
        space0,
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
        space0,
    )
    .parse_next(input)?;
    raw.parse::<f64>()
        .map(|a| (a.clamp(0.0, 1.0) * 255.0).round() as u8)
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    let _ = '('.parse_next(input)?;
    let (r, (g, b)) = separated_pair(channel, ',', separated_pair(channel, ',', channel))
        .parse_next(input)?;
    let a = opt(preceded(',', alpha)).parse_next(input)?;
    let _ = ')'.parse_next(input)?;
    Ok(Color::rgba(r, g, b, a.unwrap_or(255)))
}

fn keyword(input: &mut &str) -> ModalResult<Color> {
    let word: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    match word.to_ascii_lowercase().as_str() {
        "transparent" => Ok(Color::TRANSPARENT),
        "black" => Ok(Color::BLACK),
        "white" => Ok(Color::WHITE),
        "red" => Ok(Color::rgb(255, 0, 0)),
        "green" => Ok(Color::rgb(0, 128, 0)),
        "blue" => Ok(Color::rgb(0, 0, 255)),
        _ => Err(winnow::error::ErrMode::Backtrack(ContextError::new())),
    }
}
