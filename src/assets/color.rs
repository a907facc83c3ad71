use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::StoryError;

/// Straight-alpha sRGB color with channels in `0..=1`.
///
/// Accepts the representations a style sheet would: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
/// `rgb()/rgba()`, `hsl()/hsla()` and a handful of named colors. JSON additionally accepts
/// `{r,g,b,a}` / `{h,s,l,a}` objects and `[r,g,b(,a)]` arrays. Serializes as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Factory brand color (`#6366f1`).
    pub const INDIGO: Color = Color::from_rgb8_const(0x63, 0x66, 0xf1);
    /// Opaque white.
    pub const WHITE: Color = Color::from_rgb8_const(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::from_rgb8_const(0, 0, 0);

    const fn from_rgb8_const(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Build from normalized channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit straight channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    /// Quantize to 8-bit straight RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// Quantize to premultiplied RGBA8.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let a = self.a.clamp(0.0, 1.0);
        let r = (self.r.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let g = (self.g.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let b = (self.b.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);

        Rgba8Premul {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
            a: to_u8(a),
        }
    }

    /// Lowercase hex form; alpha is omitted when opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css(s).map_err(StoryError::validation)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            HslaObj {
                h: f64,
                s: f64,
                l: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Css(s) => parse_css(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Color::rgba(r, g, b, a)),
            Repr::HslaObj { h, s, l, a } => Ok(hsla_to_rgba(h, s, l, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Color::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_css(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if s.starts_with('#') {
        return parse_hex(s);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = functional_args(&lower, &["rgba", "rgb"]) {
        return parse_rgb_fn(&args);
    }
    if let Some(args) = functional_args(&lower, &["hsla", "hsl"]) {
        return parse_hsl_fn(&args);
    }
    if let Some(c) = named(&lower) {
        return Ok(c);
    }
    // Bare hex without '#'.
    if matches!(s.len(), 3 | 4 | 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return parse_hex(s);
    }
    Err(format!("unrecognized color \"{s}\""))
}

fn functional_args(s: &str, names: &[&str]) -> Option<Vec<String>> {
    for name in names {
        if let Some(rest) = s.strip_prefix(name) {
            let inner = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
            let parts = inner
                .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect();
            return Some(parts);
        }
    }
    None
}

fn parse_component(part: &str, scale: f64) -> Result<f64, String> {
    if let Some(pct) = part.strip_suffix('%') {
        let v: f64 = pct
            .parse()
            .map_err(|_| format!("invalid percentage \"{part}\""))?;
        return Ok((v / 100.0).clamp(0.0, 1.0));
    }
    let v: f64 = part
        .parse()
        .map_err(|_| format!("invalid number \"{part}\""))?;
    Ok((v / scale).clamp(0.0, 1.0))
}

fn parse_rgb_fn(args: &[String]) -> Result<Color, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("rgb()/rgba() takes 3 or 4 components".to_owned());
    }
    let r = parse_component(&args[0], 255.0)?;
    let g = parse_component(&args[1], 255.0)?;
    let b = parse_component(&args[2], 255.0)?;
    let a = match args.get(3) {
        Some(a) => parse_component(a, 1.0)?,
        None => 1.0,
    };
    Ok(Color::rgba(r, g, b, a))
}

fn parse_hsl_fn(args: &[String]) -> Result<Color, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("hsl()/hsla() takes 3 or 4 components".to_owned());
    }
    let h: f64 = args[0]
        .trim_end_matches("deg")
        .parse()
        .map_err(|_| format!("invalid hue \"{}\"", args[0]))?;
    let s = parse_component(&args[1], 1.0)?;
    let l = parse_component(&args[2], 1.0)?;
    let a = match args.get(3) {
        Some(a) => parse_component(a, 1.0)?,
        None => 1.0,
    };
    Ok(hsla_to_rgba(h, s, l, a))
}

fn named(s: &str) -> Option<Color> {
    let rgb = |r: u8, g: u8, b: u8| Color::from_rgba8(r, g, b, 255);
    Some(match s {
        "transparent" => Color::rgba(0.0, 0.0, 0.0, 0.0),
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => rgb(255, 0, 0),
        "green" => rgb(0, 128, 0),
        "lime" => rgb(0, 255, 0),
        "blue" => rgb(0, 0, 255),
        "yellow" => rgb(255, 255, 0),
        "orange" => rgb(255, 165, 0),
        "gold" => rgb(255, 215, 0),
        "pink" => rgb(255, 192, 203),
        "purple" => rgb(128, 0, 128),
        "indigo" => rgb(75, 0, 130),
        "gray" | "grey" => rgb(128, 128, 128),
        "silver" => rgb(192, 192, 192),
        "navy" => rgb(0, 0, 128),
        "teal" => rgb(0, 128, 128),
        _ => return None,
    })
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        3 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            255,
        ),
        4 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            hex_nibble(&s[3..4])?,
        ),
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned());
        }
    };

    Ok(Color::from_rgba8(r, g, b, a))
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l, l, l, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Color::rgba(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
        a,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
