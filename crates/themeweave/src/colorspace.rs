//! CSS color parsing and hex conversion.
//!
//! Scale ramps are often authored in wide-gamut or perceptual notations
//! (`oklch()`, `lab()`, `hsl()`), while design tools want hex. This module
//! converts any of the supported notations to `#rrggbb`, or `#rrggbbaa` when
//! the color is translucent.
//!
//! | Notation | Example |
//! |----------|---------|
//! | hex | `#0d9488`, `#fff`, `#0d948880` |
//! | `rgb()` / `rgba()` | `rgb(13 148 136 / 50%)`, `rgba(13, 148, 136, 0.5)` |
//! | `hsl()` / `hsla()` | `hsl(174deg 84% 32%)` |
//! | `lab()` | `lab(54.9 -38.5 -2.1)` (CIE LAB, D65) |
//! | `oklch()` | `oklch(0.6 0.1 180)` |
//!
//! Out-of-gamut results are clamped per channel.
//!
//! # Example
//!
//! ```rust
//! use themeweave::colorspace::{ColorConverter, CssColorConverter};
//!
//! let converter = CssColorConverter;
//! assert_eq!(converter.to_hex("rgb(255, 0, 0)").as_deref(), Some("#ff0000"));
//! assert_eq!(converter.to_hex("var(--teal-9)"), None);
//! ```

/// Converts a color literal to hex.
///
/// Implementations return `None` for anything they cannot interpret; callers
/// treat the hex form as optional.
pub trait ColorConverter {
    fn to_hex(&self, value: &str) -> Option<String>;
}

/// Default converter understanding the notations listed in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorConverter;

impl ColorConverter for CssColorConverter {
    fn to_hex(&self, value: &str) -> Option<String> {
        parse_css_color(value).map(|c| c.to_hex())
    }
}

// ─── RGBA type ──────────────────────────────────────────────────────────────

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `#rrggbb`, or `#rrggbbaa` when alpha is below 1.
    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
        }
    }
}

// ─── Transfer functions ─────────────────────────────────────────────────────

/// Convert a linear light value (0.0–1.0) to sRGB (0–255), clamped.
fn linear_to_srgb(c: f64) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let s = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

fn unit_to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ─── CIE LAB ────────────────────────────────────────────────────────────────

/// D65 reference white point for CIE XYZ → LAB conversion.
const XN: f64 = 0.95047;
const YN: f64 = 1.00000;
const ZN: f64 = 1.08883;

/// LAB inverse transform helper.
fn lab_f_inv(t: f64) -> f64 {
    if t > 0.206896 {
        t * t * t
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// Convert CIE LAB to sRGB via XYZ (D65 illuminant).
fn lab_to_rgb(l: f64, a: f64, b: f64) -> (u8, u8, u8) {
    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;

    let x = XN * lab_f_inv(fx);
    let y = YN * lab_f_inv(fy);
    let z = ZN * lab_f_inv(fz);

    // XYZ → linear RGB (D65)
    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// ─── OKLab / OKLCH ──────────────────────────────────────────────────────────

fn oklab_to_rgb(l: f64, a: f64, b: f64) -> (u8, u8, u8) {
    let l_ = l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = l - 0.0894841775 * a - 1.2914855480 * b;

    let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.0767416621 * l3 - 3.3077115913 * m3 + 0.2309699292 * s3;
    let g = -1.2684380046 * l3 + 2.6097574011 * m3 - 0.3413193965 * s3;
    let b = -0.0041960863 * l3 - 0.7034186147 * m3 + 1.7076147010 * s3;

    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

fn oklch_to_rgb(l: f64, c: f64, h_deg: f64) -> (u8, u8, u8) {
    let h = h_deg.to_radians();
    oklab_to_rgb(l, c * h.cos(), c * h.sin())
}

// ─── HSL ────────────────────────────────────────────────────────────────────

fn hsl_to_rgb(h_deg: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (unit_to_u8(r + m), unit_to_u8(g + m), unit_to_u8(b + m))
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parses a CSS color literal.
pub fn parse_css_color(input: &str) -> Option<Rgba> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    match s.as_str() {
        "transparent" => return Some(Rgba { r: 0, g: 0, b: 0, a: 0.0 }),
        "black" => return Some(Rgba::opaque(0, 0, 0)),
        "white" => return Some(Rgba::opaque(255, 255, 255)),
        _ => {}
    }

    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    let func = s[..open].trim();
    let (channels, alpha) = split_args(inner)?;
    let alpha = match alpha {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };

    let (r, g, b) = match func {
        "rgb" | "rgba" => (
            parse_channel(channels[0])?,
            parse_channel(channels[1])?,
            parse_channel(channels[2])?,
        ),
        "hsl" | "hsla" => hsl_to_rgb(
            parse_hue(channels[0])?,
            parse_percent(channels[1])?,
            parse_percent(channels[2])?,
        ),
        "lab" => lab_to_rgb(
            parse_scaled(channels[0], 100.0)?,
            parse_scaled(channels[1], 125.0)?,
            parse_scaled(channels[2], 125.0)?,
        ),
        "oklch" => oklch_to_rgb(
            parse_scaled(channels[0], 1.0)?,
            parse_scaled(channels[1], 0.4)?,
            parse_hue(channels[2])?,
        ),
        _ => return None,
    };
    Some(Rgba { r, g, b, a: alpha })
}

/// Parses a hex color code (without the # prefix): 3, 4, 6 or 8 digits.
fn parse_hex(hex: &str) -> Option<Rgba> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
            Some(Rgba {
                r: digit(0)? * 17,
                g: digit(1)? * 17,
                b: digit(2)? * 17,
                a: a as f64 / 255.0,
            })
        }
        6 | 8 => {
            let a = if hex.len() == 8 { pair(6)? } else { 255 };
            Some(Rgba {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: a as f64 / 255.0,
            })
        }
        _ => None,
    }
}

/// Splits `"a b c / d"` or `"a, b, c, d"` into three channels and an
/// optional alpha.
fn split_args(inner: &str) -> Option<(Vec<&str>, Option<&str>)> {
    let (main, slash_alpha) = match inner.split_once('/') {
        Some((main, alpha)) => (main, Some(alpha.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = main
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    match (parts.len(), slash_alpha) {
        (3, alpha) => Some((parts, alpha)),
        (4, None) => Some((parts[..3].to_vec(), Some(parts[3]))),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `0..=255` or a percentage.
fn parse_channel(s: &str) -> Option<u8> {
    match s.strip_suffix('%') {
        Some(p) => Some(unit_to_u8(parse_number(p)? / 100.0)),
        None => Some(parse_number(s)?.clamp(0.0, 255.0).round() as u8),
    }
}

/// `0..=1` or a percentage.
fn parse_alpha(s: &str) -> Option<f64> {
    match s.strip_suffix('%') {
        Some(p) => Some((parse_number(p)? / 100.0).clamp(0.0, 1.0)),
        None => Some(parse_number(s)?.clamp(0.0, 1.0)),
    }
}

/// Percentage for HSL saturation/lightness; bare numbers are read as percent too.
fn parse_percent(s: &str) -> Option<f64> {
    let n = parse_number(s.strip_suffix('%').unwrap_or(s))?;
    Some((n / 100.0).clamp(0.0, 1.0))
}

fn parse_hue(s: &str) -> Option<f64> {
    if let Some(turns) = s.strip_suffix("turn") {
        return Some(parse_number(turns)? * 360.0);
    }
    if let Some(rad) = s.strip_suffix("rad") {
        return Some(parse_number(rad)?.to_degrees());
    }
    parse_number(s.strip_suffix("deg").unwrap_or(s))
}

/// A bare number, or a percentage of `full`.
fn parse_scaled(s: &str, full: f64) -> Option<f64> {
    match s.strip_suffix('%') {
        Some(p) => Some(parse_number(p)? / 100.0 * full),
        None => parse_number(s),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
