//! Color parsing and WCAG contrast math.
//!
//! Accepted color forms:
//! - hex: `#RGB`, `#RRGGBB`
//! - functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`
//! - a fixed keyword allowlist (`transparent`, `black`, `navy`, ...)
//!
//! Every function here is total: unparseable input never panics, it degrades
//! to mid-gray luminance so contrast checks keep working on bad palettes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Luminance used when a color cannot be resolved to RGB.
pub const FALLBACK_LUMINANCE: f64 = 0.5;

/// Minimum contrast ratio for normal text at level AA.
pub const DEFAULT_MIN_CONTRAST: f64 = 4.5;

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)(?:\s*,\s*([\d.]+))?\s*\)$").unwrap()
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsla?\(\s*(\d+)\s*,\s*(\d+)%\s*,\s*(\d+)%(?:\s*,\s*([\d.]+))?\s*\)$").unwrap()
});

/// Keywords accepted as colors. `None` marks keywords with no fixed RGB value.
const KEYWORDS: &[(&str, Option<(u8, u8, u8)>)] = &[
    ("transparent", None),
    ("currentcolor", None),
    ("inherit", None),
    ("initial", None),
    ("unset", None),
    ("black", Some((0, 0, 0))),
    ("white", Some((255, 255, 255))),
    ("red", Some((255, 0, 0))),
    ("green", Some((0, 128, 0))),
    ("blue", Some((0, 0, 255))),
    ("yellow", Some((255, 255, 0))),
    ("cyan", Some((0, 255, 255))),
    ("magenta", Some((255, 0, 255))),
    ("gray", Some((128, 128, 128))),
    ("grey", Some((128, 128, 128))),
    ("silver", Some((192, 192, 192))),
    ("maroon", Some((128, 0, 0))),
    ("olive", Some((128, 128, 0))),
    ("lime", Some((0, 255, 0))),
    ("aqua", Some((0, 255, 255))),
    ("teal", Some((0, 128, 128))),
    ("navy", Some((0, 0, 128))),
    ("fuchsia", Some((255, 0, 255))),
    ("purple", Some((128, 0, 128))),
    ("orange", Some((255, 165, 0))),
    ("pink", Some((255, 192, 203))),
    ("brown", Some((165, 42, 42))),
];

// ============================================================================
// Types
// ============================================================================

/// An sRGB color with 8-bit channels. Alpha is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance per WCAG 2.x.
    pub fn luminance(self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

/// WCAG conformance level for a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WcagLevel {
    #[serde(rename = "Fail")]
    Fail,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::Fail => "Fail",
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn keyword(s: &str) -> Option<Option<Rgb>> {
    KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, rgb)| rgb.map(|(r, g, b)| Rgb::new(r, g, b)))
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

fn clamp_channel(raw: &str) -> u8 {
    raw.parse::<u32>().map_or(255, |v| v.min(255) as u8)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = (h % 360.0) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };

    Rgb::new(hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// Resolve a color string to RGB.
///
/// Returns `None` for invalid strings and for valid keywords that have no
/// fixed value (`transparent`, `inherit`, ...).
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();

    if let Some(caps) = HEX_RE.captures(s) {
        return parse_hex(&caps[1]);
    }
    if let Some(caps) = RGB_RE.captures(s) {
        return Some(Rgb::new(
            clamp_channel(&caps[1]),
            clamp_channel(&caps[2]),
            clamp_channel(&caps[3]),
        ));
    }
    if let Some(caps) = HSL_RE.captures(s) {
        let num = |i: usize| caps[i].parse::<f64>().unwrap_or(0.0);
        return Some(hsl_to_rgb(num(1), num(2) / 100.0, num(3) / 100.0));
    }
    keyword(s).flatten()
}

/// Whether `s` is an accepted color string.
pub fn is_valid_color(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    HEX_RE.is_match(s) || RGB_RE.is_match(s) || HSL_RE.is_match(s) || keyword(s).is_some()
}

/// Trimmed `value` when it is a valid color, otherwise `fallback`.
pub fn sanitize_color<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if is_valid_color(value) {
        value.trim()
    } else {
        fallback
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Relative luminance in `[0, 1]`, or [`FALLBACK_LUMINANCE`] when unresolvable.
pub fn luminance(color: &str) -> f64 {
    parse_color(color).map_or(FALLBACK_LUMINANCE, Rgb::luminance)
}

/// WCAG contrast ratio in `[1, 21]`.
pub fn contrast_ratio(fg: &str, bg: &str) -> f64 {
    let (l1, l2) = (luminance(fg), luminance(bg));
    let (hi, lo) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (hi + 0.05) / (lo + 0.05)
}

/// Whether the pair reaches `required` contrast.
pub fn validate_contrast(fg: &str, bg: &str, required: f64) -> bool {
    contrast_ratio(fg, bg) >= required
}

/// Classify a contrast ratio.
pub fn meets_wcag(ratio: f64, large_text: bool) -> WcagLevel {
    let (aaa, aa) = if large_text { (4.5, 3.0) } else { (7.0, 4.5) };
    if ratio >= aaa {
        WcagLevel::Aaa
    } else if ratio >= aa {
        WcagLevel::Aa
    } else {
        WcagLevel::Fail
    }
}
