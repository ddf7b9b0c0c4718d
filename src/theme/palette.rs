//! Theme palettes: defaults, sanitization and generation.

use crate::color::{self, WcagLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color role key → color string.
pub type ColorSet = BTreeMap<String, String>;

/// Default value for every color role a palette carries.
pub const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("bodyBackground", "#ffffff"),
    ("bodyText", "#000000"),
    ("panelBackground", "#f9f9f9"),
    ("panelText", "#000000"),
    ("panelShadow", "rgba(0, 0, 0, 0.1)"),
    ("panelBorder", "rgba(0, 0, 0, 0.05)"),
    ("headerBackground", "rgba(255, 255, 255, 0.9)"),
    ("headerBackgroundScrolled", "rgba(255, 255, 255, 0.95)"),
    ("headerShadow", "rgba(0, 0, 0, 0.1)"),
    ("linkColor", "#667eea"),
    ("linkHover", "#764ba2"),
    ("buttonBackground", "#667eea"),
    ("buttonText", "#ffffff"),
    ("primary", "#667eea"),
    ("secondary", "#764ba2"),
    ("accent", "#f093fb"),
    ("success", "#10b981"),
    ("warning", "#f59e0b"),
    ("error", "#ef4444"),
    ("info", "#3b82f6"),
];

/// Roles that must always resolve to a color.
pub const REQUIRED_COLORS: &[&str] = &[
    "bodyBackground",
    "bodyText",
    "panelBackground",
    "panelText",
    "linkColor",
    "primary",
    "buttonText",
    "buttonBackground",
];

/// Palette name used when a configured name cannot be resolved.
pub const FALLBACK_PALETTE: &str = "day";

const DARK_COLORS: &[(&str, &str)] = &[
    ("bodyBackground", "#1a1a2e"),
    ("bodyText", "#e6e6e6"),
    ("panelBackground", "#16213e"),
    ("panelText", "#e6e6e6"),
    ("panelShadow", "rgba(0, 0, 0, 0.3)"),
    ("panelBorder", "rgba(255, 255, 255, 0.08)"),
    ("headerBackground", "rgba(22, 33, 62, 0.9)"),
    ("headerBackgroundScrolled", "rgba(22, 33, 62, 0.95)"),
    ("headerShadow", "rgba(0, 0, 0, 0.3)"),
    ("linkColor", "#8fa4f3"),
    ("linkHover", "#b39ddb"),
    ("buttonBackground", "#4c5fd5"),
    ("buttonText", "#ffffff"),
    ("primary", "#8fa4f3"),
    ("secondary", "#b39ddb"),
    ("accent", "#f093fb"),
    ("success", "#34d399"),
    ("warning", "#fbbf24"),
    ("error", "#f87171"),
    ("info", "#60a5fa"),
];

/// Default color set as an owned map.
pub fn default_colors() -> ColorSet {
    to_set(DEFAULT_COLORS)
}

fn to_set(pairs: &[(&str, &str)]) -> ColorSet {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Types
// ============================================================================

/// Accessibility target declared by a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessibility {
    pub contrast_ratio: f64,
    pub wcag_level: WcagLevel,
}

impl Default for Accessibility {
    fn default() -> Self {
        Self {
            contrast_ratio: color::DEFAULT_MIN_CONTRAST,
            wcag_level: WcagLevel::Aa,
        }
    }
}

/// Palette as written in configuration, before sanitization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPalette {
    pub display_name: Option<String>,
    pub colors: ColorSet,
    pub accessibility: Option<Accessibility>,
}

/// A named, complete and immutable set of color roles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemePalette {
    pub name: String,
    pub display_name: String,
    pub colors: ColorSet,
    pub accessibility: Accessibility,
}

impl ThemePalette {
    /// Color for `key`, if present.
    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Built-in light palette.
    pub fn day() -> Self {
        Self {
            name: "day".into(),
            display_name: "Day".into(),
            colors: default_colors(),
            accessibility: Accessibility::default(),
        }
    }

    /// Built-in dark palette.
    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            display_name: "Dark".into(),
            colors: to_set(DARK_COLORS),
            accessibility: Accessibility::default(),
        }
    }

    /// Whether the palette's body background is darker than mid-gray.
    pub fn is_dark(&self) -> bool {
        self.color("bodyBackground")
            .is_some_and(|bg| color::luminance(bg) < 0.2)
    }

    /// Copy of this palette with body, panel and link colors pushed to
    /// maximum contrast.
    pub fn high_contrast(&self) -> Self {
        let light = self
            .color("bodyBackground")
            .is_none_or(|bg| bg.eq_ignore_ascii_case("#ffffff"));
        let pick = |l: &str, d: &str| if light { l.to_string() } else { d.to_string() };

        let mut colors = self.colors.clone();
        colors.insert("bodyBackground".into(), pick("#ffffff", "#000000"));
        colors.insert("bodyText".into(), pick("#000000", "#ffffff"));
        colors.insert("panelBackground".into(), pick("#f0f0f0", "#1a1a1a"));
        colors.insert("panelText".into(), pick("#000000", "#ffffff"));
        colors.insert("linkColor".into(), pick("#0000ff", "#00ffff"));
        colors.insert("linkHover".into(), pick("#0000cc", "#00cccc"));

        Self {
            colors,
            accessibility: Accessibility {
                contrast_ratio: 7.0,
                wcag_level: WcagLevel::Aaa,
            },
            ..self.clone()
        }
    }
}

// ============================================================================
// Sanitization
// ============================================================================

/// Build a complete palette from configuration input.
///
/// Invalid colors are replaced by the matching entry in `defaults` (or the
/// built-in default set) with a warning. Missing roles are filled in silently.
pub fn sanitize(name: &str, raw: &RawPalette, defaults: &ColorSet) -> ThemePalette {
    let fallbacks = {
        let mut all = default_colors();
        all.extend(defaults.iter().map(|(k, v)| (k.clone(), v.clone())));
        all
    };

    let mut colors = ColorSet::new();
    for (key, value) in &raw.colors {
        let fallback = fallbacks.get(key).map_or("#000000", String::as_str);
        if !color::is_valid_color(value) {
            crate::log!("warn"; "palette '{}': invalid color {}='{}', using {}", name, key, value, fallback);
        }
        colors.insert(key.clone(), color::sanitize_color(value, fallback).to_string());
    }

    for (key, fallback) in &fallbacks {
        colors
            .entry(key.clone())
            .or_insert_with(|| fallback.clone());
    }

    ThemePalette {
        name: name.to_string(),
        display_name: raw
            .display_name
            .clone()
            .unwrap_or_else(|| capitalize(name)),
        colors,
        accessibility: raw.accessibility.unwrap_or_default(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown Theme".to_string(),
    }
}

/// Derive a full palette from a handful of base colors.
///
/// Roles not given are derived from related base roles (panel from body,
/// button and primary from link, ...), then from the defaults. Base colors
/// always win over derived ones.
pub fn generate_palette(name: &str, display_name: &str, base: &ColorSet) -> ThemePalette {
    let get = |keys: &[&str], default: &str| -> String {
        keys.iter()
            .find_map(|k| base.get(*k))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let derived: [(&str, String); 20] = [
        ("bodyBackground", get(&["bodyBackground"], "#ffffff")),
        ("bodyText", get(&["bodyText"], "#000000")),
        ("panelBackground", get(&["panelBackground", "bodyBackground"], "#ffffff")),
        ("panelShadow", get(&["panelShadow"], "rgba(0, 0, 0, 0.1)")),
        ("panelText", get(&["panelText", "bodyText"], "#000000")),
        ("panelBorder", get(&["panelBorder"], "rgba(0, 0, 0, 0.1)")),
        (
            "headerBackground",
            get(&["headerBackground", "panelBackground"], "#ffffff"),
        ),
        (
            "headerBackgroundScrolled",
            get(&["headerBackgroundScrolled", "headerBackground"], "#ffffff"),
        ),
        (
            "headerShadow",
            get(&["headerShadow", "panelShadow"], "rgba(0, 0, 0, 0.1)"),
        ),
        ("linkColor", get(&["linkColor"], "#667eea")),
        ("linkHover", get(&["linkHover"], "#764ba2")),
        ("buttonBackground", get(&["buttonBackground", "linkColor"], "#667eea")),
        ("buttonText", get(&["buttonText"], "#ffffff")),
        ("primary", get(&["primary", "linkColor"], "#667eea")),
        ("secondary", get(&["secondary", "linkHover"], "#764ba2")),
        ("accent", get(&["accent"], "#f093fb")),
        ("success", get(&["success"], "#10b981")),
        ("warning", get(&["warning"], "#f59e0b")),
        ("error", get(&["error"], "#ef4444")),
        ("info", get(&["info"], "#3b82f6")),
    ];

    let mut colors: ColorSet = derived
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    colors.extend(base.iter().map(|(k, v)| (k.clone(), v.clone())));

    ThemePalette {
        name: name.to_string(),
        display_name: display_name.to_string(),
        colors,
        accessibility: Accessibility::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_covers_required() {
        let defaults = default_colors();
        assert_eq!(defaults.len(), 20);
        for key in REQUIRED_COLORS {
            assert!(defaults.contains_key(*key), "{key}");
        }
    }

    #[test]
    fn test_builtin_palettes_complete() {
        for palette in [ThemePalette::day(), ThemePalette::dark()] {
            for key in REQUIRED_COLORS {
                assert!(palette.color(key).is_some());
            }
            assert!(palette.colors.values().all(|c| color::is_valid_color(c)));
        }
        assert!(ThemePalette::dark().is_dark());
        assert!(!ThemePalette::day().is_dark());
    }

    #[test]
    fn test_sanitize_replaces_invalid_and_fills_missing() {
        let raw = RawPalette {
            display_name: None,
            colors: [
                ("bodyBackground".to_string(), "#222".to_string()),
                ("bodyText".to_string(), "not-a-color".to_string()),
                ("custom".to_string(), "bogus".to_string()),
            ]
            .into(),
            accessibility: None,
        };
        let palette = sanitize("night", &raw, &ColorSet::new());

        assert_eq!(palette.display_name, "Night");
        assert_eq!(palette.color("bodyBackground"), Some("#222"));
        assert_eq!(palette.color("bodyText"), Some("#000000"));
        assert_eq!(palette.color("custom"), Some("#000000"));
        for key in REQUIRED_COLORS {
            assert!(palette.color(key).is_some());
        }
        assert_eq!(palette.accessibility, Accessibility::default());
    }

    #[test]
    fn test_sanitize_prefers_given_defaults() {
        let defaults: ColorSet = [("bodyText".to_string(), "#eeeeee".to_string())].into();
        let raw = RawPalette {
            colors: [("bodyText".to_string(), "??".to_string())].into(),
            ..Default::default()
        };
        let palette = sanitize("x", &raw, &defaults);
        assert_eq!(palette.color("bodyText"), Some("#eeeeee"));
    }

    #[test]
    fn test_generate_palette_derivation() {
        let base: ColorSet = [
            ("bodyBackground".to_string(), "#101010".to_string()),
            ("linkColor".to_string(), "#ff8800".to_string()),
        ]
        .into();
        let palette = generate_palette("ember", "Ember", &base);

        assert_eq!(palette.color("panelBackground"), Some("#101010"));
        // Fallbacks read the base set, not colors derived in this pass
        assert_eq!(palette.color("headerBackground"), Some("#ffffff"));
        assert_eq!(palette.color("buttonBackground"), Some("#ff8800"));
        assert_eq!(palette.color("primary"), Some("#ff8800"));
        assert_eq!(palette.color("bodyText"), Some("#000000"));
        assert_eq!(palette.colors.len(), 20);

        let base: ColorSet = [("panelBackground".to_string(), "#202020".to_string())].into();
        let palette = generate_palette("ash", "Ash", &base);
        assert_eq!(palette.color("headerBackground"), Some("#202020"));
        assert_eq!(palette.color("headerBackgroundScrolled"), Some("#ffffff"));
    }

    #[test]
    fn test_high_contrast() {
        let light = ThemePalette::day().high_contrast();
        assert_eq!(light.color("linkColor"), Some("#0000ff"));
        assert_eq!(light.accessibility.wcag_level, WcagLevel::Aaa);

        let dark = ThemePalette::dark().high_contrast();
        assert_eq!(dark.color("bodyBackground"), Some("#000000"));
        assert_eq!(dark.color("bodyText"), Some("#ffffff"));
        assert_eq!(dark.name, "dark");
    }
}
