//! Palette validation and accessibility reporting.

use super::palette::{ColorSet, REQUIRED_COLORS, ThemePalette};
use crate::color::{self, DEFAULT_MIN_CONTRAST, WcagLevel};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt;

/// Foreground/background role pairs checked for readability.
const CONTRAST_PAIRS: &[(&str, &str, &str)] = &[
    ("body text/background", "bodyText", "bodyBackground"),
    ("panel text/background", "panelText", "panelBackground"),
    ("link/body background", "linkColor", "bodyBackground"),
    ("link/panel background", "linkColor", "panelBackground"),
    ("button text/background", "buttonText", "buttonBackground"),
    ("nav text/header background", "navText", "headerBackground"),
];

/// One contrast measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastCheck {
    pub name: &'static str,
    pub ratio: f64,
    pub required: f64,
    pub level: WcagLevel,
    pub passes: bool,
}

/// Result of [`validate_palette`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaletteReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub contrast: Vec<ContrastCheck>,
}

impl PaletteReport {
    /// No invalid color values (warnings allowed).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check color values, required roles and contrast pairs.
pub fn validate_palette(colors: &ColorSet) -> PaletteReport {
    let mut report = PaletteReport::default();

    for (key, value) in colors {
        if !color::is_valid_color(value) {
            report
                .errors
                .push(format!("invalid color value for '{key}': {value}"));
        }
    }

    for key in REQUIRED_COLORS.iter().chain(&["headerBackground"]) {
        if !colors.contains_key(*key) {
            report.warnings.push(format!("missing required color: {key}"));
        }
    }

    for &(name, fg_key, bg_key) in CONTRAST_PAIRS {
        // Pairs with an absent role are skipped
        let (Some(fg), Some(bg)) = (colors.get(fg_key), colors.get(bg_key)) else {
            continue;
        };
        if !color::is_valid_color(fg) || !color::is_valid_color(bg) {
            report
                .warnings
                .push(format!("cannot check contrast for {name}: invalid color values"));
            continue;
        }

        let ratio = color::contrast_ratio(fg, bg);
        let passes = ratio >= DEFAULT_MIN_CONTRAST;
        if !passes {
            report.warnings.push(format!(
                "low contrast ratio for {name}: {ratio:.2}:1 (required: {DEFAULT_MIN_CONTRAST}:1)"
            ));
        }
        report.contrast.push(ContrastCheck {
            name,
            ratio,
            required: DEFAULT_MIN_CONTRAST,
            level: color::meets_wcag(ratio, false),
            passes,
        });
    }

    report
}

/// Human-oriented accessibility summary for one palette.
#[derive(Debug, Clone, Serialize)]
pub struct AccessibilityReport {
    pub theme_name: String,
    pub display_name: String,
    pub compliant: bool,
    pub report: PaletteReport,
    pub recommendations: Vec<String>,
}

/// Validate `palette` and derive recommendations.
pub fn accessibility_report(palette: &ThemePalette) -> AccessibilityReport {
    let report = validate_palette(&palette.colors);
    let compliant = report.warnings.is_empty();

    let mut recommendations = Vec::new();
    if compliant {
        recommendations.push("theme meets WCAG AA accessibility standards".to_string());
    } else {
        recommendations.push(
            "consider adjusting colors to meet WCAG AA standards (4.5:1 contrast ratio)".to_string(),
        );
        let failed = report.contrast.iter().filter(|c| !c.passes).count();
        if failed > 0 {
            recommendations.push(format!("{failed} color combination(s) need improvement"));
        }
    }

    AccessibilityReport {
        theme_name: palette.name.clone(),
        display_name: palette.display_name.clone(),
        compliant,
        report,
        recommendations,
    }
}

impl fmt::Display for AccessibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.compliant {
            "WCAG AA".green().to_string()
        } else {
            "non-compliant".red().to_string()
        };
        writeln!(f, "{} ({}): {}", self.display_name.bold(), self.theme_name, status)?;

        for check in &self.report.contrast {
            let mark = if check.passes {
                "✓".green().to_string()
            } else {
                "✗".red().to_string()
            };
            writeln!(f, "  {mark} {:<28} {:>6.2}:1  {}", check.name, check.ratio, check.level)?;
        }
        for error in &self.report.errors {
            writeln!(f, "  {} {error}", "error:".red())?;
        }
        for warning in &self.report.warnings {
            writeln!(f, "  {} {warning}", "warning:".yellow())?;
        }
        for rec in &self.recommendations {
            writeln!(f, "  {} {rec}", "hint:".cyan())?;
        }
        Ok(())
    }
}
