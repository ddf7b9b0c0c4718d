//! Theming: palettes, light/dark selection and accessibility checks.
//!
//! ```text
//! ThemeConfig ──► ThemeStore ──(ArcSwap)──► current palette
//!                     │                          │
//!                     ├─ apply(StyleSink)        └─► ThemeSource (read-only,
//!                     └─ subscribe(ThemeChange)       used by the renderer)
//! ```

mod audit;
mod css;
mod mode;
mod palette;
mod store;

#[cfg(test)]
mod tests;

pub use audit::{AccessibilityReport, ContrastCheck, PaletteReport, accessibility_report, validate_palette};
pub use css::{CssRoot, StyleError, StyleSink, css_variable_name};
pub use mode::{DefaultMode, ThemeMode};
pub use palette::{
    Accessibility, ColorSet, DEFAULT_COLORS, FALLBACK_PALETTE, REQUIRED_COLORS, RawPalette,
    ThemePalette, default_colors, generate_palette, sanitize,
};
pub use store::{SubscriptionId, ThemeChange, ThemeStore, validate_config};

use std::sync::Arc;

/// Read-only view of the active theme.
///
/// The render pipeline depends on this instead of the store so callers can
/// pin any palette.
pub trait ThemeSource: Send + Sync {
    fn current_palette(&self) -> Arc<ThemePalette>;

    fn current_theme_name(&self) -> String {
        self.current_palette().name.clone()
    }
}

/// A theme that never changes.
#[derive(Debug, Clone)]
pub struct FixedTheme(pub Arc<ThemePalette>);

impl FixedTheme {
    pub fn new(palette: ThemePalette) -> Self {
        Self(Arc::new(palette))
    }
}

impl Default for FixedTheme {
    fn default() -> Self {
        Self::new(ThemePalette::day())
    }
}

impl ThemeSource for FixedTheme {
    fn current_palette(&self) -> Arc<ThemePalette> {
        Arc::clone(&self.0)
    }
}
