//! `[theme]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [theme]
//! light = "day"                 # palette for light mode (alias: LightTheme)
//! dark = "dark"                 # palette for dark mode (alias: DarkTheme)
//! default_mode = "system"       # light | dark | system
//! enable_system_detection = true
//! enable_transitions = true
//! transition_duration = 300     # milliseconds
//!
//! [theme.palettes.night]
//! display_name = "Night"
//! colors = { bodyBackground = "#0d1117", bodyText = "#c9d1d9" }
//! ```

use crate::color;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::theme::{self, DefaultMode, RawPalette};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme section configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Palette used in light mode.
    #[serde(alias = "LightTheme")]
    pub light: String,

    /// Palette used in dark mode.
    #[serde(alias = "DarkTheme")]
    pub dark: String,

    /// Mode chosen when no preference is saved.
    pub default_mode: DefaultMode,

    /// Follow the host light/dark preference when `default_mode = "system"`.
    pub enable_system_detection: bool,

    pub enable_transitions: bool,

    /// Transition length in milliseconds.
    pub transition_duration: u32,

    /// Named palettes. `day` and `dark` exist even when not listed.
    pub palettes: BTreeMap<String, RawPalette>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: "day".into(),
            dark: "dark".into(),
            default_mode: DefaultMode::System,
            enable_system_detection: true,
            enable_transitions: true,
            transition_duration: 300,
            palettes: BTreeMap::new(),
        }
    }
}

impl ThemeConfig {
    /// Palette problems are substituted at runtime, so they are only warnings.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for warning in theme::validate_config(self) {
            diag.warn(FieldPath::new("theme"), warning);
        }

        for (name, palette) in &self.palettes {
            for (key, value) in &palette.colors {
                if !color::is_valid_color(value) {
                    diag.warn(
                        FieldPath::new("theme.palettes"),
                        format!("{name}.{key} = '{value}' is not a valid color, the default will be used"),
                    );
                }
            }
        }
    }
}
