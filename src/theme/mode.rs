//! Light/dark mode selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolved display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parse loosely, falling back to light for anything unrecognized.
    pub fn sanitize(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            crate::log!("warn"; "invalid theme mode '{}', using light", value);
            Self::Light
        })
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme mode `{other}`")),
        }
    }
}

/// Configured startup mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultMode {
    Light,
    Dark,
    #[default]
    System,
}

impl DefaultMode {
    /// Resolve against the host preference.
    ///
    /// `System` only consults `system_prefers_dark` when detection is enabled.
    pub fn resolve(self, detection_enabled: bool, system_prefers_dark: Option<bool>) -> ThemeMode {
        match self {
            Self::Light => ThemeMode::Light,
            Self::Dark => ThemeMode::Dark,
            Self::System if detection_enabled && system_prefers_dark == Some(true) => {
                ThemeMode::Dark
            }
            Self::System => ThemeMode::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_sanitize() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" light ".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("auto".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::sanitize("purple"), ThemeMode::Light);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_default_mode_resolve() {
        assert_eq!(DefaultMode::Dark.resolve(false, None), ThemeMode::Dark);
        assert_eq!(DefaultMode::System.resolve(true, Some(true)), ThemeMode::Dark);
        assert_eq!(DefaultMode::System.resolve(false, Some(true)), ThemeMode::Light);
        assert_eq!(DefaultMode::System.resolve(true, None), ThemeMode::Light);
    }
}
