//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! image_root = "/Posts/Images"   # prefix for relative image paths
//! line_numbers = true            # gutter in highlighted code blocks
//! code_theme = "InspiredGitHub"  # syntax highlighting theme
//! strip_excerpt_marker = true    # drop `<!-- more -->` before parsing
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::markdown::highlight;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Site-absolute directory that relative image paths resolve into.
    pub image_root: String,

    pub line_numbers: bool,

    /// Highlighting theme name.
    pub code_theme: String,

    pub strip_excerpt_marker: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_root: "/Posts/Images".into(),
            line_numbers: true,
            code_theme: highlight::DEFAULT_THEME.into(),
            strip_excerpt_marker: true,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.image_root.starts_with('/') {
            diag.error_with_hint(
                FieldPath::new("render.image_root"),
                format!("`{}` is not a site-absolute path", self.image_root),
                "start it with `/`, e.g. \"/Posts/Images\"",
            );
        }

        if !highlight::is_known_theme(&self.code_theme) {
            diag.error_with_hint(
                FieldPath::new("render.code_theme"),
                format!("unknown code theme `{}`", self.code_theme),
                format!("available: {}", highlight::theme_names().join(", ")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let mut diag = ConfigDiagnostics::new();
        RenderConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_relative_image_root_rejected() {
        let config = RenderConfig {
            image_root: "images".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "render.image_root");
    }

    #[test]
    fn test_unknown_code_theme_rejected() {
        let config = RenderConfig {
            code_theme: "Nonexistent".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.errors()[0].hint.as_deref().unwrap().contains("InspiredGitHub"));
    }
}
