//! Configuration management for `marka.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [theme], [render], [crypto]
//! ├── error.rs       # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults, and the
//! built-in `day`/`dark` palettes are always available.

mod error;
pub mod section;
mod util;

pub use section::{CryptoConfig, RenderConfig, ThemeConfig};
pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, Severity};

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name.
pub const CONFIG_FILE: &str = "marka.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing marka.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Path the config was loaded from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub crypto: CryptoConfig,
}

impl SiteConfig {
    /// Locate and load `config_name`, searching upward from `start`.
    ///
    /// Falls back to defaults when no file is found. Unknown fields are
    /// reported as warnings, then the config is validated.
    pub fn load(config_name: &Path, start: &Path) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(config_name, start) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Self::default()
            }
        };

        config.resolve_relative_paths();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve paths inside the config relative to the config file.
    fn resolve_relative_paths(&mut self) {
        let Some(root) = self.config_path.as_deref().and_then(Path::parent) else {
            return;
        };
        if let Some(index) = &mut self.crypto.tags_index
            && index.is_relative()
        {
            *index = root.join(&*index);
        }
    }

    /// Validate every section.
    ///
    /// Warnings are printed immediately; errors are returned together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.theme.validate(&mut diag);
        self.render.validate(&mut diag);
        self.crypto.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// tests
// ============================================================================
