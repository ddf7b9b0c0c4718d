//! `[crypto]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [crypto]
//! tag = "暂未公开"              # posts carrying this tag are encrypted
//! tags_index = "Tags.json"      # tag → article paths index (optional)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Tag that marks an article as encrypted.
    pub tag: String,

    /// JSON object mapping tag names to article paths.
    pub tags_index: Option<PathBuf>,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            tag: "暂未公开".into(),
            tags_index: None,
        }
    }
}

impl CryptoConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.tag.trim().is_empty() {
            diag.error(FieldPath::new("crypto.tag"), "encryption tag must not be empty");
        }
        if let Some(index) = &self.tags_index
            && !index.exists()
        {
            diag.warn(
                FieldPath::new("crypto.tags_index"),
                format!("`{}` does not exist, no article will be treated as encrypted", index.display()),
            );
        }
    }
}
