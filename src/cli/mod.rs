//! Command-line interface module.

mod args;
pub mod crypt;
pub mod render;
pub mod theme;

pub use args::{Cli, Commands, CryptArgs, RenderArgs, ThemeCommand};

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Format count with noun, e.g. `1 file`, `3 files`.
pub(crate) fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write `content` to `output`, or to stdout when no path is given.
pub(crate) fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
