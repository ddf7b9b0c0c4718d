//! Theme inspection commands.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use super::plural_count;
use crate::config::SiteConfig;
use crate::theme::{ThemePalette, ThemeStore, accessibility_report};

pub fn list_palettes(config: &SiteConfig) -> Result<()> {
    let store = ThemeStore::new(&config.theme);
    let mut out = std::io::stdout().lock();
    for line in palette_lines(&store, config) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// One line per palette, marking the configured light and dark ones.
fn palette_lines(store: &ThemeStore, config: &SiteConfig) -> Vec<String> {
    store
        .palettes()
        .map(|palette| {
            let roles: Vec<&str> = [
                (palette.name == config.theme.light).then_some("light"),
                (palette.name == config.theme.dark).then_some("dark"),
            ]
            .into_iter()
            .flatten()
            .collect();

            let mut line = format!("{:<16} {}", palette.name, palette.display_name);
            if !roles.is_empty() {
                line.push_str(&format!(" ({})", roles.join(", ")));
            }
            line
        })
        .collect()
}

/// Print accessibility reports; fails when a palette has invalid colors.
pub fn check_palettes(name: Option<&str>, config: &SiteConfig) -> Result<()> {
    let store = ThemeStore::new(&config.theme);
    let palettes: Vec<Arc<ThemePalette>> = match name {
        Some(name) => vec![store
            .palette(name)
            .with_context(|| format!("unknown palette '{name}' (see `marka theme list`)"))?],
        None => store.palettes().cloned().collect(),
    };

    let mut out = std::io::stdout().lock();
    let mut failing = 0;
    let mut invalid = Vec::new();
    for palette in &palettes {
        let report = accessibility_report(palette);
        if !report.compliant {
            failing += 1;
        }
        if !report.report.is_valid() {
            invalid.push(palette.name.clone());
        }
        writeln!(out, "{report}")?;
    }

    if failing > 0 {
        log!("theme"; "{} of {} below WCAG AA", plural_count(failing, "palette"), palettes.len());
    }
    if !invalid.is_empty() {
        bail!("invalid colors in {}", invalid.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lines_mark_roles() {
        let config = SiteConfig::default();
        let store = ThemeStore::new(&config.theme);
        let lines = palette_lines(&store, &config);
        assert!(lines.iter().any(|l| l.starts_with("day") && l.ends_with("(light)")));
        assert!(lines.iter().any(|l| l.starts_with("dark") && l.ends_with("(dark)")));
    }

    #[test]
    fn test_check_unknown_palette() {
        let err = check_palettes(Some("missing"), &SiteConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unknown palette 'missing'"));
    }

    #[test]
    fn test_check_builtins() {
        check_palettes(None, &SiteConfig::default()).unwrap();
    }
}
