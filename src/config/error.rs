//! Config errors and validation diagnostics.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML in config file")]
    Toml(#[from] toml::de::Error),

    // Displayed inline; a `source()` would repeat every entry
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// Dotted path of a config field, e.g. `render.image_root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Value replaced by a default at runtime.
    Warning,
    /// Loading fails.
    Error,
}

#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_args!("{}:", self.field.as_str()).cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {hint}", "hint:".yellow())?;
        }
        Ok(())
    }
}

/// Everything one validation pass found, in the order it was found.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics(Vec<ConfigDiagnostic>);

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.0.push(ConfigDiagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(&mut self, field: FieldPath, message: impl Into<String>, hint: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    fn of(&self, severity: Severity) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.0.iter().filter(move |d| d.severity == severity)
    }

    pub fn errors(&self) -> Vec<&ConfigDiagnostic> {
        self.of(Severity::Error).collect()
    }

    pub fn warnings(&self) -> Vec<&ConfigDiagnostic> {
        self.of(Severity::Warning).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.of(Severity::Error).next().is_some()
    }

    pub fn print_warnings(&self) {
        for warning in self.of(Severity::Warning) {
            crate::log!("warning"; "{}", warning);
        }
    }

    /// Err with the errors only; warnings are assumed printed.
    pub fn into_result(self) -> Result<(), Self> {
        if !self.has_errors() {
            return Ok(());
        }
        let errors = self
            .0
            .into_iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        Err(Self(errors))
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors();
        let noun = if errors.len() == 1 { "error" } else { "errors" };
        write!(f, "{}", format_args!("config has {} {noun}:", errors.len()).red().bold())?;
        for error in errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("marka.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "cannot read `marka.toml`");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("theme.dark"), "unknown palette");
        assert_eq!(diag.warnings().len(), 1);
        assert!(!diag.has_errors());
        assert!(diag.into_result().is_ok());
    }

    #[test]
    fn test_errors_collected_in_order() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("theme.light"), "unknown palette");
        diag.error(FieldPath::new("crypto.tag"), "empty");
        diag.error_with_hint(FieldPath::new("render.code_theme"), "unknown", "try X");

        let failed = diag.into_result().unwrap_err();
        let fields: Vec<_> = failed.errors().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["crypto.tag", "render.code_theme"]);
        assert!(failed.warnings().is_empty());

        let shown = failed.to_string();
        assert!(shown.contains("2 errors"));
        assert!(shown.contains("try X"));
    }
}
