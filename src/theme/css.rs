//! Palette → CSS custom property output.

use thiserror::Error;

/// Palette role → CSS custom property.
const CSS_VARS: &[(&str, &str)] = &[
    ("bodyBackground", "--theme-body-bg"),
    ("bodyText", "--theme-body-text"),
    ("panelBackground", "--theme-panel-bg"),
    ("panelShadow", "--theme-panel-shadow"),
    ("panelText", "--theme-panel-text"),
    ("panelBorder", "--theme-panel-border"),
    ("headerBackground", "--theme-header-bg"),
    ("headerBackgroundScrolled", "--theme-header-bg-scrolled"),
    ("headerShadow", "--theme-header-shadow"),
    ("linkColor", "--theme-link-color"),
    ("linkHover", "--theme-link-hover"),
    ("buttonBackground", "--theme-button-bg"),
    ("buttonText", "--theme-button-text"),
    ("inputBackground", "--theme-input-bg"),
];

/// CSS custom property for a palette role.
///
/// Known roles use their fixed short names; anything else becomes
/// `--theme-<kebab-case-key>`.
pub fn css_variable_name(key: &str) -> String {
    if let Some((_, var)) = CSS_VARS.iter().find(|(k, _)| *k == key) {
        return (*var).to_string();
    }

    let mut out = String::with_capacity(key.len() + 10);
    out.push_str("--theme-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Failure writing one style property.
#[derive(Debug, Error)]
#[error("cannot set `{name}`: {reason}")]
pub struct StyleError {
    pub name: String,
    pub reason: String,
}

impl StyleError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Destination for theme output (document root, stylesheet, ...).
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError>;
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), StyleError>;
    fn remove_attribute(&mut self, name: &str) -> Result<(), StyleError>;
}

/// Collects output into a `:root { ... }` stylesheet.
#[derive(Debug, Default, Clone)]
pub struct CssRoot {
    pub properties: Vec<(String, String)>,
    pub attributes: Vec<(String, String)>,
}

impl CssRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of an attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a custom property, if set.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render as a stylesheet block.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.properties {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push('}');
        css
    }
}

impl StyleSink for CssRoot {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        if value.contains([';', '{', '}']) {
            return Err(StyleError::new(name, "value would break out of the declaration"));
        }
        match self.properties.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        self.remove_attribute(name)?;
        self.attributes.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), StyleError> {
        self.attributes.retain(|(k, _)| k != name);
        Ok(())
    }
}
