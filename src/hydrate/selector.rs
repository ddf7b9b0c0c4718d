//! Minimal selectors: `Tag`, `.class`, `#id`, `[attr]`.

use super::HydrateError;
use super::dom::Element;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Element name, ASCII case-insensitive.
    Tag(String),
    Class(String),
    Id(String),
    /// Attribute presence.
    Attr(String),
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

impl FromStr for Selector {
    type Err = HydrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || HydrateError::InvalidSelector(s.to_string());

        let selector = if let Some(class) = s.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else if let Some(id) = s.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(attr) = s.strip_prefix('[').and_then(|a| a.strip_suffix(']')) {
            Selector::Attr(attr.trim().to_string())
        } else {
            Selector::Tag(s.to_string())
        };

        let valid = match &selector {
            // `.` only makes sense inside attribute names
            Selector::Tag(v) | Selector::Class(v) | Selector::Id(v) => is_ident(v) && !v.contains('.'),
            Selector::Attr(v) => is_ident(v),
        };
        if !valid {
            return Err(invalid());
        }
        Ok(selector)
    }
}

impl Selector {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Tag(name) => element.name.eq_ignore_ascii_case(name),
            Selector::Class(class) => element
                .attr("class")
                .is_some_and(|v| v.split_whitespace().any(|c| c == class)),
            Selector::Id(id) => element.attr("id") == Some(id.as_str()),
            Selector::Attr(attr) => element.attr(attr).is_some(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(v) => write!(f, "{v}"),
            Selector::Class(v) => write!(f, ".{v}"),
            Selector::Id(v) => write!(f, "#{v}"),
            Selector::Attr(v) => write!(f, "[{v}]"),
        }
    }
}
