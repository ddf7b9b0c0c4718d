//! Placeholder attribute → typed prop decoding.
//!
//! Props are bound with a `:` prefix (`:videoUrl="'...'"`). Each component
//! declares the kind of every prop it takes, and the declared kind decides
//! the decoding:
//!
//! | Kind   | Raw value (after entity decoding) | Result                    |
//! |--------|-----------------------------------|---------------------------|
//! | `Text` | `'abc'` / `"abc"` / `abc`         | `Text("abc")`             |
//! | `Json` | `JSON.parse('[..]')`              | parsed, `[]` on failure   |
//! | `Json` | `[..]` / `{..}`                   | parsed, else quote-stripped text |
//! | `Json` | anything else                     | quote-stripped text       |
//!
//! Undeclared props are decoded like `Json`.

use crate::utils::html::{strip_quotes, unescape};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Attribute prefix marking a bound prop.
pub const BINDING_PREFIX: char = ':';

static JSON_PARSE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^JSON\.parse\('(.*)'\)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Json(Value),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::Json(Value::String(s)) => Some(s),
            PropValue::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            PropValue::Json(v) => Some(v),
            PropValue::Text(_) => None,
        }
    }
}

/// Decode one raw attribute value.
pub fn decode_prop(raw: &str, kind: Option<PropKind>) -> PropValue {
    let value = unescape(raw);
    let value = value.trim();

    if kind == Some(PropKind::Text) {
        return PropValue::Text(strip_quotes(value).to_string());
    }

    if let Some(caps) = JSON_PARSE_CALL.captures(value) {
        return match serde_json::from_str(&caps[1]) {
            Ok(json) => PropValue::Json(json),
            Err(e) => {
                crate::debug!("hydrate"; "bad JSON prop: {}", e);
                PropValue::Json(Value::Array(Vec::new()))
            }
        };
    }

    let looks_like_json = (value.starts_with('[') && value.ends_with(']'))
        || (value.starts_with('{') && value.ends_with('}'));
    if looks_like_json && let Ok(json) = serde_json::from_str(value) {
        return PropValue::Json(json);
    }

    PropValue::Text(strip_quotes(value).to_string())
}

/// Decoded props of one element, keyed without the binding prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Decode every bound attribute of an element.
    pub fn decode(attrs: &[(String, String)], schema: &[(&str, PropKind)]) -> Self {
        let props = attrs
            .iter()
            .filter_map(|(name, raw)| {
                let name = name.strip_prefix(BINDING_PREFIX)?;
                let kind = schema
                    .iter()
                    .find(|(prop, _)| *prop == name)
                    .map(|(_, kind)| *kind);
                Some((name.to_string(), decode_prop(raw, kind)))
            })
            .collect();
        Self(props)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_text)
    }

    pub fn json(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(PropValue::as_json)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
