//! Front-matter extraction.
//!
//! Posts start with a YAML-like block:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-01-01
//! tags: [rust, blog]
//! categories:
//!   - notes
//! ---
//! ```
//!
//! Only `key: value` lines, inline `[a, b]` lists, comma lists and `- item`
//! lists are understood. Anything else is kept as a string in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Cover image.
    pub img: Option<String>,
    /// Fields without a dedicated slot, original key case preserved.
    pub extra: Map<String, Value>,
}

impl PostMeta {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Split `content` into `(front matter, body)`.
///
/// The block must open on the very first line with `---` and close with a
/// line that is exactly `---`. Line endings may be `\n` or `\r\n`.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let fm = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((fm.trim_end_matches(['\r', '\n']), body));
        }
        offset += line.len();
    }
    None
}

/// Body without the front-matter block.
pub fn strip(content: &str) -> &str {
    split(content).map_or(content, |(_, body)| body)
}

/// Parse front matter into metadata and return the remaining body.
pub fn extract(content: &str) -> (PostMeta, &str) {
    match split(content) {
        Some((fm, body)) => (parse(fm), body),
        None => (PostMeta::default(), content),
    }
}

/// Parse a front-matter block (without delimiters).
pub fn parse(block: &str) -> PostMeta {
    let mut meta = PostMeta::default();
    let mut lines = block.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let mut value = parse_value(value.trim());

        // `key:` followed by indented `- item` lines
        if value == Value::Null {
            let mut items = Vec::new();
            while let Some(item) = lines
                .peek()
                .and_then(|next| next.trim_start().strip_prefix("- "))
            {
                items.push(Value::String(unquote(item.trim()).to_string()));
                lines.next();
            }
            if !items.is_empty() {
                value = Value::Array(items);
            }
        }

        match key.to_lowercase().as_str() {
            "title" => meta.title = as_string(&value),
            "date" => meta.date = as_string(&value),
            "img" | "cover" => meta.img = as_string(&value),
            "tags" => meta.tags = as_list(value),
            "categories" => meta.categories = as_list(value),
            _ => {
                meta.extra.insert(key.to_string(), value);
            }
        }
    }

    meta
}

fn unquote(s: &str) -> &str {
    crate::utils::html::strip_quotes(s)
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn as_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_string).collect(),
        Value::Null => Vec::new(),
        other => as_string(&other).into_iter().collect(),
    }
}

/// Parse a YAML-like scalar or inline list.
///
/// - `true`/`false`, `null`/`~`/empty
/// - integers and floats
/// - `[a, b]` and `a, b` lists
/// - quoted or bare strings
fn parse_value(s: &str) -> Value {
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s == "~" {
        return Value::Null;
    }
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = s.parse::<f64>()
        && let Some(num) = serde_json::Number::from_f64(n)
    {
        return Value::Number(num);
    }

    let quoted = s.len() >= 2 && (s.starts_with('"') || s.starts_with('\''));
    if quoted {
        return Value::String(unquote(s).to_string());
    }

    let list = s
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .or_else(|| s.contains(',').then_some(s));
    if let Some(list) = list {
        return Value::Array(
            list.split(',')
                .map(|item| unquote(item.trim()))
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }

    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split() {
        let (fm, body) = split("---\ntitle: Hi\n---\n# Body\n").unwrap();
        assert_eq!(fm, "title: Hi");
        assert_eq!(body, "# Body\n");

        let (fm, body) = split("---\r\ntitle: Hi\r\n---\r\nbody").unwrap();
        assert_eq!(fm, "title: Hi");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_requires_leading_delimiter() {
        assert!(split("# Title\n---\nx\n---\n").is_none());
        assert!(split("---\nunterminated").is_none());
        assert_eq!(strip("plain"), "plain");
    }

    #[test]
    fn test_standard_fields() {
        let (meta, body) = extract(
            "---\ntitle: Hello\ndate: 2024-01-01\ntags: [rust, 'blog']\ncategories: notes, misc\nimg: /cover.png\n---\n\nbody",
        );
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-01"));
        assert_eq!(meta.tags, ["rust", "blog"]);
        assert_eq!(meta.categories, ["notes", "misc"]);
        assert_eq!(meta.img.as_deref(), Some("/cover.png"));
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn test_dash_lists() {
        let meta = parse("tags:\n  - a\n  - \"b c\"\ntitle: T");
        assert_eq!(meta.tags, ["a", "b c"]);
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert!(meta.has_tag("b c"));
    }

    #[test]
    fn test_extra_fields() {
        let meta = parse("Custom: world\ncount: 42\nflag: true\nratio: 0.5\nempty:");
        assert_eq!(meta.extra.get("Custom"), Some(&json!("world")));
        assert_eq!(meta.extra.get("count"), Some(&json!(42)));
        assert_eq!(meta.extra.get("flag"), Some(&json!(true)));
        assert_eq!(meta.extra.get("ratio"), Some(&json!(0.5)));
        assert_eq!(meta.extra.get("empty"), Some(&Value::Null));
    }

    #[test]
    fn test_title_with_colon() {
        let meta = parse("title: Rust: the good parts");
        assert_eq!(meta.title.as_deref(), Some("Rust: the good parts"));
    }
}
