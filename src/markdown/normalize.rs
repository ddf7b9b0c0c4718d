//! Source clean-up before parsing.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static EXCERPT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\s*more\s*-->").unwrap());

/// Remove `<!-- more -->` excerpt markers (any case, any inner spacing).
pub fn strip_excerpt_marker(source: &str) -> Cow<'_, str> {
    EXCERPT_MARKER.replace_all(source, "")
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}
