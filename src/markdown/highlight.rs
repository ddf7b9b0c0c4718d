//! Syntax highlighting for fenced code.
//!
//! Every block is emitted as one `<pre>` with each source line wrapped in a
//! `code-line` span and an optional `line-number` gutter. Unknown languages
//! and highlighter failures fall back to escaped text in the same layout.

use super::context::{RenderContext, WarningKind};
use crate::utils::html::escape;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

pub const DEFAULT_THEME: &str = "InspiredGitHub";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Short names authors use in fence info strings.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("html", "markup"),
    ("xml", "markup"),
    ("svg", "markup"),
    ("vue", "markup"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("golang", "go"),
    ("c++", "cpp"),
    ("cs", "csharp"),
    ("kt", "kotlin"),
];

/// Canonical name → grammar lookup token.
const GRAMMAR_TOKENS: &[(&str, &str)] = &[
    ("javascript", "js"),
    // No TypeScript grammar ships by default; JS covers most of it
    ("typescript", "js"),
    ("markup", "html"),
    ("csharp", "cs"),
    ("bash", "sh"),
];

/// Resolve an alias to its canonical language name (lowercased).
pub fn canonical_language(lang: &str) -> String {
    let lower = lang.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map_or(lower, |(_, canonical)| (*canonical).to_string())
}

fn find_syntax(canonical: &str) -> Option<&'static SyntaxReference> {
    let token = GRAMMAR_TOKENS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map_or(canonical, |(_, token)| *token);
    SYNTAXES.find_syntax_by_token(token)
}

/// Whether `lang` (or its alias) has a registered grammar.
pub fn is_supported(lang: &str) -> bool {
    find_syntax(&canonical_language(lang)).is_some()
}

pub fn is_known_theme(name: &str) -> bool {
    THEMES.themes.contains_key(name)
}

/// Built-in highlighting theme names, sorted.
pub fn theme_names() -> Vec<&'static str> {
    THEMES.themes.keys().map(String::as_str).collect()
}

fn theme_for(name: &str) -> Option<&'static Theme> {
    THEMES
        .themes
        .get(name)
        .or_else(|| THEMES.themes.get(DEFAULT_THEME))
}

// ============================================================================
// Rendering
// ============================================================================

/// Highlight `code` as `lang`. Never fails.
pub fn highlight(code: &str, lang: &str, ctx: &mut RenderContext<'_>) -> String {
    let canonical = canonical_language(lang);
    let line_numbers = ctx.config.line_numbers;

    if canonical.is_empty() {
        return plain(code, "", line_numbers);
    }
    let Some(syntax) = find_syntax(&canonical) else {
        ctx.warn(
            WarningKind::UnknownLanguage,
            format!("no highlighter for `{lang}`"),
        );
        return plain(code, &canonical, line_numbers);
    };
    let Some(theme) = theme_for(&ctx.config.code_theme) else {
        return plain(code, &canonical, line_numbers);
    };

    match highlight_lines(code, syntax, theme) {
        Ok(lines) => wrap(&lines, &canonical, line_numbers),
        Err(e) => {
            ctx.warn(WarningKind::Highlight, format!("`{lang}`: {e}"));
            plain(code, &canonical, line_numbers)
        }
    }
}

fn highlight_lines(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
) -> Result<Vec<String>, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();

    for line in LinesWithEndings::from(trim_final_newline(code)) {
        let regions = highlighter.highlight_line(line, &SYNTAXES)?;
        // The gutter layout puts its own newline between lines
        let regions: Vec<(Style, &str)> = regions
            .into_iter()
            .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        lines.push(styled_line_to_highlighted_html(&regions, IncludeBackground::No)?);
    }
    Ok(lines)
}

fn trim_final_newline(code: &str) -> &str {
    code.strip_suffix('\n').unwrap_or(code)
}

fn plain(code: &str, lang: &str, line_numbers: bool) -> String {
    let lines: Vec<String> = trim_final_newline(code)
        .split('\n')
        .map(|line| escape(line).into_owned())
        .collect();
    wrap(&lines, lang, line_numbers)
}

fn wrap(lines: &[String], lang: &str, line_numbers: bool) -> String {
    let class = if lang.is_empty() {
        String::new()
    } else {
        format!(" class=\"language-{}\"", escape(lang))
    };
    let pre_class = if lang.is_empty() {
        "code-block".to_string()
    } else {
        format!("code-block language-{}", escape(lang))
    };

    let mut out = format!("<pre class=\"{pre_class}\"><code{class}>");
    for (i, line) in lines.iter().enumerate() {
        out.push_str("<span class=\"code-line\">");
        if line_numbers {
            out.push_str(&format!("<span class=\"line-number\">{}</span>", i + 1));
        }
        out.push_str(line);
        out.push_str("</span>\n");
    }
    out.push_str("</code></pre>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::theme::FixedTheme;

    fn run(code: &str, lang: &str, config: &RenderConfig) -> (String, usize) {
        let theme = FixedTheme::default();
        let mut ctx = RenderContext::new(config, &theme);
        let html = highlight(code, lang, &mut ctx);
        (html, ctx.warnings.len())
    }

    #[test]
    fn test_aliases() {
        assert_eq!(canonical_language("js"), "javascript");
        assert_eq!(canonical_language("TS"), "typescript");
        assert_eq!(canonical_language("svg"), "markup");
        assert_eq!(canonical_language("sh"), "bash");
        assert_eq!(canonical_language("rust"), "rust");
    }

    #[test]
    fn test_supported_languages() {
        for lang in ["js", "ts", "py", "sh", "html", "rust", "json", "css"] {
            assert!(is_supported(lang), "{lang}");
        }
        assert!(!is_supported("foobar"));
    }

    #[test]
    fn test_themes() {
        assert!(is_known_theme(DEFAULT_THEME));
        assert!(theme_names().contains(&"base16-ocean.dark"));
        assert!(!is_known_theme("nope"));
    }

    #[test]
    fn test_highlight_with_gutter() {
        let (html, warnings) = run("let x = 1;\nlet y = 2;\n", "rust", &RenderConfig::default());
        assert_eq!(warnings, 0);
        assert!(html.starts_with("<pre class=\"code-block language-rust\"><code class=\"language-rust\">"));
        assert_eq!(html.matches("class=\"code-line\"").count(), 2);
        assert!(html.contains("<span class=\"line-number\">2</span>"));
        assert!(html.contains("style=\""));
    }

    #[test]
    fn test_no_gutter() {
        let config = RenderConfig {
            line_numbers: false,
            ..Default::default()
        };
        let (html, _) = run("x", "py", &config);
        assert!(!html.contains("line-number"));
    }

    #[test]
    fn test_unknown_language_escaped() {
        let (html, warnings) = run("<b>&</b>\n", "foobar", &RenderConfig::default());
        assert_eq!(warnings, 1);
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(html.contains("language-foobar"));
    }

    #[test]
    fn test_no_language_no_warning() {
        let (html, warnings) = run("<x>", "", &RenderConfig::default());
        assert_eq!(warnings, 0);
        assert!(html.starts_with("<pre class=\"code-block\"><code>"));
        assert!(html.contains("&lt;x&gt;"));
    }
}
