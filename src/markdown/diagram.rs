//! Theme-aware diagram materialization.
//!
//! The render pass only emits inert `<div class="mermaid">` containers. A
//! [`DiagramBoard`] owns the diagrams of one page and turns each into a
//! container whose source carries a mermaid `%%{init}%%` directive derived
//! from the current palette. On every theme change all diagrams are rebuilt
//! from their original source, so the last change always wins.

use super::context::DiagramBlock;
use crate::theme::{SubscriptionId, ThemePalette, ThemeStore};
use crate::utils::html::escape;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Palette key → mermaid theme variable.
const THEME_VARIABLES: &[(&str, &str)] = &[
    ("primaryColor", "primary"),
    ("primaryTextColor", "buttonText"),
    ("primaryBorderColor", "panelBorder"),
    ("secondaryColor", "secondary"),
    ("tertiaryColor", "accent"),
    ("background", "bodyBackground"),
    ("mainBkg", "panelBackground"),
    ("noteBkgColor", "panelBackground"),
    ("textColor", "bodyText"),
    ("lineColor", "bodyText"),
];

/// Mermaid `init` directive for `palette`.
pub fn init_directive(palette: &ThemePalette) -> String {
    let mut variables = Map::new();
    variables.insert("darkMode".into(), Value::Bool(palette.is_dark()));
    for (variable, key) in THEME_VARIABLES {
        if let Some(color) = palette.color(key) {
            variables.insert((*variable).into(), Value::String(color.to_string()));
        }
    }
    let init = json!({ "theme": "base", "themeVariables": variables });
    format!("%%{{init: {init}}}%%")
}

#[derive(Debug, Clone)]
struct Materialized {
    block: DiagramBlock,
    html: String,
}

/// Diagrams of one rendered page.
#[derive(Debug, Default)]
pub struct DiagramBoard {
    diagrams: Vec<Materialized>,
    theme: String,
    generation: u64,
}

impl DiagramBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `blocks` and draw them with `palette`.
    pub fn materialize(&mut self, blocks: &[DiagramBlock], palette: &ThemePalette) {
        self.diagrams = blocks
            .iter()
            .map(|block| Materialized {
                block: block.clone(),
                html: String::new(),
            })
            .collect();
        self.rerender_all(palette);
    }

    /// Rebuild every diagram from source.
    pub fn rerender_all(&mut self, palette: &ThemePalette) {
        self.generation += 1;
        self.theme = palette.name.clone();
        let directive = init_directive(palette);

        for diagram in &mut self.diagrams {
            diagram.html = format!(
                "<div class=\"mermaid\" id=\"{}\" data-theme=\"{}\" data-generation=\"{}\">{}\n{}</div>",
                diagram.block.id,
                escape(&palette.name),
                self.generation,
                escape(&directive),
                escape(&diagram.block.source),
            );
        }
        crate::debug!(
            "render";
            "diagrams: {} redrawn for '{}' (generation {})",
            self.diagrams.len(),
            self.theme,
            self.generation
        );
    }

    /// Replace emitted placeholders in `html` with the drawn diagrams.
    pub fn inject(&self, html: &str) -> String {
        self.diagrams.iter().fold(html.to_string(), |out, diagram| {
            out.replacen(&diagram.block.html, &diagram.html, 1)
        })
    }

    /// Drawn HTML for diagram `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.diagrams
            .iter()
            .find(|d| d.block.id == id)
            .map(|d| d.html.as_str())
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    /// Name of the palette the diagrams were last drawn with.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Number of redraws so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Redraw `board` whenever `store` swaps palettes.
    pub fn attach(board: &Arc<Mutex<DiagramBoard>>, store: &ThemeStore) -> SubscriptionId {
        let board = Arc::clone(board);
        store.subscribe(move |change| board.lock().rerender_all(&change.palette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;

    fn block(id: &str, source: &str) -> DiagramBlock {
        let html = format!("<div class=\"mermaid\" id=\"{id}\" data-theme=\"day\">{source}</div>");
        DiagramBlock {
            id: id.into(),
            source: source.into(),
            theme: "day".into(),
            html,
        }
    }

    #[test]
    fn test_init_directive_uses_palette() {
        let palette = ThemePalette::dark();
        let directive = init_directive(&palette);
        assert!(directive.starts_with("%%{init: {\"theme\":\"base\""));
        assert!(directive.contains("\"darkMode\":true"));
        assert!(directive.contains(palette.color("primary").unwrap()));
        assert!(directive.ends_with("}%%"));
    }

    #[test]
    fn test_materialize_and_inject() {
        let blocks = [block("mermaid-a", "graph TD"), block("mermaid-b", "graph LR")];
        let page = format!("<p>x</p>{}{}", blocks[0].html, blocks[1].html);

        let mut board = DiagramBoard::new();
        board.materialize(&blocks, &ThemePalette::day());
        let out = board.inject(&page);

        assert_eq!(out.matches("data-generation=\"1\"").count(), 2);
        assert!(out.contains("graph LR"));
        assert!(out.starts_with("<p>x</p>"));
    }

    #[test]
    fn test_last_theme_change_wins() {
        let store = ThemeStore::default();
        let board = Arc::new(Mutex::new(DiagramBoard::new()));
        board
            .lock()
            .materialize(&[block("mermaid-a", "graph TD")], &store.current());
        DiagramBoard::attach(&board, &store);

        store.set_mode(ThemeMode::Dark);
        store.set_mode(ThemeMode::Light);
        store.set_mode(ThemeMode::Dark);

        let board = board.lock();
        assert_eq!(board.theme(), "dark");
        assert_eq!(board.generation(), 4);
        assert!(board.get("mermaid-a").unwrap().contains("data-theme=\"dark\""));
    }
}
