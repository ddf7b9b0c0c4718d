//! Code fence dispatch.
//!
//! Each fenced block is offered to an ordered chain of [`FenceRule`]s. A rule
//! either renders the fence itself or hands it to the rest of the chain via
//! [`Next`]. The built-in order is:
//!
//! ```text
//! custom rules.. → EmbedRule → CarouselRule → DiagramRule → HighlightRule
//! ```
//!
//! Directive tags are matched case-sensitively against the first word of the
//! info string. Anything unclaimed ends in [`HighlightRule`].

mod carousel;
mod diagram;
mod embed;

pub use carousel::{CarouselImage, CarouselRule, parse_carousel, parse_carousel_line};
pub use diagram::{DiagramRule, diagram_id};
pub use embed::{EMBEDS, EmbedKind, EmbedRule};

use super::context::{RenderContext, Transform};
use super::highlight;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

/// A fenced (or indented) code block.
#[derive(Debug, Clone, Copy)]
pub struct Fence<'f> {
    /// Full info string.
    pub info: &'f str,
    /// First word of the info string; empty for indented blocks.
    pub tag: &'f str,
    /// Raw block content.
    pub content: &'f str,
}

impl<'f> Fence<'f> {
    pub fn new(info: &'f str, content: &'f str) -> Self {
        let info = info.trim();
        let tag = info.split_whitespace().next().unwrap_or("");
        Self { info, tag, content }
    }
}

/// One link in the fence chain.
pub trait FenceRule: Send + Sync {
    fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String;
}

/// The rules after the current one.
pub struct Next<'n> {
    rules: &'n [Box<dyn FenceRule>],
}

impl Next<'_> {
    /// Delegate to the remaining rules.
    pub fn run(self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>) -> String {
        match self.rules.split_first() {
            Some((rule, rest)) => rule.render(fence, ctx, Next { rules: rest }),
            // Chain exhausted: plain escaped block
            None => highlight::highlight(fence.content, "", ctx),
        }
    }
}

/// Ordered fence rules.
pub struct FenceChain {
    rules: Vec<Box<dyn FenceRule>>,
    custom: usize,
}

impl FenceChain {
    /// Directive rules followed by highlighting.
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                Box::new(EmbedRule),
                Box::new(CarouselRule),
                Box::new(DiagramRule),
                Box::new(HighlightRule),
            ],
            custom: 0,
        }
    }

    /// Register a rule ahead of the built-ins, after earlier custom rules.
    pub fn register(&mut self, rule: impl FenceRule + 'static) {
        self.rules.insert(self.custom, Box::new(rule));
        self.custom += 1;
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>) -> String {
        Next { rules: &self.rules }.run(fence, ctx)
    }
}

impl Default for FenceChain {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Terminal rule: syntax-highlighted code.
pub struct HighlightRule;

impl FenceRule for HighlightRule {
    fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, _next: Next<'_>) -> String {
        highlight::highlight(fence.content, fence.tag, ctx)
    }
}

// ============================================================================
// Event stage
// ============================================================================

/// Replaces code block events with the chain's output.
pub struct FenceTransform<'c> {
    pub chain: &'c FenceChain,
}

impl Transform for FenceTransform<'_> {
    fn transform<'a>(&self, events: Vec<Event<'a>>, ctx: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut open: Option<(CowStr<'a>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) if open.is_none() => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => info,
                        CodeBlockKind::Indented => CowStr::Borrowed(""),
                    };
                    open = Some((info, String::new()));
                }
                Event::End(TagEnd::CodeBlock) if open.is_some() => {
                    if let Some((info, content)) = open.take() {
                        let fence = Fence::new(&info, &content);
                        let html = self.chain.render(&fence, ctx);
                        out.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) | Event::Code(text)
                    if open.is_some() =>
                {
                    if let Some((_, content)) = open.as_mut() {
                        content.push_str(&text);
                    }
                }
                _ if open.is_some() => {}
                event => out.push(event),
            }
        }

        // Parser always closes blocks, but never lose content
        if let Some((info, content)) = open {
            let fence = Fence::new(&info, &content);
            out.push(Event::Html(CowStr::from(self.chain.render(&fence, ctx))));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::theme::FixedTheme;

    struct Shout;

    impl FenceRule for Shout {
        fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String {
            if fence.tag == "shout" {
                format!("<p>{}</p>", fence.content.to_uppercase())
            } else {
                next.run(fence, ctx)
            }
        }
    }

    struct Wrap;

    impl FenceRule for Wrap {
        fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String {
            format!("<div class=\"wrap\">{}</div>", next.run(fence, ctx))
        }
    }

    fn render(chain: &FenceChain, info: &str, content: &str) -> String {
        let config = RenderConfig::default();
        let theme = FixedTheme::default();
        let mut ctx = RenderContext::new(&config, &theme);
        chain.render(&Fence::new(info, content), &mut ctx)
    }

    #[test]
    fn test_fence_tag_is_first_word() {
        let fence = Fence::new("  rust ignore ", "x");
        assert_eq!(fence.tag, "rust");
        assert_eq!(fence.info, "rust ignore");
        assert_eq!(Fence::new("", "x").tag, "");
    }

    #[test]
    fn test_custom_rule_runs_first() {
        let mut chain = FenceChain::builtin();
        chain.register(Shout);
        assert_eq!(chain.len(), 5);
        assert_eq!(render(&chain, "shout", "hi"), "<p>HI</p>");
    }

    #[test]
    fn test_custom_rule_delegates() {
        let mut chain = FenceChain::builtin();
        chain.register(Wrap);
        chain.register(Shout);

        // Wrap was registered first, so it wraps Shout's output
        assert_eq!(render(&chain, "shout", "a"), "<div class=\"wrap\"><p>A</p></div>");

        let html = render(&chain, "steam-game", "https://store.steampowered.com/app/1");
        assert!(html.starts_with("<div class=\"wrap\"><SteamGameBlock"));
    }

    #[test]
    fn test_empty_chain_escapes() {
        let chain = FenceChain {
            rules: Vec::new(),
            custom: 0,
        };
        let html = render(&chain, "mermaid", "<x>");
        assert!(html.contains("&lt;x&gt;"));
        assert!(!html.contains("mermaid"));
    }
}
