//! Markdown → HTML.
//!
//! # Pipeline
//!
//! ```text
//! source
//!   │ front matter stripped, newlines normalized, `<!-- more -->` removed
//!   │ colored spans `*&..&*` swapped for markers      (span::extract)
//!   ▼
//! pulldown-cmark events
//!   │ SpanTransform     markers → <span style="color:red">
//!   │ MathTransform     $..$ / $$..$$ → MathML
//!   │ FenceTransform    directives, diagrams, highlighted code
//!   │ LinkifyTransform  bare URLs → links
//!   │ ImageTransform    relative src → image root
//!   ▼
//! HTML (with placeholder components for the hydrator)
//! ```
//!
//! Rendering is total: every recoverable failure is replaced by a visible
//! fallback and reported in [`RenderOutput::warnings`].

mod context;
mod diagram;
pub mod fence;
pub mod frontmatter;
pub mod highlight;
mod image;
mod linkify;
mod math;
mod normalize;
mod span;


pub use context::{DiagramBlock, RenderContext, RenderWarning, Transform, WarningKind};
pub use diagram::{DiagramBoard, init_directive};
pub use fence::{CarouselImage, Fence, FenceChain, FenceRule, Next};
pub use frontmatter::PostMeta;
pub use image::rewrite_image_src;
pub use math::render_math;
pub use normalize::strip_excerpt_marker;

use crate::config::RenderConfig;
use crate::theme::{FixedTheme, ThemeSource};
use context::Pipeline;
use fence::FenceTransform;
use image::ImageTransform;
use linkify::LinkifyTransform;
use math::MathTransform;
use pulldown_cmark::{Event, Options, Parser, TextMergeStream, html};
use serde::Serialize;
use span::SpanTransform;
use std::sync::Arc;

/// Parser extensions.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// `# Heading {#custom-id}`
    pub heading_attributes: bool,
    pub math: bool,
    /// Turn bare `http(s)://` URLs into links.
    pub linkify: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            math: true,
            linkify: true,
        }
    }
}

impl MarkdownOptions {
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.math {
            opts.insert(Options::ENABLE_MATH);
        }
        opts
    }
}

/// Everything one render produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub diagrams: Vec<DiagramBlock>,
    pub warnings: Vec<RenderWarning>,
}

/// Configured renderer. Cheap to share across threads.
pub struct Renderer {
    config: RenderConfig,
    theme: Arc<dyn ThemeSource>,
    fences: FenceChain,
    options: MarkdownOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default(), Arc::new(FixedTheme::default()))
    }
}

impl Renderer {
    pub fn new(config: RenderConfig, theme: Arc<dyn ThemeSource>) -> Self {
        Self {
            config,
            theme,
            fences: FenceChain::builtin(),
            options: MarkdownOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MarkdownOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a fence rule ahead of the built-in ones.
    pub fn with_fence_rule(mut self, rule: impl FenceRule + 'static) -> Self {
        self.fences.register(rule);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn theme(&self) -> &Arc<dyn ThemeSource> {
        &self.theme
    }

    /// Render to HTML. Never fails.
    pub fn render(&self, source: &str) -> String {
        self.render_full(source).html
    }

    /// Render a post, returning its front matter as well.
    pub fn render_post(&self, source: &str) -> (PostMeta, RenderOutput) {
        let normalized = normalize::normalize_newlines(source);
        let (meta, _) = frontmatter::extract(&normalized);
        (meta, self.render_full(&normalized))
    }

    pub fn render_full(&self, source: &str) -> RenderOutput {
        let normalized = normalize::normalize_newlines(source);
        let body = frontmatter::strip(&normalized);
        let body = if self.config.strip_excerpt_marker {
            normalize::strip_excerpt_marker(body)
        } else {
            body.into()
        };

        let options = self.options.to_pulldown_options();
        let mut ctx = RenderContext::new(&self.config, self.theme.as_ref());
        let mut spans = Vec::new();
        let text = span::extract(&body, options, &mut spans);
        ctx.spans = spans;

        let events: Vec<Event<'_>> = TextMergeStream::new(Parser::new_ext(&text, options)).collect();
        let mut pipeline = Pipeline::new(events, &mut ctx)
            .pipe(SpanTransform)
            .pipe(MathTransform)
            .pipe(FenceTransform {
                chain: &self.fences,
            });
        if self.options.linkify {
            pipeline = pipeline.pipe(LinkifyTransform);
        }
        let events = pipeline.pipe(ImageTransform).into_inner();

        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        if !ctx.warnings.is_empty() {
            crate::debug!("render"; "{} recoverable issue(s)", ctx.warnings.len());
        }
        RenderOutput {
            html: out,
            diagrams: ctx.diagrams,
            warnings: ctx.warnings,
        }
    }
}

/// Render with default settings and the `day` palette.
pub fn render(source: &str) -> String {
    Renderer::default().render(source)
}
