//! Per-render state shared by all stages.

use crate::config::RenderConfig;
use crate::theme::ThemeSource;
use pulldown_cmark::Event;
use serde::Serialize;
use std::fmt;

/// Class of a recovered render failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Fence language with no highlighter.
    UnknownLanguage,
    /// Highlighter failed mid-block.
    Highlight,
    /// LaTeX that could not be converted.
    Math,
    /// Carousel line matching none of the accepted forms.
    CarouselLine,
}

/// A recovered failure. The HTML already contains a safe fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// A diagram placeholder emitted by the render, rendered later on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramBlock {
    pub id: String,
    pub source: String,
    /// Theme name current when the block was emitted.
    pub theme: String,
    /// The exact element written into the output.
    pub html: String,
}

/// State for one `render` call. Created fresh each time and dropped after.
pub struct RenderContext<'r> {
    pub config: &'r RenderConfig,
    pub theme: &'r dyn ThemeSource,
    /// Colored-span contents, indexed by the markers left in the source.
    pub spans: Vec<String>,
    pub diagrams: Vec<DiagramBlock>,
    pub warnings: Vec<RenderWarning>,
}

impl<'r> RenderContext<'r> {
    pub fn new(config: &'r RenderConfig, theme: &'r dyn ThemeSource) -> Self {
        Self {
            config,
            theme,
            spans: Vec::new(),
            diagrams: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a recovered failure.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        crate::debug!("render"; "{:?}: {}", kind, message);
        self.warnings.push(RenderWarning { kind, message });
    }
}

// ============================================================================
// Event pipeline
// ============================================================================

/// One stage over the event stream.
pub trait Transform {
    fn transform<'a>(&self, events: Vec<Event<'a>>, ctx: &mut RenderContext<'_>) -> Vec<Event<'a>>;
}

/// Runs stages in the order they are piped.
pub struct Pipeline<'a, 'c, 'r> {
    events: Vec<Event<'a>>,
    ctx: &'c mut RenderContext<'r>,
}

impl<'a, 'c, 'r> Pipeline<'a, 'c, 'r> {
    pub fn new(events: Vec<Event<'a>>, ctx: &'c mut RenderContext<'r>) -> Self {
        Self { events, ctx }
    }

    pub fn pipe(self, stage: impl Transform) -> Self {
        let events = stage.transform(self.events, self.ctx);
        Self {
            events,
            ctx: self.ctx,
        }
    }

    pub fn into_inner(self) -> Vec<Event<'a>> {
        self.events
    }
}
