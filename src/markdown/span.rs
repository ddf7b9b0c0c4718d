//! Colored text spans: `*&text&*` → `<span style="color:red">text</span>`.
//!
//! The syntax shares its lead character with emphasis, so it is resolved
//! before the source reaches the CommonMark parser: each matched span is
//! swapped for a private-use marker (`U+E000 index U+E001`) and its content
//! is stored in [`RenderContext::spans`]. [`SpanTransform`] then expands the
//! markers found in text events.
//!
//! Matching rules:
//! - the closer is the nearest `&*` after the opener (non-greedy)
//! - opener and closer sit in the same paragraph, heading, table cell or
//!   list item
//! - a span never crosses code, math or raw HTML
//! - `\*&` is not an opener
//! - an opener without a closer stays literal text

use super::context::{RenderContext, Transform};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::ops::Range;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

const SPAN_OPEN_HTML: &str = "<span style=\"color:red\">";
const SPAN_CLOSE_HTML: &str = "</span>";

// ============================================================================
// Source pre-pass
// ============================================================================

/// Block layout of the source as the parser sees it.
struct Layout {
    /// Where span syntax is inert (code, math, HTML).
    protected: Vec<Range<usize>>,
    /// Elements holding inline content; a span stays inside one of them.
    containers: Vec<Range<usize>>,
}

impl Layout {
    fn scan(source: &str, options: Options) -> Self {
        let mut protected = Vec::new();
        let mut containers = Vec::new();
        for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
            match event {
                Event::Code(_)
                | Event::InlineMath(_)
                | Event::DisplayMath(_)
                | Event::Html(_)
                | Event::InlineHtml(_)
                | Event::Start(Tag::CodeBlock(_) | Tag::HtmlBlock) => protected.push(range),
                Event::Start(
                    Tag::Paragraph | Tag::Heading { .. } | Tag::TableCell | Tag::Item,
                ) => containers.push(range),
                _ => {}
            }
        }
        Self {
            protected,
            containers,
        }
    }

    fn is_protected(&self, pos: usize) -> bool {
        self.protected.iter().any(|r| r.contains(&pos))
    }

    /// Innermost container holding `pos`.
    fn container_of(&self, pos: usize) -> Option<&Range<usize>> {
        self.containers
            .iter()
            .filter(|r| r.contains(&pos))
            .max_by_key(|r| (r.start, std::cmp::Reverse(r.end)))
    }
}

fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    bytes[..pos].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

/// Nearest `&*` for the opener at `open`, if it closes in the same container.
fn find_closer(source: &str, open: usize, layout: &Layout) -> Option<usize> {
    let container = layout.container_of(open)?;
    let from = open + 2;
    let close = from + source[from..].find("&*")?;

    let same_container = layout.container_of(close) == Some(container) && close + 2 <= container.end;
    let crosses_protected = layout
        .protected
        .iter()
        .any(|r| r.start < close + 2 && r.end > from);

    (same_container && !crosses_protected).then_some(close)
}

/// Replace every `*&..&*` span with a marker, appending contents to `table`.
pub fn extract<'s>(source: &'s str, options: Options, table: &mut Vec<String>) -> Cow<'s, str> {
    let source: Cow<'s, str> = if source.contains([OPEN, CLOSE]) {
        // Markers are reserved for this pass
        Cow::Owned(source.replace([OPEN, CLOSE], "\u{FFFD}"))
    } else {
        Cow::Borrowed(source)
    };
    if !source.contains("*&") {
        return source;
    }

    let layout = Layout::scan(&source, options);
    let bytes = source.as_bytes();

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    let mut cursor = 0;

    while let Some(rel) = source[cursor..].find("*&") {
        let start = cursor + rel;
        if layout.is_protected(start) || is_escaped(bytes, start) {
            cursor = start + 1;
            continue;
        }
        let Some(close) = find_closer(&source, start, &layout) else {
            cursor = start + 2;
            continue;
        };

        out.push_str(&source[last..start]);
        out.push(OPEN);
        out.push_str(&table.len().to_string());
        out.push(CLOSE);
        table.push(source[start + 2..close].to_string());

        last = close + 2;
        cursor = last;
    }

    if last == 0 {
        return source;
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

// ============================================================================
// Marker expansion
// ============================================================================

/// A piece of text split at markers.
enum Piece<'t> {
    Text(&'t str),
    Span(usize),
}

fn split_markers(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(OPEN) {
        let after = &rest[open + OPEN.len_utf8()..];
        let Some(close) = after.find(CLOSE) else {
            break;
        };
        let Ok(index) = after[..close].parse::<usize>() else {
            break;
        };
        if open > 0 {
            pieces.push(Piece::Text(&rest[..open]));
        }
        pieces.push(Piece::Span(index));
        rest = &after[close + CLOSE.len_utf8()..];
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    pieces
}

/// Put the original `*&..&*` syntax back (for URLs and titles).
pub fn restore(text: &str, spans: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in split_markers(text) {
        match piece {
            Piece::Text(t) => out.push_str(t),
            Piece::Span(i) => {
                out.push_str("*&");
                out.push_str(spans.get(i).map_or("", String::as_str));
                out.push_str("&*");
            }
        }
    }
    out
}

fn restore_cow<'a>(text: CowStr<'a>, spans: &[String]) -> CowStr<'a> {
    if text.contains(OPEN) {
        CowStr::from(restore(&text, spans))
    } else {
        text
    }
}

/// Expands span markers left by [`extract`].
pub struct SpanTransform;

impl Transform for SpanTransform {
    fn transform<'a>(&self, events: Vec<Event<'a>>, ctx: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        if ctx.spans.is_empty() {
            return events;
        }
        let spans = &ctx.spans;
        let mut out = Vec::with_capacity(events.len());
        // Inside image alt text only plain text is allowed
        let mut image_depth = 0usize;

        for event in events {
            match event {
                Event::Text(text) if text.contains(OPEN) => {
                    for piece in split_markers(&text) {
                        match piece {
                            Piece::Text(t) => out.push(Event::Text(CowStr::from(t.to_string()))),
                            Piece::Span(i) => {
                                let content = spans.get(i).cloned().unwrap_or_default();
                                if image_depth > 0 {
                                    out.push(Event::Text(content.into()));
                                } else {
                                    out.push(Event::InlineHtml(SPAN_OPEN_HTML.into()));
                                    out.push(Event::Text(content.into()));
                                    out.push(Event::InlineHtml(SPAN_CLOSE_HTML.into()));
                                }
                            }
                        }
                    }
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    image_depth += 1;
                    out.push(Event::Start(Tag::Image {
                        link_type,
                        dest_url: restore_cow(dest_url, spans),
                        title: restore_cow(title, spans),
                        id,
                    }));
                }
                Event::End(TagEnd::Image) => {
                    image_depth = image_depth.saturating_sub(1);
                    out.push(Event::End(TagEnd::Image));
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => out.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url: restore_cow(dest_url, spans),
                    title: restore_cow(title, spans),
                    id,
                })),
                other => out.push(other),
            }
        }
        out
    }
}
