//! Bare URL autolinking (`see https://example.com.` → link).

use super::context::{RenderContext, Transform};
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).unwrap());

/// Sentence punctuation is not part of a trailing URL.
fn trim_url(url: &str) -> &str {
    let mut url = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '*', '_', '~']);
    // Keep balanced parentheses (`wiki/Foo_(bar)`), drop an unmatched closer
    while url.ends_with(')') && url.matches('(').count() < url.matches(')').count() {
        url = &url[..url.len() - 1];
    }
    url
}

fn has_host(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| url.host_str().is_some_and(|h| !h.is_empty()))
}

pub struct LinkifyTransform;

impl Transform for LinkifyTransform {
    fn transform<'a>(&self, events: Vec<Event<'a>>, _ctx: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut link_depth = 0usize;

        for event in events {
            match event {
                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    link_depth += 1;
                    out.push(Event::Start(tag));
                }
                Event::End(end @ (TagEnd::Link | TagEnd::Image)) => {
                    link_depth = link_depth.saturating_sub(1);
                    out.push(Event::End(end));
                }
                Event::Text(text) if link_depth == 0 && text.contains("://") => {
                    linkify(&text, &mut out);
                }
                other => out.push(other),
            }
        }
        out
    }
}

fn linkify<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for m in URL.find_iter(text) {
        let url = trim_url(m.as_str());
        if !has_host(url) {
            continue;
        }
        if m.start() > last {
            out.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.to_string()),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = m.start() + url.len();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}
