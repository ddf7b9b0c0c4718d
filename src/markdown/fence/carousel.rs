//! `carousel` fences: one image per line.
//!
//! Accepted line forms, tried in order:
//!
//! 1. `![alt](path "title")`, title optional
//! 2. `path | description`
//! 3. bare `path`, only with an image extension or an absolute/network URL
//!
//! Lines matching none of them are dropped. Each drop is reported as a
//! [`WarningKind::CarouselLine`] so authors can find truncated carousels.
//!
//! Paths are serialized as written; the mounting component resolves them
//! against the image root.

use super::{Fence, FenceRule, Next};
use crate::markdown::context::{RenderContext, WarningKind};
use crate::utils::html::escape;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)$"#).unwrap()
});

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "avif", "ico",
];

/// One carousel slide. Serialized into the `:images` prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselImage {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub description: String,
}

fn has_image_extension(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

fn file_name(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

/// Parse one line. `src` is returned as written; no rewriting.
pub fn parse_carousel_line(line: &str) -> Option<CarouselImage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = MARKDOWN_IMAGE.captures(line) {
        let alt = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let title = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| alt.clone());
        return Some(CarouselImage {
            src: caps[2].to_string(),
            alt,
            description: title.clone(),
            title,
        });
    }

    if let Some((path, description)) = line.split_once('|') {
        let (path, description) = (path.trim(), description.trim());
        if path.is_empty() || path.contains(char::is_whitespace) {
            return None;
        }
        return Some(CarouselImage {
            src: path.to_string(),
            alt: description.to_string(),
            title: description.to_string(),
            description: description.to_string(),
        });
    }

    if !line.contains(char::is_whitespace) && (has_image_extension(line) || is_url(line)) {
        return Some(CarouselImage {
            src: line.to_string(),
            alt: file_name(line).to_string(),
            title: String::new(),
            description: String::new(),
        });
    }

    None
}

/// Parse fence content; returns the images and the rejected lines.
pub fn parse_carousel(content: &str) -> (Vec<CarouselImage>, Vec<&str>) {
    let mut images = Vec::new();
    let mut rejected = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match parse_carousel_line(line) {
            Some(image) => images.push(image),
            None => rejected.push(line.trim()),
        }
    }
    (images, rejected)
}

pub struct CarouselRule;

impl FenceRule for CarouselRule {
    fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String {
        if fence.tag != "carousel" {
            return next.run(fence, ctx);
        }

        let (images, rejected) = parse_carousel(fence.content);
        for line in rejected {
            ctx.warn(
                WarningKind::CarouselLine,
                format!("carousel line dropped: `{line}`"),
            );
        }

        // Vec of plain strings cannot fail to serialize
        let json = serde_json::to_string(&images).unwrap_or_else(|_| "[]".to_string());
        format!(
            "<ImageCarousel :images=\"JSON.parse('{}')\" />\n",
            escape(&json)
        )
    }
}
