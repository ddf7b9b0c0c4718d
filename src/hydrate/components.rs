//! Static stand-ins for the placeholder components.
//!
//! They turn placeholders into plain HTML so rendered posts work without a
//! client-side runtime.

use super::props::{PropKind, Props};
use super::{Component, ComponentMap, Widget};
use crate::markdown::{CarouselImage, rewrite_image_src};
use crate::utils::html::escape;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static BVID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"BV[0-9A-Za-z]{10}").unwrap());

/// Link card for an external page.
struct LinkCard {
    kind: &'static str,
    label: &'static str,
    prop: &'static str,
    schema: [(&'static str, PropKind); 1],
}

impl LinkCard {
    const fn new(kind: &'static str, label: &'static str, prop: &'static str) -> Self {
        Self {
            kind,
            label,
            prop,
            schema: [(prop, PropKind::Text)],
        }
    }
}

struct StaticHtml(String);

impl Widget for StaticHtml {
    fn render(&self) -> String {
        self.0.clone()
    }
}

fn card_html(kind: &str, label: &str, url: &str) -> String {
    format!(
        "<div class=\"embed-card embed-{kind}\"><a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{label}</a></div>",
        url = escape(url),
        label = escape(label),
    )
}

impl Component for LinkCard {
    fn schema(&self) -> &[(&'static str, PropKind)] {
        &self.schema
    }

    fn mount(&self, props: &Props) -> Box<dyn Widget> {
        let url = props.text(self.prop).unwrap_or_default();
        Box::new(StaticHtml(card_html(self.kind, self.label, url)))
    }
}

/// Bilibili player when a BV id is present, link card otherwise.
struct BilibiliVideo;

impl Component for BilibiliVideo {
    fn schema(&self) -> &[(&'static str, PropKind)] {
        &[("videoUrl", PropKind::Text)]
    }

    fn mount(&self, props: &Props) -> Box<dyn Widget> {
        let url = props.text("videoUrl").unwrap_or_default();
        let html = match BVID.find(url) {
            Some(bvid) => format!(
                "<div class=\"embed-card embed-bilibili\"><iframe src=\"//player.bilibili.com/player.html?bvid={}&amp;autoplay=0\" allowfullscreen loading=\"lazy\"></iframe></div>",
                bvid.as_str()
            ),
            None => card_html("bilibili", "Bilibili video", url),
        };
        Box::new(StaticHtml(html))
    }
}

/// Slides keep their authored paths; relative ones resolve under `image_root`.
struct ImageCarousel {
    image_root: String,
}

impl Component for ImageCarousel {
    fn schema(&self) -> &[(&'static str, PropKind)] {
        &[("images", PropKind::Json)]
    }

    fn mount(&self, props: &Props) -> Box<dyn Widget> {
        let images: Vec<CarouselImage> = props
            .json("images")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        let mut html = String::from("<div class=\"image-carousel\">");
        for image in &images {
            html.push_str(&format!(
                "<figure><img src=\"{}\" alt=\"{}\" title=\"{}\" loading=\"lazy\" />",
                escape(&rewrite_image_src(&image.src, &self.image_root)),
                escape(&image.alt),
                escape(&image.title)
            ));
            if !image.description.is_empty() {
                html.push_str(&format!("<figcaption>{}</figcaption>", escape(&image.description)));
            }
            html.push_str("</figure>");
        }
        html.push_str("</div>");
        Box::new(StaticHtml(html))
    }
}

/// Components for every placeholder the renderer emits.
pub fn default_components(image_root: &str) -> ComponentMap {
    let cards: [(&str, LinkCard); 4] = [
        ("SteamGameBlock", LinkCard::new("steam", "Steam game", "gameUrl")),
        ("BangumiBlock", LinkCard::new("bangumi", "Bangumi", "bangumiUrl")),
        ("GithubRepoBlock", LinkCard::new("github", "GitHub repository", "repoUrl")),
        ("XiaohongshuNoteBlock", LinkCard::new("xiaohongshu", "Xiaohongshu note", "noteUrl")),
    ];

    let mut map = ComponentMap::new();
    map.insert_tag("BilibiliVideoBlock", Arc::new(BilibiliVideo));
    for (tag, card) in cards {
        map.insert_tag(tag, Arc::new(card));
    }
    map.insert_tag(
        "ImageCarousel",
        Arc::new(ImageCarousel {
            image_root: image_root.to_string(),
        }),
    );
    map
}
