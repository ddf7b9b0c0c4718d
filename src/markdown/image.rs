//! Image source rewriting.
//!
//! Relative image paths in posts point into the site's image directory:
//!
//! | `src`                     | Result                             |
//! |---------------------------|------------------------------------|
//! | `https://cdn/x.png`       | unchanged                          |
//! | `//cdn/x.png`, `data:...` | unchanged                          |
//! | `/Posts/Images/x.png`     | unchanged (already under the root) |
//! | `cat pic.png`             | `/Posts/Images/cat%20pic.png`      |
//! | `./a/%E7%8C%AB.png`       | `/Posts/Images/a/%E7%8C%AB.png`    |

use super::context::{RenderContext, Transform};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use pulldown_cmark::{CowStr, Event, Tag};
use std::borrow::Cow;

/// Characters escaped in a path, mirroring `encodeURI`.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'[')
    .add(b']');

fn is_external(src: &str) -> bool {
    let lower = src.get(..5).map(str::to_ascii_lowercase);
    src.starts_with("http") || src.starts_with("//") || lower.as_deref() == Some("data:")
}

/// Rewrite a post-relative image path into the image root.
///
/// Decodes before encoding so already-escaped paths are not escaped twice.
pub fn rewrite_image_src<'s>(src: &'s str, image_root: &str) -> Cow<'s, str> {
    let root = image_root.trim_end_matches('/');
    if src.is_empty() || is_external(src) {
        return Cow::Borrowed(src);
    }
    if let Some(rest) = src.strip_prefix(root)
        && rest.starts_with('/')
    {
        return Cow::Borrowed(src);
    }

    let relative = src.trim_start_matches("./").trim_start_matches('/');
    let decoded = percent_decode_str(relative).decode_utf8_lossy();
    let encoded = utf8_percent_encode(&decoded, PATH_ESCAPE);
    Cow::Owned(format!("{root}/{encoded}"))
}

/// Rewrites `src` of every image.
pub struct ImageTransform;

impl Transform for ImageTransform {
    fn transform<'a>(&self, events: Vec<Event<'a>>, ctx: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        let root = ctx.config.image_root.as_str();
        events
            .into_iter()
            .map(|event| match event {
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let rewritten = match rewrite_image_src(&dest_url, root) {
                        Cow::Borrowed(_) => dest_url,
                        Cow::Owned(s) => CowStr::from(s),
                    };
                    Event::Start(Tag::Image {
                        link_type,
                        dest_url: rewritten,
                        title,
                        id,
                    })
                }
                other => other,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/Posts/Images";

    #[test]
    fn test_absolute_untouched() {
        for src in [
            "https://example.com/a b.png",
            "http://x/y.png",
            "//cdn.example.com/z.png",
            "data:image/png;base64,AAAA",
        ] {
            assert_eq!(rewrite_image_src(src, ROOT), src);
        }
    }

    #[test]
    fn test_absolute_idempotent() {
        let src = "https://example.com/pic.png";
        let once = rewrite_image_src(src, ROOT).into_owned();
        let twice = rewrite_image_src(&once, ROOT).into_owned();
        assert_eq!(once, src);
        assert_eq!(twice, src);
    }

    #[test]
    fn test_relative_rewritten() {
        assert_eq!(rewrite_image_src("pic.png", ROOT), "/Posts/Images/pic.png");
        assert_eq!(rewrite_image_src("./a/pic.png", ROOT), "/Posts/Images/a/pic.png");
        assert_eq!(rewrite_image_src("/pic.png", "/Posts/Images/"), "/Posts/Images/pic.png");
    }

    #[test]
    fn test_no_double_encoding() {
        assert_eq!(rewrite_image_src("cat pic.png", ROOT), "/Posts/Images/cat%20pic.png");
        assert_eq!(rewrite_image_src("cat%20pic.png", ROOT), "/Posts/Images/cat%20pic.png");
        assert_eq!(rewrite_image_src("猫.png", ROOT), "/Posts/Images/%E7%8C%AB.png");
        assert_eq!(rewrite_image_src("%E7%8C%AB.png", ROOT), "/Posts/Images/%E7%8C%AB.png");
    }

    #[test]
    fn test_rewritten_is_stable() {
        let once = rewrite_image_src("a b/c.png", ROOT).into_owned();
        assert_eq!(rewrite_image_src(&once, ROOT), once);
    }
}
