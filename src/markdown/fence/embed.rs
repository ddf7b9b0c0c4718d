//! Embed directives: one fence → one self-closing placeholder.
//!
//! ````text
//! ```bilibili-video
//! https://www.bilibili.com/video/BV1xx
//! ```
//! ````
//! becomes `<BilibiliVideoBlock :videoUrl="'https://www.bilibili.com/video/BV1xx'" />`.

use super::{Fence, FenceRule, Next};
use crate::markdown::context::RenderContext;
use crate::utils::html::escape;

/// A placeholder component and the prop its fence content binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedKind {
    pub tags: &'static [&'static str],
    pub component: &'static str,
    pub prop: &'static str,
}

pub const EMBEDS: &[EmbedKind] = &[
    EmbedKind {
        tags: &["bilibili-video"],
        component: "BilibiliVideoBlock",
        prop: "videoUrl",
    },
    EmbedKind {
        tags: &["steam-game"],
        component: "SteamGameBlock",
        prop: "gameUrl",
    },
    EmbedKind {
        tags: &["bangumi", "bangumi-card"],
        component: "BangumiBlock",
        prop: "bangumiUrl",
    },
    EmbedKind {
        tags: &["github-repo"],
        component: "GithubRepoBlock",
        prop: "repoUrl",
    },
    EmbedKind {
        tags: &["xiaohongshu", "xiaohongshu-note"],
        component: "XiaohongshuNoteBlock",
        prop: "noteUrl",
    },
];

impl EmbedKind {
    pub fn for_tag(tag: &str) -> Option<&'static EmbedKind> {
        EMBEDS.iter().find(|kind| kind.tags.contains(&tag))
    }

    /// Placeholder carrying `content` as a quoted string literal.
    pub fn placeholder(&self, content: &str) -> String {
        let literal = format!("'{}'", content.trim());
        format!(
            "<{} :{}=\"{}\" />\n",
            self.component,
            self.prop,
            escape(&literal)
        )
    }
}

pub struct EmbedRule;

impl FenceRule for EmbedRule {
    fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String {
        match EmbedKind::for_tag(fence.tag) {
            Some(kind) => kind.placeholder(fence.content),
            None => next.run(fence, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_share_component() {
        assert_eq!(
            EmbedKind::for_tag("bangumi"),
            EmbedKind::for_tag("bangumi-card")
        );
        assert_eq!(
            EmbedKind::for_tag("xiaohongshu").map(|k| k.component),
            Some("XiaohongshuNoteBlock")
        );
    }

    #[test]
    fn test_tags_case_sensitive() {
        assert!(EmbedKind::for_tag("Steam-Game").is_none());
        assert!(EmbedKind::for_tag("steam").is_none());
    }

    #[test]
    fn test_placeholder() {
        let kind = EmbedKind::for_tag("github-repo").unwrap();
        assert_eq!(
            kind.placeholder("  https://github.com/a/b\n"),
            "<GithubRepoBlock :repoUrl=\"&#39;https://github.com/a/b&#39;\" />\n"
        );
    }

    #[test]
    fn test_placeholder_escapes_markup() {
        let kind = EmbedKind::for_tag("steam-game").unwrap();
        let html = kind.placeholder("\"><script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
