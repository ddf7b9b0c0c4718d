//! `mermaid` fences become deferred diagram containers.
//!
//! The source is kept as escaped text inside a `div`; drawing happens later
//! (see [`crate::markdown::DiagramBoard`]) so the diagram can follow theme
//! changes.

use super::{Fence, FenceRule, Next};
use crate::markdown::context::{DiagramBlock, RenderContext};
use crate::utils::html::escape;
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// `mermaid-` followed by 9 random base-36 characters.
pub fn diagram_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("mermaid-{suffix}")
}

pub struct DiagramRule;

impl FenceRule for DiagramRule {
    fn render(&self, fence: &Fence<'_>, ctx: &mut RenderContext<'_>, next: Next<'_>) -> String {
        if fence.tag != "mermaid" {
            return next.run(fence, ctx);
        }

        let id = diagram_id();
        let source = fence.content.trim_end().to_string();
        let theme = ctx.theme.current_theme_name();
        let html = format!(
            "<div class=\"mermaid\" id=\"{id}\" data-theme=\"{}\">{}</div>",
            escape(&theme),
            escape(&source)
        );

        ctx.diagrams.push(DiagramBlock {
            id,
            source,
            theme,
            html: html.clone(),
        });
        html + "\n"
    }
}
