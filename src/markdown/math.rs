//! `$..$` / `$$..$$` → MathML.

use super::context::{RenderContext, Transform, WarningKind};
use crate::utils::html::escape;
use latex2mathml::{DisplayStyle, latex_to_mathml};
use pulldown_cmark::{CowStr, Event};
use std::panic::{self, AssertUnwindSafe};

/// Convert LaTeX, never failing: errors become an inline error marker.
pub fn render_math(tex: &str, display: bool) -> Result<String, String> {
    let style = if display {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    match panic::catch_unwind(AssertUnwindSafe(|| latex_to_mathml(tex, style))) {
        Ok(Ok(mathml)) => Ok(mathml),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("math renderer panicked".to_string()),
    }
}

/// Inline fallback shown in place of unrenderable math.
pub fn math_error_html(tex: &str, message: &str) -> String {
    format!(
        "<span class=\"math-error\" style=\"color:#cc0000\" title=\"{}\">{}</span>",
        escape(message),
        escape(tex)
    )
}

pub struct MathTransform;

impl Transform for MathTransform {
    fn transform<'a>(&self, events: Vec<Event<'a>>, ctx: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::InlineMath(tex) => convert(&tex, false, ctx),
                Event::DisplayMath(tex) => convert(&tex, true, ctx),
                other => other,
            })
            .collect()
    }
}

fn convert<'a>(tex: &str, display: bool, ctx: &mut RenderContext<'_>) -> Event<'a> {
    let html = match render_math(tex, display) {
        Ok(mathml) => mathml,
        Err(message) => {
            ctx.warn(WarningKind::Math, format!("`{tex}`: {message}"));
            math_error_html(tex, &message)
        }
    };
    Event::InlineHtml(CowStr::from(html))
}
