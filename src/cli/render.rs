//! Render command implementation.
//!
//! Files are rendered in parallel with rayon. Each page goes through the
//! markdown pipeline, gets its diagrams themed, and is optionally hydrated
//! into standalone HTML.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use super::args::RenderArgs;
use super::crypt::explain;
use super::{emit, plural_count, read_source};
use crate::config::SiteConfig;
use crate::crypto::{self, TagsIndex};
use crate::hydrate::hydrate_html;
use crate::markdown::{DiagramBoard, Renderer};
use crate::theme::{FixedTheme, ThemePalette, ThemeStore};

/// What happened to one input file.
#[derive(Debug)]
enum Outcome {
    Written(PathBuf),
    Printed,
    Skipped(&'static str),
}

/// Shared, read-only state for one render run.
struct Job<'a> {
    args: &'a RenderArgs,
    renderer: Renderer,
    palette: Arc<ThemePalette>,
    image_root: &'a str,
    crypto_tag: &'a str,
    tags: TagsIndex,
}

pub fn run_render(args: &RenderArgs, config: &SiteConfig) -> Result<()> {
    let palette = select_palette(args.theme.as_deref(), config);
    debug!("render"; "diagram palette: {}", palette.name);

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let job = Job {
        args,
        renderer: Renderer::new(
            config.render.clone(),
            Arc::new(FixedTheme(Arc::clone(&palette))),
        ),
        palette,
        image_root: &config.render.image_root,
        crypto_tag: &config.crypto.tag,
        tags: load_tags_index(config),
    };

    let results: Vec<(&PathBuf, Result<Outcome>)> = args
        .files
        .par_iter()
        .map(|path| (path, job.render_file(path)))
        .collect();

    let mut rendered = 0;
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(Outcome::Written(target)) => {
                rendered += 1;
                debug!("render"; "{} -> {}", path.display(), target.display());
            }
            Ok(Outcome::Printed) => rendered += 1,
            Ok(Outcome::Skipped(reason)) => log!("render"; "skipped {}: {}", path.display(), reason),
            Err(e) => {
                failed += 1;
                log!("error"; "{:#}", e);
            }
        }
    }

    if job.to_stdout() {
        // Keep stdout for the page itself
        debug!("render"; "rendered {}", plural_count(rendered, "file"));
    } else {
        log!("render"; "rendered {}", plural_count(rendered, "file"));
    }
    if failed > 0 {
        bail!("{} failed to render", plural_count(failed, "file"));
    }
    Ok(())
}

impl Job<'_> {
    fn to_stdout(&self) -> bool {
        self.args.output.is_none() && self.args.files.len() == 1
    }

    fn render_file(&self, path: &Path) -> Result<Outcome> {
        let mut source = read_source(path)?;

        if crypto::looks_encrypted(&source) {
            let Some(password) = &self.args.password else {
                return Ok(Outcome::Skipped("encrypted, no password given"));
            };
            source = crypto::decrypt_blocking(&source, password).map_err(|e| explain(e, path))?;
        } else if crypto::is_article_encrypted(&article_key(path), self.crypto_tag, &self.tags) {
            log!("warn"; "{} is tagged '{}' but stored in cleartext", path.display(), self.crypto_tag);
        }

        let html = self.render_source(path, &source);
        if self.to_stdout() {
            emit(&html, None)?;
            return Ok(Outcome::Printed);
        }

        let target = self.target_path(path);
        emit(&html, Some(&target))?;
        Ok(Outcome::Written(target))
    }

    fn render_source(&self, path: &Path, source: &str) -> String {
        let output = self.renderer.render_full(source);
        for warning in &output.warnings {
            log!("warn"; "{}: {}", path.display(), warning);
        }

        let mut html = output.html;
        if !output.diagrams.is_empty() {
            let mut board = DiagramBoard::new();
            board.materialize(&output.diagrams, &self.palette);
            html = board.inject(&html);
        }
        if self.args.hydrate {
            html = hydrate_html(&html, self.image_root);
        }
        html
    }

    fn target_path(&self, path: &Path) -> PathBuf {
        match &self.args.output {
            Some(dir) => {
                let stem = path.file_stem().unwrap_or(path.as_os_str());
                dir.join(format!("{}.html", stem.to_string_lossy()))
            }
            None => path.with_extension("html"),
        }
    }
}

/// Explicit `--theme`, else the palette the configured default mode picks.
fn select_palette(name: Option<&str>, config: &SiteConfig) -> Arc<ThemePalette> {
    let store = ThemeStore::new(&config.theme);
    if let Some(name) = name {
        if let Some(palette) = store.palette(name) {
            return palette;
        }
        log!("warn"; "palette '{}' not found, using the configured default", name);
    }
    store.initialize(None, None);
    store.current()
}

fn load_tags_index(config: &SiteConfig) -> TagsIndex {
    let Some(path) = &config.crypto.tags_index else {
        return TagsIndex::default();
    };
    let parsed = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|json| crypto::parse_tags_index(&json).map_err(anyhow::Error::from));
    match parsed {
        Ok(tags) => tags,
        Err(e) => {
            log!("warn"; "ignoring tags index {}: {}", path.display(), e);
            TagsIndex::default()
        }
    }
}

/// Path as it appears in the tags index: forward slashes, no leading `./`.
fn article_key(path: &Path) -> String {
    let key = path.to_string_lossy().replace('\\', "/");
    key.trim_start_matches("./").to_string()
}
