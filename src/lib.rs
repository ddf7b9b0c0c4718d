//! marka - markdown rendering pipeline for a personal blog.
//!
//! - [`markdown`]: markdown to HTML with embeds, carousels, diagrams, math
//!   and highlighted code
//! - [`hydrate`]: turns component placeholders into mounted widgets
//! - [`theme`]: palettes, light/dark selection and accessibility checks
//! - [`crypto`]: password-encrypted posts
//! - [`config`]: `marka.toml`

// Macros first so every module can use them
#[macro_use]
pub mod logger;

pub mod cli;
pub mod color;
pub mod config;
pub mod crypto;
pub mod hydrate;
pub mod markdown;
pub mod theme;
pub mod utils;
