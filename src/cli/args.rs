//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Render blog posts: embeds, diagrams, theming and encrypted posts
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "marka.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render markdown files to HTML
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Encrypt the body of a post, keeping its front matter readable
    #[command(visible_alias = "e")]
    Encrypt {
        #[command(flatten)]
        args: CryptArgs,
    },

    /// Decrypt an encrypted post back to markdown
    #[command(visible_alias = "d")]
    Decrypt {
        #[command(flatten)]
        args: CryptArgs,
    },

    /// Inspect configured palettes
    #[command(visible_alias = "t")]
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Markdown files to render
    #[arg(required = true, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Output directory. A single file without it is printed to stdout;
    /// several files are written next to their sources.
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Palette used for diagrams (defaults to the configured light/dark one)
    #[arg(short, long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Replace component placeholders with static HTML
    #[arg(short = 'H', long)]
    pub hydrate: bool,

    /// Password for encrypted posts; without it they are skipped
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Encrypt/decrypt command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CryptArgs {
    /// Post to process
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Password used for key derivation
    #[arg(short, long)]
    pub password: String,

    /// Write the result here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// List available palettes
    List,

    /// Accessibility report for one palette, or all of them
    Check {
        /// Palette name
        name: Option<String>,
    },
}
