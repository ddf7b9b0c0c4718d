//! marka command-line entry point.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use marka::cli::{self, Cli, Commands, ThemeCommand};
use marka::config::SiteConfig;
use marka::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = SiteConfig::load(&cli.config, &cwd)?;

    match &cli.command {
        Commands::Render { args } => cli::render::run_render(args, &config),
        Commands::Encrypt { args } => cli::crypt::run_encrypt(args),
        Commands::Decrypt { args } => cli::crypt::run_decrypt(args),
        Commands::Theme { command } => match command {
            ThemeCommand::List => cli::theme::list_palettes(&config),
            ThemeCommand::Check { name } => cli::theme::check_palettes(name.as_deref(), &config),
        },
    }
}
