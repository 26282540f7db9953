//! tola-negotiate - content-negotiation endpoints for precompressed assets.

mod cli;
mod config;
mod logger;
mod manifest;
mod negotiate;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::NegotiateConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Synthesize { args } => {
            let config = NegotiateConfig::load(&cli)?;
            if let Some(path) = &config.config_path {
                debug!("config"; "using {}", path.display());
            }
            cli::synthesize::synthesize(args, &config).map(|_| ())
        }
        Commands::Quality { sizes } => cli::quality::print_qualities(sizes),
    }
}
