//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content-negotiation endpoint synthesizer for precompressed assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, default_value = "negotiate.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Derive negotiation endpoints for a manifest
    #[command(visible_alias = "s")]
    Synthesize {
        #[command(flatten)]
        args: SynthesizeArgs,
    },

    /// Print the selector quality for compressed sizes in bytes
    #[command(visible_alias = "q")]
    Quality {
        #[arg(required = true, value_name = "SIZE")]
        sizes: Vec<u64>,
    },
}

/// Synthesize command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SynthesizeArgs {
    /// Manifest JSON with `assets` and `endpoints`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub manifest: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Precomputed size table (JSON object of identity -> bytes)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub sizes: Option<PathBuf>,

    /// Size override for one asset, checked after the size table
    #[arg(long = "size", value_name = "ID=BYTES", value_parser = parse_size_entry)]
    pub size_overrides: Vec<(String, u64)>,

    /// Directory asset identities are resolved against for file sizes
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Only emit endpoints of touched routes
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub updated_only: Option<bool>,

    /// Pretty-print the JSON output
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub pretty: Option<bool>,

    /// Process variants on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Parse `identity=bytes`. The last `=` separates, so identities may contain `=`.
fn parse_size_entry(s: &str) -> Result<(String, u64), String> {
    let (identity, size) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected ID=BYTES, got `{s}`"))?;
    if identity.is_empty() {
        return Err(format!("missing asset identity in `{s}`"));
    }
    let size = size
        .trim()
        .parse()
        .map_err(|e| format!("invalid size in `{s}`: {e}"))?;
    Ok((identity.to_string(), size))
}
