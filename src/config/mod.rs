//! Configuration for `negotiate.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `[negotiate]` | Parallelism and fingerprint property name      |
//! | `[sizes]`     | Size resolution: file root, precomputed table  |
//! | `[output]`    | JSON formatting and update-set-only output     |
//!
//! A missing config file is not an error: every field has a default.
//! Relative paths are resolved against the config file's directory, or the
//! current directory when there is no config file.

pub mod section;
pub mod types;
mod util;

pub use section::{NegotiateSection, OutputSection, SizesSection};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands, SynthesizeArgs};
use crate::log;
use crate::negotiate::Options;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Root configuration structure representing negotiate.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NegotiateConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Base directory for relative paths (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub negotiate: NegotiateSection,

    #[serde(default)]
    pub sizes: SizesSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl NegotiateConfig {
    /// Load configuration for `cli`, then apply its command options.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.apply_command_options(cli);
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Path::new("negotiate.toml"));
        }
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Options for the negotiation pipeline.
    pub fn options(&self) -> Options {
        Options {
            fingerprint_property: self.negotiate.fingerprint_property.clone(),
            parallel: self.negotiate.parallel,
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Synthesize { args } => self.apply_synthesize_args(args),
            Commands::Quality { .. } => {}
        }
    }

    /// CLI values win over config values. Paths given on the command line
    /// stay relative to the current directory.
    fn apply_synthesize_args(&mut self, args: &SynthesizeArgs) {
        crate::logger::set_verbose(args.verbose);

        let cwd = std::env::current_dir().unwrap_or_default();
        if let Some(root) = &args.root {
            self.sizes.root = cwd.join(root);
        }
        if let Some(table) = &args.sizes {
            self.sizes.table = Some(cwd.join(table));
        }

        Self::update_option(&mut self.output.updated_only, args.updated_only.as_ref());
        Self::update_option(&mut self.output.pretty, args.pretty.as_ref());
        if args.sequential {
            self.negotiate.parallel = false;
        }
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn finalize(&mut self) {
        let root = self.root.clone();
        self.sizes.normalize(&root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collect all validation errors and return them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.negotiate.validate(&mut diag);
        self.sizes.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}
