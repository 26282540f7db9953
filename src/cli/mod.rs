//! Command-line interface module.

mod args;
pub mod quality;
pub mod synthesize;

pub use args::{Cli, Commands, SynthesizeArgs};
