//! `synthesize` command: manifest in, negotiated endpoints out.

use std::io::{Write, stdout};
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::SynthesizeArgs;
use crate::config::NegotiateConfig;
use crate::logger::plural_count;
use crate::manifest::{self, Manifest};
use crate::negotiate::{
    self, FileSizeResolver, LayeredSizeResolver, LogSink, Stats, Synthesis, TableSizeResolver,
};
use crate::{debug, debug_do, log};

/// Run the pipeline over `args.manifest` and write the result.
pub fn synthesize(args: &SynthesizeArgs, config: &NegotiateConfig) -> Result<Stats> {
    let manifest = Manifest::load(&args.manifest)?;
    let sizes = size_resolver(args, config)?;

    debug!(
        "negotiate";
        "{} and {} from {}",
        plural_count(manifest.assets.len(), "asset"),
        plural_count(manifest.endpoints.len(), "endpoint"),
        args.manifest.display()
    );

    let mut sink = LogSink::new();
    let synthesis = negotiate::synthesize(
        &manifest.assets,
        &manifest.endpoints,
        &sizes,
        &config.options(),
        Some(&mut sink),
    )
    .with_context(|| format!("failed to negotiate `{}`", args.manifest.display()))?;

    log_summary(&synthesis.stats, sink.warnings());
    debug_do! {
        let mut routes: Vec<_> = synthesis.updated.iter().map(|e| e.route.as_str()).collect();
        routes.dedup();
        for route in routes {
            debug!("negotiate"; "updated {}", route);
        }
    }

    let stats = synthesis.stats;
    write_output(manifest, synthesis, args.output.as_deref(), config)?;
    Ok(stats)
}

/// Table, then `--size` overrides, then files under the sizes root.
fn size_resolver(args: &SynthesizeArgs, config: &NegotiateConfig) -> Result<LayeredSizeResolver> {
    let mut resolver = LayeredSizeResolver::new();

    if let Some(table) = &config.sizes.table {
        let table = manifest::load_size_table(table)?;
        debug!("negotiate"; "size table with {}", plural_count(table.len(), "size"));
        resolver = resolver.with_table(table);
    }
    if !args.size_overrides.is_empty() {
        let overrides: TableSizeResolver = args.size_overrides.iter().cloned().collect();
        resolver = resolver.with_override(overrides);
    }

    Ok(resolver.with_files(FileSizeResolver::new(&config.sizes.root)))
}

fn log_summary(stats: &Stats, warnings: usize) {
    let mut summary = format!(
        "{}, {} synthesized, {} augmented",
        plural_count(stats.variants, "variant"),
        stats.synthesized,
        stats.augmented
    );
    if stats.passed_through > 0 {
        summary.push_str(&format!(", {} passed through", stats.passed_through));
    }
    if stats.preserved > 0 {
        summary.push_str(&format!(", {} preserved", stats.preserved));
    }
    if stats.skipped > 0 {
        summary.push_str(&format!(", {} skipped", stats.skipped));
    }
    if stats.collisions > 0 {
        summary.push_str(&format!(", {}", plural_count(stats.collisions, "route collision")));
    }
    if warnings > 0 {
        summary.push_str(&format!(", {}", plural_count(warnings, "warning")));
    }
    log!("negotiate"; "{}", summary);
}

/// Full manifest by default; only the updated endpoints with `updated_only`.
fn write_output(
    manifest: Manifest,
    synthesis: Synthesis,
    output: Option<&Path>,
    config: &NegotiateConfig,
) -> Result<()> {
    let pretty = config.output.pretty;

    if config.output.updated_only {
        return emit(&synthesis.updated, output, pretty);
    }

    let result = Manifest {
        assets: manifest.assets,
        endpoints: synthesis.endpoints,
    };
    emit(&result, output, pretty)
}

fn emit<T: serde::Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            manifest::write_json(path, value, pretty)?;
            debug!("negotiate"; "wrote {}", path.display());
        }
        None => {
            let json = manifest::to_json(value, pretty).context("failed to serialize result")?;
            let mut stdout = stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}
