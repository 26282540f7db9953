//! Content-negotiation synthesis for precompressed assets.
//!
//! For every encoded variant (e.g. `app.css.gz`) the pipeline derives an
//! endpoint that serves the compressed bytes at the origin's route with an
//! encoding selector, while keeping every endpoint that must still resolve.
//!
//! ```text
//! assets ──► AssetIndex ──┐
//!                         ├─► negotiate_variant (per variant, rayon) ──► guard ──► EndpointSet
//! endpoints ► EndpointIndex┘
//! ```
//!
//! | Module       | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `model`      | Asset / endpoint types (manifest layout)         |
//! | `index`      | Identity and asset → endpoint lookups            |
//! | `quality`    | Size → selector quality                          |
//! | `size`       | Size resolution strategies                       |
//! | `headers`    | Encoding headers and header merge                |
//! | `variant`    | Per-variant negotiation                          |
//! | `guard`      | Preserve-set and route collision handling        |
//! | `set`        | Keyed de-duplication                             |
//! | `diagnostic` | Diagnostic records and sinks                     |
//! | `pipeline`   | The full run                                     |

pub mod diagnostic;
mod guard;
mod headers;
mod index;
pub mod model;
mod pipeline;
pub mod quality;
mod set;
pub mod size;
mod variant;

use thiserror::Error;

pub use diagnostic::{Diagnostic, DiagnosticSink, LogSink, NullSink};
pub use model::{Asset, Endpoint};
pub use pipeline::{FINGERPRINT_PROPERTY, Options, Stats, Synthesis, run};
pub use size::{FileSizeResolver, LayeredSizeResolver, SizeError, SizeResolver, TableSizeResolver};

#[derive(Debug, Error)]
pub enum NegotiateError {
    #[error("cannot compute quality")]
    Size(#[from] SizeError),
}

/// [`run`], then forward the diagnostics to `sink`.
///
/// With `None` the diagnostics are dropped. `Synthesis::endpoints` holds the
/// input endpoints with every touched route replaced.
pub fn synthesize(
    assets: &[Asset],
    endpoints: &[Endpoint],
    sizes: &dyn SizeResolver,
    options: &Options,
    sink: Option<&mut dyn DiagnosticSink>,
) -> Result<Synthesis, NegotiateError> {
    let synthesis = run(assets, endpoints, sizes, options)?;
    let mut dropped = NullSink;
    let sink: &mut dyn DiagnosticSink = match sink {
        Some(sink) => sink,
        None => &mut dropped,
    };
    synthesis.report_to(sink);
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_without_sink() {
        let assets = vec![
            Asset::new("a.css", "a.css"),
            Asset::new("a.css.gz", "a.css.gz").encoded("gzip", "a.css"),
            Asset::new("orphan.gz", "orphan.gz").encoded("gzip", "nowhere"),
        ];
        let endpoints = vec![
            Endpoint::new("/a.css", "a.css").with_header("Content-Type", "text/css"),
            Endpoint::new("/a.css.gz", "a.css.gz"),
        ];
        let sizes: TableSizeResolver = [("a.css.gz".to_string(), 0)].into_iter().collect();

        let synthesis = synthesize(&assets, &endpoints, &sizes, &Options::default(), None).unwrap();
        assert_eq!(synthesis.diagnostics.len(), 1);
        let out = synthesis.endpoints;
        assert_eq!(out.len(), 3);
        assert!(out.iter().any(|e| e.selectors.iter().any(|s| s.quality == "1.000000000000")));
    }

    #[test]
    fn test_synthesize_forwards_diagnostics() {
        let assets = vec![Asset::new("orphan.gz", "orphan.gz").encoded("gzip", "nowhere")];
        let mut sink: Vec<Diagnostic> = Vec::new();

        let out = synthesize(
            &assets,
            &[],
            &TableSizeResolver::new(),
            &Options::default(),
            Some(&mut sink as &mut dyn DiagnosticSink),
        )
        .unwrap();
        assert!(out.endpoints.is_empty());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].target.as_deref(), Some("orphan.gz"));
    }
}
