//! Full run: index → negotiate → guard → dedup → apply.

use std::collections::BTreeSet;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::NegotiateError;
use super::diagnostic::{Diagnostic, DiagnosticSink};
use super::guard::{GuardStats, guard};
use super::index::{AssetIndex, EndpointIndex};
use super::model::{Asset, Endpoint};
use super::set::EndpointSet;
use super::size::SizeResolver;
use super::variant::{VariantOutcome, negotiate_variant};

/// Default name of the endpoint property compared for compatibility.
pub const FINGERPRINT_PROPERTY: &str = "fingerprint";

#[derive(Debug, Clone)]
pub struct Options {
    /// Endpoint property that must match between compressed and origin.
    pub fingerprint_property: String,
    /// Process variants on the rayon pool.
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fingerprint_property: FINGERPRINT_PROPERTY.to_string(),
            parallel: true,
        }
    }
}

/// Counters for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub variants: usize,
    pub skipped: usize,
    pub augmented: usize,
    pub synthesized: usize,
    pub passed_through: usize,
    pub preserved: usize,
    pub collisions: usize,
}

/// Result of a run.
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
    /// Endpoints for every route the run touched, de-duplicated.
    pub updated: Vec<Endpoint>,
    /// The input with `updated` applied route by route.
    pub endpoints: Vec<Endpoint>,
    /// In input order.
    pub diagnostics: Vec<Diagnostic>,
    pub stats: Stats,
}

impl Synthesis {
    /// Forward diagnostics to `sink`, in the order they were produced.
    pub fn report_to(&self, sink: &mut dyn DiagnosticSink) {
        for diagnostic in &self.diagnostics {
            sink.report(diagnostic.clone());
        }
    }
}

/// Run the pipeline without side effects.
///
/// Fails only when a variant's size cannot be resolved.
pub fn run(
    assets: &[Asset],
    endpoints: &[Endpoint],
    sizes: &dyn SizeResolver,
    options: &Options,
) -> Result<Synthesis, NegotiateError> {
    let mut diagnostics = Vec::new();
    let asset_index = AssetIndex::build(assets, &mut diagnostics);
    let mut endpoint_index = EndpointIndex::build(endpoints);

    let variants = asset_index.variants();
    let fingerprint = options.fingerprint_property.as_str();
    // Collected in input order either way; merged below by this thread only.
    let outcomes: Vec<Result<VariantOutcome<'_>, NegotiateError>> = if options.parallel {
        variants
            .par_iter()
            .map(|&variant| {
                negotiate_variant(variant, &asset_index, &endpoint_index, sizes, fingerprint)
            })
            .collect()
    } else {
        variants
            .iter()
            .map(|&variant| {
                negotiate_variant(variant, &asset_index, &endpoint_index, sizes, fingerprint)
            })
            .collect()
    };

    let mut stats = Stats {
        variants: variants.len(),
        ..Stats::default()
    };
    let mut output = EndpointSet::new();
    let mut touched: FxHashSet<&str> = FxHashSet::default();
    let mut preserve: BTreeSet<(String, String)> = BTreeSet::new();

    for outcome in outcomes {
        let outcome = outcome?;
        diagnostics.extend(outcome.diagnostics);

        let Some((variant, origin)) = outcome.touched else {
            stats.skipped += 1;
            continue;
        };
        touched.insert(variant);
        touched.insert(origin);

        stats.augmented += outcome.augmented;
        stats.synthesized += outcome.synthesized;
        stats.passed_through += outcome.passed_through;
        output.extend(outcome.endpoints);
        preserve.extend(
            outcome
                .preserve
                .into_iter()
                .map(|(route, origin)| (route, origin.to_string())),
        );
    }

    let GuardStats {
        preserved,
        collisions,
    } = guard(&mut output, &mut endpoint_index, endpoints, &preserve, &touched);
    stats.preserved = preserved;
    stats.collisions = collisions;

    let applied = apply_update(endpoints, &output);
    Ok(Synthesis {
        updated: output.into_vec(),
        endpoints: applied.into_vec(),
        diagnostics,
        stats,
    })
}

/// Replace every route present in `updated` with `updated`'s endpoints.
///
/// Input endpoints on other routes are kept as they are.
pub fn apply_update(input: &[Endpoint], updated: &EndpointSet) -> EndpointSet {
    let routes: FxHashSet<&str> = updated.routes().collect();

    let mut result = updated.clone();
    result.extend(
        input
            .iter()
            .filter(|e| !routes.contains(e.route.as_str()))
            .cloned(),
    );
    result
}
