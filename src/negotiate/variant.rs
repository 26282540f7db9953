//! Negotiation for a single encoded variant.
//!
//! Each call only reads the shared indices and returns everything it wants
//! to contribute in a [`VariantOutcome`], so variants can be processed on
//! any thread and merged afterwards in input order.

use super::NegotiateError;
use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::headers::{add_encoding_headers, merge};
use super::index::{AssetIndex, EndpointIndex};
use super::model::{Asset, CONTENT_ENCODING, CONTENT_TYPE, Endpoint, Selector};
use super::quality::quality;
use super::size::SizeResolver;

/// What one encoded variant contributes to the run.
#[derive(Debug, Default)]
pub struct VariantOutcome<'a> {
    /// `(variant, origin)` identities, set once both sides resolved.
    pub touched: Option<(&'a str, &'a str)>,
    /// Compressed endpoints (possibly augmented) and synthesized siblings.
    pub endpoints: Vec<Endpoint>,
    /// `(route, origin identity)` pairs whose origin endpoints must survive.
    pub preserve: Vec<(String, &'a str)>,
    pub diagnostics: Vec<Diagnostic>,
    pub augmented: usize,
    pub synthesized: usize,
    pub passed_through: usize,
}

impl VariantOutcome<'_> {
    fn skip(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}

/// Negotiate `variant` against the endpoints of its origin asset.
///
/// Unresolvable relations skip the variant with a warning. Only a failed
/// size lookup is an error.
pub fn negotiate_variant<'a>(
    variant: &'a Asset,
    assets: &AssetIndex<'a>,
    endpoints: &EndpointIndex<'a>,
    sizes: &dyn SizeResolver,
    fingerprint_property: &str,
) -> Result<VariantOutcome<'a>, NegotiateError> {
    let outcome = VariantOutcome::default();

    let Some(origin) = variant.related_asset.as_deref().and_then(|id| assets.get(id)) else {
        let message = match variant.related_asset.as_deref() {
            Some(id) => format!("related asset `{id}` not found, skipping"),
            None => "encoded asset has no related asset, skipping".to_string(),
        };
        return Ok(outcome.skip(
            Diagnostic::warning(DiagnosticCode::MissingRelatedAsset, message)
                .with_target(&variant.identity),
        ));
    };

    let Some(compressed) = endpoints.get(&variant.identity) else {
        return Ok(outcome.skip(
            Diagnostic::warning(
                DiagnosticCode::MissingEndpoints,
                "no endpoints for encoded asset, skipping",
            )
            .with_target(&variant.identity),
        ));
    };
    let Some(originals) = endpoints.get(&origin.identity) else {
        return Ok(outcome.skip(
            Diagnostic::warning(
                DiagnosticCode::MissingEndpoints,
                format!("no endpoints for related asset `{}`, skipping", origin.identity),
            )
            .with_target(&variant.identity),
        ));
    };

    let quality = quality(sizes.resolve(variant)?);
    let encoding = variant.encoding();

    let mut outcome = VariantOutcome {
        touched: Some((variant.identity.as_str(), origin.identity.as_str())),
        ..outcome
    };

    for &endpoint in compressed {
        if endpoint.has_encoding_selector() {
            outcome.diagnostics.push(
                Diagnostic::info(
                    DiagnosticCode::AlreadyNegotiated,
                    "endpoint already has an encoding selector, leaving it unchanged",
                )
                .with_target(&endpoint.route),
            );
            outcome.preserve.push((endpoint.route.clone(), origin.identity.as_str()));
            outcome.endpoints.push(endpoint.clone());
            outcome.passed_through += 1;
            continue;
        }

        let mut endpoint = endpoint.clone();
        if add_encoding_headers(&mut endpoint, encoding) {
            outcome.augmented += 1;
        }

        let fingerprint = endpoint.property(fingerprint_property);
        let mut siblings = Vec::new();
        for &related in originals
            .iter()
            .filter(|r| r.property(fingerprint_property) == fingerprint)
        {
            if !related.has_header(CONTENT_TYPE) {
                outcome.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::MissingContentType,
                        format!(
                            "origin endpoint has no {CONTENT_TYPE}, negotiated endpoint for `{}` will have none",
                            variant.identity
                        ),
                    )
                    .with_target(&related.route),
                );
            }

            let mut selectors = related.selectors.clone();
            selectors.push(Selector::new(CONTENT_ENCODING, encoding, quality.as_str()));

            siblings.push(Endpoint {
                route: related.route.clone(),
                asset_file: variant.identity.clone(),
                selectors,
                response_headers: merge(&endpoint, related),
                properties: related.properties.clone(),
            });
            outcome.preserve.push((related.route.clone(), origin.identity.as_str()));
        }

        outcome.synthesized += siblings.len();
        outcome.endpoints.push(endpoint);
        outcome.endpoints.extend(siblings);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiate::model::{ETAG, VARY};
    use crate::negotiate::size::TableSizeResolver;

    fn sizes() -> TableSizeResolver {
        [("app.css.gz".to_string(), 40)].into_iter().collect()
    }

    fn run<'a>(assets: &'a [Asset], endpoints: &'a [Endpoint]) -> VariantOutcome<'a> {
        let mut diags = Vec::new();
        let asset_index = AssetIndex::build(assets, &mut diags);
        let endpoint_index = EndpointIndex::build(endpoints);
        let variant = asset_index.variants()[0];
        negotiate_variant(variant, &asset_index, &endpoint_index, &sizes(), "fingerprint").unwrap()
    }

    fn pair() -> Vec<Asset> {
        vec![
            Asset::new("app.css", "app.css"),
            Asset::new("app.css.gz", "app.css.gz").encoded("gzip", "app.css"),
        ]
    }

    #[test]
    fn test_synthesizes_sibling_at_origin_route() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css")
                .with_header(CONTENT_TYPE, "text/css")
                .with_header(ETAG, "v1")
                .with_property("fingerprint", "f1"),
            Endpoint::new("/app.css.gz", "app.css.gz").with_property("fingerprint", "f1"),
        ];

        let outcome = run(&assets, &endpoints);
        assert_eq!(outcome.touched, Some(("app.css.gz", "app.css")));
        assert_eq!(outcome.augmented, 1);
        assert_eq!(outcome.synthesized, 1);
        assert_eq!(outcome.preserve, [("/app.css".to_string(), "app.css")]);

        let compressed = &outcome.endpoints[0];
        assert_eq!(compressed.route, "/app.css.gz");
        assert_eq!(compressed.header(CONTENT_ENCODING), Some("gzip"));
        assert_eq!(compressed.header(VARY), Some(CONTENT_ENCODING));

        let sibling = &outcome.endpoints[1];
        assert_eq!(sibling.route, "/app.css");
        assert_eq!(sibling.asset_file, "app.css.gz");
        assert_eq!(
            sibling.selectors,
            [Selector::new(CONTENT_ENCODING, "gzip", "0.024390243902")]
        );
        assert_eq!(sibling.header(CONTENT_TYPE), Some("text/css"));
        assert_eq!(sibling.header(ETAG), Some("W/v1"));
        assert_eq!(sibling.property("fingerprint"), Some("f1"));
    }

    #[test]
    fn test_incompatible_fingerprint_yields_no_sibling() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css").with_property("fingerprint", "f1"),
            Endpoint::new("/app.css.gz", "app.css.gz").with_property("fingerprint", "f2"),
        ];

        let outcome = run(&assets, &endpoints);
        assert_eq!(outcome.synthesized, 0);
        assert_eq!(outcome.endpoints.len(), 1);
        assert!(outcome.preserve.is_empty());
    }

    #[test]
    fn test_absent_fingerprints_are_compatible() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css").with_header(CONTENT_TYPE, "text/css"),
            Endpoint::new("/app.f1.css", "app.css")
                .with_header(CONTENT_TYPE, "text/css")
                .with_property("fingerprint", "f1"),
            Endpoint::new("/app.css.gz", "app.css.gz"),
        ];

        let outcome = run(&assets, &endpoints);
        let routes: Vec<_> = outcome.endpoints.iter().map(|e| e.route.as_str()).collect();
        assert_eq!(routes, ["/app.css.gz", "/app.css"]);
    }

    #[test]
    fn test_origin_selectors_are_extended() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css")
                .with_header(CONTENT_TYPE, "text/css")
                .with_selector(Selector::new("Culture", "en", "1.000000000000")),
            Endpoint::new("/app.css.gz", "app.css.gz"),
        ];

        let outcome = run(&assets, &endpoints);
        let names: Vec<_> = outcome.endpoints[1].selectors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Culture", CONTENT_ENCODING]);
    }

    #[test]
    fn test_already_negotiated_is_passed_through() {
        let assets = pair();
        let negotiated = Endpoint::new("/app.css", "app.css.gz")
            .with_selector(Selector::new(CONTENT_ENCODING, "gzip", "0.5"));
        let endpoints = vec![Endpoint::new("/app.css", "app.css"), negotiated.clone()];

        let outcome = run(&assets, &endpoints);
        assert_eq!(outcome.endpoints, [negotiated]);
        assert_eq!(outcome.passed_through, 1);
        assert_eq!(outcome.synthesized, 0);
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::AlreadyNegotiated);
        assert_eq!(outcome.preserve, [("/app.css".to_string(), "app.css")]);
    }

    #[test]
    fn test_missing_related_asset_skips() {
        let assets = vec![Asset::new("app.css.gz", "app.css.gz").encoded("gzip", "app.css")];
        let endpoints = vec![Endpoint::new("/app.css.gz", "app.css.gz")];

        let outcome = run(&assets, &endpoints);
        assert!(outcome.touched.is_none());
        assert!(outcome.endpoints.is_empty());
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::MissingRelatedAsset);
    }

    #[test]
    fn test_missing_origin_endpoints_skips() {
        let assets = pair();
        let endpoints = vec![Endpoint::new("/app.css.gz", "app.css.gz")];

        let outcome = run(&assets, &endpoints);
        assert!(outcome.touched.is_none());
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::MissingEndpoints);
        assert!(outcome.diagnostics[0].message.contains("app.css"));
    }

    #[test]
    fn test_missing_variant_endpoints_skips() {
        let assets = pair();
        let endpoints = vec![Endpoint::new("/app.css", "app.css")];

        let outcome = run(&assets, &endpoints);
        assert!(outcome.touched.is_none());
        assert!(outcome.endpoints.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::MissingEndpoints);
        assert_eq!(outcome.diagnostics[0].target.as_deref(), Some("app.css.gz"));
    }

    #[test]
    fn test_missing_content_type_is_reported() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css"),
            Endpoint::new("/app.css.gz", "app.css.gz"),
        ];

        let outcome = run(&assets, &endpoints);
        assert_eq!(outcome.synthesized, 1);
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::MissingContentType);
        assert_eq!(outcome.diagnostics[0].target.as_deref(), Some("/app.css"));
    }

    #[test]
    fn test_size_failure_is_fatal() {
        let assets = pair();
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css"),
            Endpoint::new("/app.css.gz", "app.css.gz"),
        ];
        let mut diags = Vec::new();
        let asset_index = AssetIndex::build(&assets, &mut diags);
        let endpoint_index = EndpointIndex::build(&endpoints);

        let result = negotiate_variant(
            asset_index.variants()[0],
            &asset_index,
            &endpoint_index,
            &TableSizeResolver::new(),
            "fingerprint",
        );
        assert!(matches!(result, Err(NegotiateError::Size(_))));
    }
}
