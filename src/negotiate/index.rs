//! Asset and endpoint lookup tables built once per run.

use rustc_hash::FxHashMap;

use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::model::{Asset, Endpoint};

/// Identity → asset, plus the encoded variants in input order.
#[derive(Debug, Default)]
pub struct AssetIndex<'a> {
    by_identity: FxHashMap<&'a str, &'a Asset>,
    variants: Vec<&'a Asset>,
}

impl<'a> AssetIndex<'a> {
    /// Index `assets`. On duplicate identities the first one wins and a
    /// `duplicate-asset` warning is recorded.
    pub fn build(assets: &'a [Asset], diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut index = Self::default();

        for asset in assets {
            if index.by_identity.contains_key(asset.identity.as_str()) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::DuplicateAsset,
                        "duplicate asset identity, keeping the first occurrence",
                    )
                    .with_target(&asset.identity),
                );
                continue;
            }

            index.by_identity.insert(&asset.identity, asset);
            if asset.is_encoded_variant() {
                index.variants.push(asset);
            }
        }

        index
    }

    pub fn get(&self, identity: &str) -> Option<&'a Asset> {
        self.by_identity.get(identity).copied()
    }

    /// Encoded variants, in input order.
    pub fn variants(&self) -> &[&'a Asset] {
        &self.variants
    }
}

/// Asset identity → endpoints serving it, in input order.
#[derive(Debug, Default)]
pub struct EndpointIndex<'a> {
    by_asset: FxHashMap<&'a str, Vec<&'a Endpoint>>,
}

impl<'a> EndpointIndex<'a> {
    pub fn build(endpoints: &'a [Endpoint]) -> Self {
        let mut by_asset: FxHashMap<&'a str, Vec<&'a Endpoint>> = FxHashMap::default();
        for endpoint in endpoints {
            by_asset
                .entry(endpoint.asset_file.as_str())
                .or_default()
                .push(endpoint);
        }
        Self { by_asset }
    }

    pub fn get(&self, identity: &str) -> Option<&[&'a Endpoint]> {
        self.by_asset.get(identity).map(Vec::as_slice)
    }

    /// Drop the entries of `identity`, returning them if present.
    pub fn remove(&mut self, identity: &str) -> Option<Vec<&'a Endpoint>> {
        self.by_asset.remove(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_identity_first_wins() {
        let assets = vec![
            Asset::new("app.css", "first/app.css"),
            Asset::new("app.css", "second/app.css"),
        ];

        let mut diags = Vec::new();
        let index = AssetIndex::build(&assets, &mut diags);

        assert!(index.variants().is_empty());
        assert_eq!(index.get("app.css").unwrap().relative_path, "first/app.css");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::DuplicateAsset);
        assert_eq!(diags[0].target.as_deref(), Some("app.css"));
    }

    #[test]
    fn test_variants_in_input_order() {
        let assets = vec![
            Asset::new("b.js.br", "b.js.br").encoded("br", "b.js"),
            Asset::new("a.css", "a.css"),
            Asset::new("a.css.gz", "a.css.gz").encoded("gzip", "a.css"),
            Asset::new("b.js", "b.js"),
        ];

        let mut diags = Vec::new();
        let index = AssetIndex::build(&assets, &mut diags);
        let ids: Vec<_> = index.variants().iter().map(|a| a.identity.as_str()).collect();
        assert_eq!(ids, ["b.js.br", "a.css.gz"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_duplicate_variant_is_not_listed_twice() {
        let assets = vec![
            Asset::new("a.css.gz", "a.css.gz").encoded("gzip", "a.css"),
            Asset::new("a.css.gz", "a.css.gz").encoded("gzip", "a.css"),
        ];
        let mut diags = Vec::new();
        let index = AssetIndex::build(&assets, &mut diags);
        assert_eq!(index.variants().len(), 1);
    }

    #[test]
    fn test_endpoint_index_groups_by_asset() {
        let endpoints = vec![
            Endpoint::new("/a.css", "a.css"),
            Endpoint::new("/a.f1.css", "a.css"),
            Endpoint::new("/b.js", "b.js"),
        ];
        let mut index = EndpointIndex::build(&endpoints);

        let routes: Vec<_> = index.get("a.css").unwrap().iter().map(|e| e.route.as_str()).collect();
        assert_eq!(routes, ["/a.css", "/a.f1.css"]);
        assert!(index.get("missing").is_none());

        assert_eq!(index.remove("a.css").map(|v| v.len()), Some(2));
        assert!(index.get("a.css").is_none());
        assert_eq!(index.get("b.js").map(<[_]>::len), Some(1));
    }
}
