//! Keeps origin fallbacks and route neighbours alive.
//!
//! Downstream consumers replace *every* endpoint of a route with the ones
//! found in the update set. Two kinds of endpoints would be lost that way:
//! the uncompressed origin endpoints a negotiated route falls back to, and
//! endpoints of untouched assets that happen to share a touched route.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use super::index::EndpointIndex;
use super::model::Endpoint;
use super::set::EndpointSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardStats {
    /// Origin endpoints added from the preserve-set.
    pub preserved: usize,
    /// Untouched endpoints re-added because they share a route.
    pub collisions: usize,
}

/// Add preserved origin endpoints, then re-add untouched endpoints whose
/// route already appears in `output`.
///
/// `endpoints` is the run input, used to visit the untouched entries in
/// input order.
pub fn guard(
    output: &mut EndpointSet,
    index: &mut EndpointIndex<'_>,
    endpoints: &[Endpoint],
    preserve: &BTreeSet<(String, String)>,
    touched: &FxHashSet<&str>,
) -> GuardStats {
    let mut stats = GuardStats::default();

    for (route, origin) in preserve {
        let Some(candidates) = index.get(origin) else {
            continue;
        };
        for endpoint in candidates.iter().filter(|e| &e.route == route) {
            if output.insert((*endpoint).clone()) {
                stats.preserved += 1;
            }
        }
    }

    for identity in touched {
        index.remove(identity);
    }

    let mut by_route: FxHashMap<&str, Vec<&Endpoint>> = FxHashMap::default();
    for endpoint in endpoints
        .iter()
        .filter(|e| index.get(&e.asset_file).is_some())
    {
        by_route.entry(endpoint.route.as_str()).or_default().push(endpoint);
    }

    let routes: Vec<String> = output.routes().map(str::to_string).collect();
    for route in routes {
        let Some(shared) = by_route.get(route.as_str()) else {
            continue;
        };
        for &endpoint in shared {
            if output.insert(endpoint.clone()) {
                stats.collisions += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preserve(pairs: &[(&str, &str)]) -> BTreeSet<(String, String)> {
        pairs
            .iter()
            .map(|(r, o)| (r.to_string(), o.to_string()))
            .collect()
    }

    #[test]
    fn test_preserved_origin_endpoints_are_added() {
        let endpoints = vec![
            Endpoint::new("/app.css", "app.css"),
            Endpoint::new("/app.f1.css", "app.css"),
            Endpoint::new("/app.css.gz", "app.css.gz"),
        ];
        let mut index = EndpointIndex::build(&endpoints);
        let touched: FxHashSet<&str> = ["app.css", "app.css.gz"].into_iter().collect();
        let mut output = EndpointSet::new();
        output.insert(Endpoint::new("/app.css.gz", "app.css.gz"));

        let stats = guard(
            &mut output,
            &mut index,
            &endpoints,
            &preserve(&[("/app.css", "app.css")]),
            &touched,
        );

        assert_eq!(stats, GuardStats { preserved: 1, collisions: 0 });
        assert!(output.contains(&endpoints[0]));
        assert!(!output.contains(&endpoints[1]));
    }

    #[test]
    fn test_untouched_endpoint_on_shared_route_survives() {
        let endpoints = vec![
            Endpoint::new("/r", "x.txt"),
            Endpoint::new("/r", "y.txt"),
            Endpoint::new("/other", "z.txt"),
        ];
        let mut index = EndpointIndex::build(&endpoints);
        let touched: FxHashSet<&str> = ["y.txt", "y.txt.gz"].into_iter().collect();
        let mut output = EndpointSet::new();
        output.insert(Endpoint::new("/r", "y.txt.gz"));

        let stats = guard(&mut output, &mut index, &endpoints, &BTreeSet::new(), &touched);

        assert_eq!(stats.collisions, 1);
        assert!(output.contains(&endpoints[0]));
        // touched assets are not re-added through the collision path
        assert!(!output.contains(&endpoints[1]));
        // unrelated routes stay out of the update set
        assert!(!output.contains(&endpoints[2]));
    }

    #[test]
    fn test_preserve_for_unknown_origin_is_ignored() {
        let endpoints = vec![Endpoint::new("/a", "a")];
        let mut index = EndpointIndex::build(&endpoints);
        let mut output = EndpointSet::new();

        let stats = guard(
            &mut output,
            &mut index,
            &endpoints,
            &preserve(&[("/a", "missing")]),
            &FxHashSet::default(),
        );
        assert_eq!(stats, GuardStats::default());
        assert!(output.is_empty());
    }
}
