//! Structural de-duplication of endpoints.

use std::collections::BTreeMap;

use super::model::{Endpoint, Selector};

/// Identity of an endpoint: route, bound asset and ordered selectors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey {
    pub route: String,
    pub asset: String,
    pub selectors: Vec<Selector>,
}

impl EndpointKey {
    pub fn of(endpoint: &Endpoint) -> Self {
        Self {
            route: endpoint.route.clone(),
            asset: endpoint.asset_file.clone(),
            selectors: endpoint.selectors.clone(),
        }
    }
}

/// Set of endpoints keyed by [`EndpointKey`].
///
/// The first endpoint inserted for a key is kept. Iteration is sorted by
/// key, so two sets with the same members iterate identically.
#[derive(Debug, Clone, Default)]
pub struct EndpointSet {
    entries: BTreeMap<EndpointKey, Endpoint>,
}

impl EndpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless an endpoint with the same key exists. Returns whether
    /// the endpoint was added.
    pub fn insert(&mut self, endpoint: Endpoint) -> bool {
        let key = EndpointKey::of(&endpoint);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, endpoint);
        true
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        let mut last: Option<&str> = None;
        self.entries.keys().filter_map(move |key| {
            let route = key.route.as_str();
            if last == Some(route) {
                None
            } else {
                last = Some(route);
                Some(route)
            }
        })
    }

    pub fn into_vec(self) -> Vec<Endpoint> {
        self.entries.into_values().collect()
    }
}

#[cfg(test)]
impl EndpointSet {
    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.entries.contains_key(&EndpointKey::of(endpoint))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Endpoint> for EndpointSet {
    fn from_iter<I: IntoIterator<Item = Endpoint>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Endpoint> for EndpointSet {
    fn extend<I: IntoIterator<Item = Endpoint>>(&mut self, iter: I) {
        for endpoint in iter {
            self.insert(endpoint);
        }
    }
}
