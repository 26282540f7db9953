//! Asset and endpoint descriptor types.
//!
//! Field names follow the JSON manifest layout (camelCase), so the same
//! types are used for reading build state and writing the result.

use serde::{Deserialize, Serialize};

/// Header, trait and selector name for the encoding dimension.
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ETAG: &str = "ETag";
pub const VARY: &str = "Vary";

/// Prefix marking a validator as weak (`W/"abc"`).
pub const WEAK_PREFIX: &str = "W/";

/// A static file known to the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique, path-like key.
    pub identity: String,
    #[serde(default)]
    pub relative_path: String,
    #[serde(default, rename = "assetTraitName", skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
    #[serde(default, rename = "assetTraitValue", skip_serializing_if = "Option::is_none")]
    pub trait_value: Option<String>,
    /// Identity of the asset this one was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_asset: Option<String>,
}

impl Asset {
    /// Whether this asset carries the `Content-Encoding` trait.
    pub fn is_encoded_variant(&self) -> bool {
        self.trait_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(CONTENT_ENCODING))
    }

    /// Encoding label (`gzip`, `br`, ...). Empty when the trait has no value.
    pub fn encoding(&self) -> &str {
        self.trait_value.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
impl Asset {
    pub fn new(identity: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            relative_path: relative_path.into(),
            trait_name: None,
            trait_value: None,
            related_asset: None,
        }
    }

    /// Mark this asset as an encoded variant of `related`.
    pub fn encoded(mut self, encoding: impl Into<String>, related: impl Into<String>) -> Self {
        self.trait_name = Some(CONTENT_ENCODING.to_string());
        self.trait_value = Some(encoding.into());
        self.related_asset = Some(related.into());
        self
    }
}

/// One dimension of content negotiation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Selector {
    pub name: String,
    pub value: String,
    /// Fixed-point decimal string in (0, 1].
    pub quality: String,
}

impl Selector {
    pub fn new(name: impl Into<String>, value: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quality: quality.into(),
        }
    }

    #[inline]
    pub fn is_encoding(&self) -> bool {
        self.name.eq_ignore_ascii_case(CONTENT_ENCODING)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub name: String,
    pub value: String,
}

impl ResponseHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive header name comparison.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointProperty {
    pub name: String,
    pub value: String,
}

/// A route exposed for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub route: String,
    /// Identity of the asset served at `route`.
    pub asset_file: String,
    #[serde(default)]
    pub selectors: Vec<Selector>,
    #[serde(default)]
    pub response_headers: Vec<ResponseHeader>,
    #[serde(default, rename = "endpointProperties")]
    pub properties: Vec<EndpointProperty>,
}

impl Endpoint {
    pub fn has_header(&self, name: &str) -> bool {
        self.response_headers.iter().any(|h| h.is(name))
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn has_encoding_selector(&self) -> bool {
        self.selectors.iter().any(Selector::is_encoding)
    }
}

#[cfg(test)]
impl Endpoint {
    pub fn new(route: impl Into<String>, asset_file: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            asset_file: asset_file.into(),
            selectors: Vec::new(),
            response_headers: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.push(ResponseHeader::new(name, value));
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(EndpointProperty {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// First header value with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }
}
