//! JSON manifest and size-table persistence.
//!
//! Manifest layout:
//!
//! ```json
//! {
//!   "assets":    [{ "identity": "...", "relativePath": "...", ... }],
//!   "endpoints": [{ "route": "/...", "assetFile": "...", ... }]
//! }
//! ```
//!
//! Size tables are flat objects: `{ "app.css.gz": 40 }`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::negotiate::{Asset, Endpoint, TableSizeResolver};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when accessing `{}`", .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("invalid JSON in `{}`", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Assets and endpoints of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        read_json(path)
    }
}

/// Load an `identity → size` table.
pub fn load_size_table(path: &Path) -> Result<TableSizeResolver, ManifestError> {
    let sizes: std::collections::BTreeMap<String, u64> = read_json(path)?;
    Ok(sizes.into_iter().collect())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let content = fs::read_to_string(path).map_err(|err| ManifestError::Io(path.to_path_buf(), err))?;
    serde_json::from_str(&content).map_err(|err| ManifestError::Json(path.to_path_buf(), err))
}

/// Serialize `value` as compact or pretty JSON.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Write `value` to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), ManifestError> {
    let json = to_json(value, pretty).map_err(|err| ManifestError::Json(path.to_path_buf(), err))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ManifestError::Io(parent.to_path_buf(), err))?;
    }
    fs::write(path, json).map_err(|err| ManifestError::Io(path.to_path_buf(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"{
                "assets": [
                    { "identity": "app.css", "relativePath": "app.css" },
                    { "identity": "app.css.gz", "relativePath": "app.css.gz",
                      "assetTraitName": "Content-Encoding", "assetTraitValue": "gzip",
                      "relatedAsset": "app.css" }
                ],
                "endpoints": [
                    { "route": "/app.css", "assetFile": "app.css",
                      "responseHeaders": [{ "name": "Content-Type", "value": "text/css" }] }
                ]
            }"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.assets.len(), 2);
        assert!(manifest.assets[1].is_encoded_variant());
        assert_eq!(manifest.endpoints[0].header("content-type"), Some("text/css"));
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/endpoints.json");
        let manifest = Manifest {
            assets: vec![Asset::new("a", "a")],
            endpoints: vec![Endpoint::new("/a", "a")],
        };

        write_json(&path, &manifest, false).unwrap();
        assert_eq!(Manifest::load(&path).unwrap(), manifest);
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Json(..)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Io(..)));
    }

    #[test]
    fn test_load_size_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sizes.json");
        fs::write(&path, r#"{ "app.css.gz": 40, "app.js.br": 12 }"#).unwrap();

        let table = load_size_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("app.css.gz"), Some(40));
    }
}
