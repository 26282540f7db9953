//! Byte-size resolution for encoded variants.
//!
//! | Resolver              | Source                                    |
//! |-----------------------|-------------------------------------------|
//! | `FileSizeResolver`    | `fs::metadata` under a root directory     |
//! | `TableSizeResolver`   | Precomputed `identity → size` table       |
//! | `LayeredSizeResolver` | table → override → filesystem             |

use std::fs;
use std::io;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::model::Asset;

#[derive(Debug, Error)]
pub enum SizeError {
    #[error("no size known for `{0}`")]
    Unknown(String),

    #[error("cannot read size of `{identity}` at `{}`", .path.display())]
    Io {
        identity: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Strategy for resolving an asset's byte length.
pub trait SizeResolver: Send + Sync {
    fn resolve(&self, asset: &Asset) -> Result<u64, SizeError>;
}

/// Reads the length of the file backing an asset.
///
/// The identity is tried first; when it names no file, the relative path is
/// tried against the same root.
#[derive(Debug, Clone)]
pub struct FileSizeResolver {
    root: PathBuf,
}

impl FileSizeResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SizeResolver for FileSizeResolver {
    fn resolve(&self, asset: &Asset) -> Result<u64, SizeError> {
        let primary = self.root.join(&asset.identity);
        let path = if primary.is_file() || asset.relative_path.is_empty() {
            primary
        } else {
            self.root.join(&asset.relative_path)
        };

        fs::metadata(&path)
            .map(|meta| meta.len())
            .map_err(|source| SizeError::Io {
                identity: asset.identity.clone(),
                path,
                source,
            })
    }
}

/// Fixed sizes keyed by asset identity.
#[derive(Debug, Clone, Default)]
pub struct TableSizeResolver {
    sizes: FxHashMap<String, u64>,
}

impl TableSizeResolver {
    pub fn get(&self, identity: &str) -> Option<u64> {
        self.sizes.get(identity).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }
}

#[cfg(test)]
impl TableSizeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identity: impl Into<String>, size: u64) {
        self.sizes.insert(identity.into(), size);
    }
}

impl FromIterator<(String, u64)> for TableSizeResolver {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            sizes: iter.into_iter().collect(),
        }
    }
}

impl SizeResolver for TableSizeResolver {
    fn resolve(&self, asset: &Asset) -> Result<u64, SizeError> {
        self.get(&asset.identity)
            .ok_or_else(|| SizeError::Unknown(asset.identity.clone()))
    }
}

/// Precomputed table first, then an injected override, then the filesystem.
///
/// Any layer may be absent. With no layer at all every lookup fails.
#[derive(Default)]
pub struct LayeredSizeResolver {
    table: Option<TableSizeResolver>,
    stub: Option<Box<dyn SizeResolver>>,
    files: Option<FileSizeResolver>,
}

impl LayeredSizeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableSizeResolver) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_override(mut self, stub: impl SizeResolver + 'static) -> Self {
        self.stub = Some(Box::new(stub));
        self
    }

    pub fn with_files(mut self, files: FileSizeResolver) -> Self {
        self.files = Some(files);
        self
    }
}

impl SizeResolver for LayeredSizeResolver {
    fn resolve(&self, asset: &Asset) -> Result<u64, SizeError> {
        if let Some(size) = self.table.as_ref().and_then(|t| t.get(&asset.identity)) {
            return Ok(size);
        }

        if let Some(stub) = &self.stub
            && let Ok(size) = stub.resolve(asset)
        {
            return Ok(size);
        }

        match &self.files {
            Some(files) => files.resolve(asset),
            None => Err(SizeError::Unknown(asset.identity.clone())),
        }
    }
}
