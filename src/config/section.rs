//! `negotiate.toml` sections.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ConfigDiagnostics, FieldPath};
use crate::negotiate::FINGERPRINT_PROPERTY;

/// `[negotiate]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiateSection {
    /// Negotiate encoded variants on the rayon pool.
    pub parallel: bool,
    /// Endpoint property compared between compressed and origin endpoints.
    pub fingerprint_property: String,
}

impl NegotiateSection {
    pub const FINGERPRINT_PROPERTY: FieldPath = FieldPath::new("negotiate.fingerprint_property");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.fingerprint_property.trim().is_empty() {
            diag.error_with_hint(
                Self::FINGERPRINT_PROPERTY,
                "must not be empty",
                format!("remove the field to use \"{FINGERPRINT_PROPERTY}\""),
            );
        }
    }
}

impl Default for NegotiateSection {
    fn default() -> Self {
        Self {
            parallel: true,
            fingerprint_property: FINGERPRINT_PROPERTY.to_string(),
        }
    }
}

/// `[sizes]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizesSection {
    /// Directory that asset identities are resolved against.
    pub root: PathBuf,
    /// Precomputed `identity → size` JSON table, consulted first.
    pub table: Option<PathBuf>,
}

impl SizesSection {
    pub const ROOT: FieldPath = FieldPath::new("sizes.root");
    pub const TABLE: FieldPath = FieldPath::new("sizes.table");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.root.is_dir() {
            diag.error(
                Self::ROOT,
                format!("directory '{}' does not exist", self.root.display()),
            );
        }
        if let Some(table) = &self.table
            && !table.is_file()
        {
            diag.error(
                Self::TABLE,
                format!("size table '{}' not found", table.display()),
            );
        }
    }

    pub(super) fn normalize(&mut self, root: &Path) {
        self.root = super::util::normalize_path(root, &self.root);
        if let Some(table) = self.table.take() {
            self.table = Some(super::util::normalize_path(root, &table));
        }
    }
}

impl Default for SizesSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            table: None,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Pretty-print JSON.
    pub pretty: bool,
    /// Emit only the endpoints of touched routes instead of the full set.
    pub updated_only: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pretty: true,
            updated_only: false,
        }
    }
}
