//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file, walking up from `start`.
///
/// Absolute paths are returned as-is when they exist.
///
/// ```text
/// /home/user/site/obj/compressed/  ← start
/// /home/user/site/negotiate.toml   ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Resolve `path` against `root` and canonicalize when possible.
pub fn normalize_path(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}
