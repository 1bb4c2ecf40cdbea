//! Path helpers for layer discovery.

use crate::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Canonicalize `path`; a missing path is returned unchanged.
pub(super) fn normalize_path(path: &Path) -> Result<PathBuf, ConfigError> {
    path.canonicalize().or_else(|err| match err.kind() {
        ErrorKind::NotFound => Ok(path.to_path_buf()),
        _ => Err(ConfigError::ReadFailed(err)),
    })
}

/// Key used to skip a layer file already loaded under another name.
pub(super) fn dedup_key(path: &Path) -> PathBuf {
    normalize_path(path).unwrap_or_else(|_| path.to_path_buf())
}
