//! The save-path allowlist (`ALLOWED_SAVE_PATHS`).

use crate::paths::validate::{validate_path, validate_path_with_allowed_dirs, PathRejection};
use std::path::PathBuf;

/// Directories `/api/save` may write into. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedPaths {
    dirs: Vec<PathBuf>,
}

impl AllowedPaths {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// No restriction: any path that passes basic validation is writable.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list. Entries are trimmed and blanks dropped.
    pub fn parse(raw: &str) -> Self {
        let dirs = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { dirs }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Validate a save target, applying the allowlist when one is configured.
pub fn validate_save_path(raw: &str, allowed: &AllowedPaths) -> Result<PathBuf, PathRejection> {
    if allowed.is_unrestricted() {
        validate_path(raw)
    } else {
        validate_path_with_allowed_dirs(raw, allowed.dirs())
    }
}
