//! Save-path validation: the boundary between a path typed in the browser
//! and the filesystem.
//!
//! Validation is purely lexical: no filesystem access happens here. Paths are
//! normalized to an absolute, `/`-separated form with every `.`/`..` segment
//! resolved, so the result can be compared component-wise against the
//! configured allowlist. Symlinks are re-checked at write time by
//! `server::save`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a path was refused.
///
/// The messages are shown to the browser client, so they never echo the
/// resolved path or the configured allowlist back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("Path is required")]
    Required,
    #[error("Invalid characters in path")]
    InvalidCharacters,
    #[error("Path traversal detected")]
    Traversal,
    #[error("Path is not within any allowed directory")]
    OutsideAllowedDirs,
    #[error("Unable to resolve path")]
    Unresolvable,
}

/// Percent-encoded, double-encoded and overlong UTF-8 spellings of `.`, `/`
/// and `\`. A literal `%25` elsewhere in a file name is allowed.
const ENCODED_TRAVERSAL: &[&str] = &[
    "%2e", "%2f", "%5c", "%252e", "%252f", "%255c", "%c0%ae", "%c0%af", "%c1%9c", "%e0%80%ae",
];

/// Validate a path, resolving relative input against the current directory.
pub fn validate_path(raw: &str) -> Result<PathBuf, PathRejection> {
    let base = std::env::current_dir().map_err(|_| PathRejection::Unresolvable)?;
    validate_path_from(raw, &base)
}

/// Validate a path and require it to live under one of `allowed_dirs`.
pub fn validate_path_with_allowed_dirs<P: AsRef<Path>>(
    raw: &str,
    allowed_dirs: &[P],
) -> Result<PathBuf, PathRejection> {
    let base = std::env::current_dir().map_err(|_| PathRejection::Unresolvable)?;
    validate_path_within(raw, allowed_dirs, &base)
}

/// Like [`validate_path`], with an explicit base for relative input.
pub fn validate_path_from(raw: &str, base: &Path) -> Result<PathBuf, PathRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathRejection::Required);
    }

    let lowered = trimmed.to_ascii_lowercase();
    if trimmed.chars().any(char::is_control)
        || lowered.contains("%00")
        || lowered.contains("%2500")
    {
        return Err(PathRejection::InvalidCharacters);
    }
    if ENCODED_TRAVERSAL.iter().any(|seq| lowered.contains(seq)) {
        return Err(PathRejection::Traversal);
    }

    let unified = trimmed.replace('\\', "/");
    if let Some((root, rest)) = split_root(&unified) {
        return rooted(render(&root, &resolve_absolute(rest)));
    }

    // Relative input may not climb above the directory it is relative to.
    let relative = resolve_relative(&unified)?;
    let base_unified = base.to_string_lossy().replace('\\', "/");
    let (root, base_rest) = split_root(&base_unified).ok_or(PathRejection::Unresolvable)?;
    let mut segments = resolve_absolute(base_rest);
    segments.extend(relative);
    rooted(render(&root, &segments))
}

/// A drive prefix only roots a path on Windows. Elsewhere `C:/notes` would
/// be relative to the working directory, so it is refused.
fn rooted(path: PathBuf) -> Result<PathBuf, PathRejection> {
    if path.has_root() {
        Ok(path)
    } else {
        Err(PathRejection::Unresolvable)
    }
}

/// Like [`validate_path_with_allowed_dirs`], with an explicit base for
/// relative input (both for `raw` and for the allowed directories).
pub fn validate_path_within<P: AsRef<Path>>(
    raw: &str,
    allowed_dirs: &[P],
    base: &Path,
) -> Result<PathBuf, PathRejection> {
    let normalized = validate_path_from(raw, base)?;

    let inside = allowed_dirs.iter().any(|dir| {
        // `Path::starts_with` compares whole components, so `/vault` never
        // matches `/vault-other` or `/vaultBACKUP`.
        validate_path_from(&dir.as_ref().to_string_lossy(), base)
            .map(|root| normalized.starts_with(&root))
            .unwrap_or(false)
    });

    if inside {
        Ok(normalized)
    } else {
        Err(PathRejection::OutsideAllowedDirs)
    }
}

/// Split off an absolute root: `/` or a drive prefix such as `C:/`.
/// Returns `None` for relative paths.
fn split_root(unified: &str) -> Option<(String, &str)> {
    if let Some(rest) = unified.strip_prefix('/') {
        return Some(("/".to_string(), rest));
    }

    let bytes = unified.as_bytes();
    let is_drive = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/');
    if is_drive {
        let drive = (bytes[0] as char).to_ascii_uppercase();
        return Some((format!("{drive}:/"), &unified[2..]));
    }

    None
}

/// Resolve segments below an absolute root. `..` at the root stays there.
fn resolve_absolute(rest: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    segments
}

fn resolve_relative(path: &str) -> Result<Vec<&str>, PathRejection> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or(PathRejection::Traversal)?;
            }
            name => segments.push(name),
        }
    }
    Ok(segments)
}

fn render(root: &str, segments: &[&str]) -> PathBuf {
    PathBuf::from(format!("{root}{}", segments.join("/")))
}
