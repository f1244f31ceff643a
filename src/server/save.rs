//! Writing a reviewed note to disk.
//!
//! The target has already passed lexical validation. When an allowlist is
//! configured, the real path (symlinks resolved) is checked again before
//! anything is created, so a symlink inside the vault cannot redirect the
//! write outside it.

use crate::paths::{validate_path, AllowedPaths, PathRejection};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Rejected(#[from] PathRejection),

    #[error("Failed to resolve {}: {source}", path.display())]
    Resolve { path: PathBuf, source: io::Error },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Write `content` to `target`, creating parent directories as needed.
/// Existing files are overwritten in full.
pub async fn write_note(
    target: &Path,
    content: &str,
    allowed: &AllowedPaths,
) -> Result<PathBuf, SaveError> {
    if !allowed.is_unrestricted() {
        ensure_real_path_allowed(target, allowed).await?;
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| SaveError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    fs::write(target, content)
        .await
        .map_err(|source| SaveError::Write {
            path: target.to_path_buf(),
            source,
        })?;

    Ok(target.to_path_buf())
}

async fn ensure_real_path_allowed(target: &Path, allowed: &AllowedPaths) -> Result<(), SaveError> {
    let real_target = resolve_existing_prefix(target)
        .await
        .map_err(|source| SaveError::Resolve {
            path: target.to_path_buf(),
            source,
        })?;

    for dir in allowed.dirs() {
        let Ok(lexical) = validate_path(&dir.to_string_lossy()) else {
            continue;
        };
        // The allowed directory may not exist yet; resolve it like the target.
        let root = resolve_existing_prefix(&lexical).await.unwrap_or(lexical);
        if real_target.starts_with(&root) {
            return Ok(());
        }
    }

    tracing::warn!("Save target resolves outside the allowed directories");
    Err(PathRejection::OutsideAllowedDirs.into())
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// components that do not exist yet.
async fn resolve_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();

    loop {
        match fs::canonicalize(&existing).await {
            Ok(mut real) => {
                for name in missing.iter().rev() {
                    real.push(name);
                }
                return Ok(real);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let Some(name) = existing.file_name().map(|n| n.to_os_string()) else {
                    return Err(e);
                };
                missing.push(name);
                if !existing.pop() {
                    return Err(e);
                }
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_new_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("note.md");
        let written = write_note(&target, "# Hello", &AllowedPaths::unrestricted())
            .await
            .unwrap();

        assert_eq!(written, target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Hello");
    }

    #[tokio::test]
    async fn test_write_nested_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested/deeper/note.md");
        write_note(&target, "x", &AllowedPaths::unrestricted())
            .await
            .unwrap();
        assert!(target.exists());
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("note.md");
        std::fs::write(&target, "a much longer previous body").unwrap();

        write_note(&target, "short", &AllowedPaths::unrestricted())
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "short");
    }

    #[tokio::test]
    async fn test_preserves_utf8() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Título com Acentuação.md");
        let body = "Título com Acentuação: ção, ã, é";
        write_note(&target, body, &AllowedPaths::unrestricted())
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), body);
    }

    #[tokio::test]
    async fn test_allowed_dir_write() {
        let vault = TempDir::new().unwrap();
        let allowed = AllowedPaths::new(vec![vault.path().to_path_buf()]);
        let target = vault.path().join("sub/ok.md");

        write_note(&target, "ok", &allowed).await.unwrap();
        assert!(target.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let vault = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), vault.path().join("escape")).unwrap();

        let allowed = AllowedPaths::new(vec![vault.path().to_path_buf()]);
        let target = vault.path().join("escape/stolen.md");

        let result = write_note(&target, "nope", &allowed).await;
        assert!(matches!(
            result,
            Err(SaveError::Rejected(PathRejection::OutsideAllowedDirs))
        ));
        assert!(!outside.path().join("stolen.md").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_allowed_dir_under_symlinked_parent() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        // `link/vault` does not exist yet.
        let allowed = AllowedPaths::new(vec![link.join("vault")]);
        let target = link.join("vault/x.md");

        write_note(&target, "ok", &allowed).await.unwrap();
        assert_eq!(std::fs::read_to_string(real.join("vault/x.md")).unwrap(), "ok");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sibling_of_missing_allowed_dir_still_blocked() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let allowed = AllowedPaths::new(vec![link.join("vault")]);
        std::fs::create_dir(real.join("vault")).unwrap();
        std::os::unix::fs::symlink(tmp.path(), real.join("vault/escape")).unwrap();

        let result = write_note(&link.join("vault/escape/x.md"), "nope", &allowed).await;
        assert!(matches!(
            result,
            Err(SaveError::Rejected(PathRejection::OutsideAllowedDirs))
        ));
    }

    #[tokio::test]
    async fn test_resolve_existing_prefix_keeps_missing_tail() {
        let tmp = TempDir::new().unwrap();
        let real_root = std::fs::canonicalize(tmp.path()).unwrap();
        let resolved = resolve_existing_prefix(&tmp.path().join("a/b/c.md"))
            .await
            .unwrap();
        assert_eq!(resolved, real_root.join("a/b/c.md"));
    }
}
