//! `obsreview check-path <path>`: dry-run the save-path rules.

use crate::paths::{validate_save_path, AllowedPaths};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Print the normalized path on stdout, or fail with the rejection.
pub fn run_check_path(raw: &str, allowed: &AllowedPaths) -> Result<PathBuf> {
    match validate_save_path(raw, allowed) {
        Ok(path) => {
            println!("{}", path.display());
            if allowed.is_unrestricted() {
                eprintln!(
                    "  {} Valid path {}",
                    "✓".green().bold(),
                    "(ALLOWED_SAVE_PATHS not set)".dimmed()
                );
            } else {
                eprintln!("  {} Path is inside the allowed directories", "✓".green().bold());
            }
            Ok(path)
        }
        Err(rejection) => Err(anyhow::Error::new(rejection).context(format!("Rejected: {raw}"))),
    }
}
