//! `obsreview annotate <file>`: collect free-form feedback on a Markdown file.

use crate::browser::BrowserLauncher;
use crate::cli::run_review;
use crate::config::GateConfig;
use crate::decision::DEFAULT_ANNOTATE_FEEDBACK;
use crate::paths::validate_path;
use crate::session::ReviewSession;
use anyhow::{Context, Result};

pub async fn load_annotate_session(raw_path: &str) -> Result<ReviewSession> {
    let path = validate_path(raw_path).with_context(|| format!("Invalid file path: {raw_path}"))?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::info!("Annotating {}", path.display());
    Ok(ReviewSession::annotate(content, path))
}

/// Returns the feedback text to print on stdout.
pub async fn run_annotate(
    raw_path: &str,
    config: &GateConfig,
    launcher: &(dyn BrowserLauncher + Send + Sync),
) -> Result<String> {
    let session = load_annotate_session(raw_path).await?;
    let decision = run_review(session, config, launcher).await?;
    Ok(decision.feedback_or(DEFAULT_ANNOTATE_FEEDBACK).to_string())
}
