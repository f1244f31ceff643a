//! `obsreview` / `obsreview plan`: gate an agent's plan.
//!
//! Reads the hook event from stdin, serves the review, and hands back the
//! `PermissionRequest` payload for stdout.

use crate::browser::BrowserLauncher;
use crate::cli::run_review;
use crate::config::GateConfig;
use crate::decision::HookOutput;
use crate::event::{into_session, read_event};
use crate::session::ReviewSession;
use anyhow::{Context, Result};
use tokio::io::AsyncRead;

/// Everything that can fail before the server starts.
pub async fn load_plan_session<R: AsyncRead + Unpin>(input: R) -> Result<ReviewSession> {
    let event = read_event(input).await?;
    tracing::debug!("Hook event {}", event.origin());
    let session = into_session(&event).await?;
    tracing::info!("Loaded plan ({} bytes)", session.content.len());
    Ok(session)
}

pub async fn run_plan<R: AsyncRead + Unpin>(
    input: R,
    config: &GateConfig,
    launcher: &(dyn BrowserLauncher + Send + Sync),
) -> Result<HookOutput> {
    let session = load_plan_session(input)
        .await
        .context("Could not start plan review")?;
    let decision = run_review(session, config, launcher).await?;

    if decision.approved {
        tracing::info!("Plan approved");
    } else {
        tracing::info!("Plan denied");
    }
    Ok(HookOutput::permission_request(&decision))
}
