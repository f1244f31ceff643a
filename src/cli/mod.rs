//! Subcommands and the flags they share.

pub mod annotate;
pub mod check;
pub mod plan;

use crate::browser::BrowserLauncher;
use crate::config::GateConfig;
use crate::decision::Decision;
use crate::paths::AllowedPaths;
use crate::server::ReviewServer;
use crate::session::ReviewSession;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::time::Duration;

/// Flags every review shares. Flattened into the top-level parser.
#[derive(Debug, Clone, Args)]
pub struct GateArgs {
    /// Comma-separated directories `/api/save` may write to (unset: anywhere)
    #[arg(long, env = "ALLOWED_SAVE_PATHS", global = true)]
    pub allowed_save_paths: Option<String>,

    /// Print the review URL instead of opening a browser
    #[arg(long, global = true)]
    pub no_browser: bool,

    /// Milliseconds to keep serving after the decision
    #[arg(long, default_value_t = 1500, global = true)]
    pub grace_ms: u64,

    /// Deny the review after this many minutes without requests
    #[arg(long, global = true)]
    pub timeout_mins: Option<u64>,
}

impl GateArgs {
    pub fn into_config(self) -> GateConfig {
        GateConfig {
            allowed_save_paths: self
                .allowed_save_paths
                .as_deref()
                .map(AllowedPaths::parse)
                .unwrap_or_default(),
            grace_period: Duration::from_millis(self.grace_ms),
            open_browser: !self.no_browser,
            inactivity_timeout: self
                .timeout_mins
                .filter(|mins| *mins > 0)
                .map(|mins| Duration::from_secs(mins * 60)),
            ..GateConfig::default()
        }
    }
}

/// Serve `session` until the human decides.
pub async fn run_review(
    session: ReviewSession,
    config: &GateConfig,
    launcher: &(dyn BrowserLauncher + Send + Sync),
) -> Result<Decision> {
    config.log_startup();

    let server = ReviewServer::bind(config, session).await?;
    let url = server.url()?;
    tracing::info!("Review server listening on {url}");

    if config.open_browser {
        if let Err(e) = launcher.open(&url).await {
            tracing::warn!("Could not open a browser: {e:#}");
            eprintln!("  {} Open {} to review", "→".blue(), url.cyan());
        }
    } else {
        eprintln!("  {} Open {} to review", "→".blue(), url.cyan());
    }

    server.run().await
}
