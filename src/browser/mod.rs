pub mod system;

use anyhow::Result;
use async_trait::async_trait;

pub use system::{NoBrowser, SystemBrowser};

/// Opens the review UI for the human.
/// Launching is best-effort: callers log failures and print the URL instead.
#[async_trait]
pub trait BrowserLauncher {
    async fn open(&self, url: &str) -> Result<()>;
}
