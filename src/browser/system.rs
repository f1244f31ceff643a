//! Launchers backed by the operating system.

use crate::browser::BrowserLauncher;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Opens the default browser via `open`, `xdg-open` or `cmd /c start`.
pub struct SystemBrowser;

#[async_trait]
impl BrowserLauncher for SystemBrowser {
    async fn open(&self, url: &str) -> Result<()> {
        let (program, args) = browser_command(url);
        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("Failed to run {}", program))?;

        if !status.success() {
            bail!("{} exited with {}", program, status);
        }
        Ok(())
    }
}

fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "windows") {
        // The empty string is the window title; without it `start` treats
        // the URL as the title.
        let args = ["/c", "start", "", url].map(String::from).to_vec();
        ("cmd", args)
    } else if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

/// Does nothing. Used with `--no-browser`.
pub struct NoBrowser;

#[async_trait]
impl BrowserLauncher for NoBrowser {
    async fn open(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}
