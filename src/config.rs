//! Runtime configuration for a review session.
//!
//! Built once at startup from CLI flags and environment (see `cli::GateArgs`)
//! and passed down explicitly. Nothing below this layer reads the
//! environment.

use crate::paths::AllowedPaths;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Time the browser gets to receive the final response before the
/// listener stops.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Directories `/api/save` may write to. Empty means unrestricted.
    pub allowed_save_paths: AllowedPaths,
    pub grace_period: Duration,
    pub open_browser: bool,
    /// Close the review as denied after this long without requests.
    /// `None` waits forever.
    pub inactivity_timeout: Option<Duration>,
    /// Loopback address, port 0 for an OS-assigned port.
    pub bind_addr: SocketAddr,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            allowed_save_paths: AllowedPaths::unrestricted(),
            grace_period: DEFAULT_GRACE_PERIOD,
            open_browser: true,
            inactivity_timeout: None,
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        }
    }
}

impl GateConfig {
    /// Log the security-relevant parts of the configuration.
    pub fn log_startup(&self) {
        if self.allowed_save_paths.is_unrestricted() {
            tracing::warn!(
                "ALLOWED_SAVE_PATHS is not set: /api/save may write anywhere this process can"
            );
        } else {
            tracing::info!(
                dirs = self.allowed_save_paths.dirs().len(),
                "Saves restricted to ALLOWED_SAVE_PATHS"
            );
        }

        if let Some(timeout) = self.inactivity_timeout {
            tracing::info!("Review closes after {}s of inactivity", timeout.as_secs());
        }
    }
}
