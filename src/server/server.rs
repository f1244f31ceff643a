//! Ephemeral review server: bind, serve until the gate resolves, shut down.

use crate::config::GateConfig;
use crate::decision::{Decision, DecisionGate};
use crate::server::activity::watch_inactivity;
use crate::server::routes::{router, AppState};
use crate::session::ReviewSession;
use anyhow::{bail, Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long in-flight connections get to finish after shutdown is signalled.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// The review was stopped by a signal before anyone decided.
#[derive(Debug, Error)]
#[error("Review interrupted before a decision was made")]
pub struct ReviewInterrupted;

pub struct ReviewServer {
    listener: TcpListener,
    state: Arc<AppState>,
    grace_period: Duration,
    inactivity_timeout: Option<Duration>,
}

impl ReviewServer {
    /// Bind the listener. Port 0 in the config picks a free port.
    pub async fn bind(config: &GateConfig, session: ReviewSession) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind review server on {}", config.bind_addr))?;

        Ok(Self {
            listener,
            state: Arc::new(AppState::new(session, config.allowed_save_paths.clone())),
            grace_period: config.grace_period,
            inactivity_timeout: config.inactivity_timeout,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read review server address")
    }

    pub fn url(&self) -> Result<String> {
        let addr = self.local_addr()?;
        Ok(format!("http://127.0.0.1:{}", addr.port()))
    }

    /// Handle on the decision, for callers that resolve it out of band.
    pub fn gate(&self) -> DecisionGate {
        self.state.gate.clone()
    }

    /// Serve until a decision arrives, keep serving for the grace period so
    /// the browser gets its response, then stop and return the decision.
    /// Ctrl-C or SIGTERM stops the listener and fails with
    /// [`ReviewInterrupted`].
    pub async fn run(self) -> Result<Decision> {
        self.run_until(shutdown_signal()).await
    }

    /// Like [`run`](Self::run), interrupted by `interrupt` instead of signals.
    pub async fn run_until<F>(self, interrupt: F) -> Result<Decision>
    where
        F: Future<Output = ()>,
    {
        let Self {
            listener,
            state,
            grace_period,
            inactivity_timeout,
        } = self;
        let gate = state.gate.clone();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let app = router(state.clone());
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await
        });

        let watchdog = inactivity_timeout.map(|timeout| {
            tokio::spawn(watch_inactivity(
                state.activity.clone(),
                gate.clone(),
                timeout,
            ))
        });

        let decision = tokio::select! {
            decision = gate.wait() => decision,
            _ = interrupt => {
                tracing::warn!("Interrupted, shutting down review server");
                if let Some(watchdog) = watchdog {
                    watchdog.abort();
                }
                let _ = stop_tx.send(());
                stop_server(server).await;
                return Err(ReviewInterrupted.into());
            }
            result = &mut server => {
                match result {
                    Ok(Ok(())) => bail!("Review server stopped before a decision was made"),
                    Ok(Err(e)) => return Err(e).context("Review server failed"),
                    Err(e) => return Err(e).context("Review server task panicked"),
                }
            }
        };

        if let Some(watchdog) = watchdog {
            watchdog.abort();
        }

        tokio::time::sleep(grace_period).await;
        let _ = stop_tx.send(());
        stop_server(server).await;

        Ok(decision)
    }
}

/// Wait for the spawned server to finish its graceful shutdown, aborting it
/// after [`SHUTDOWN_TIMEOUT`].
async fn stop_server(mut server: JoinHandle<std::io::Result<()>>) {
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::debug!("Review server stopped"),
        Ok(Ok(Err(e))) => tracing::warn!("Review server error during shutdown: {e}"),
        Ok(Err(e)) => tracing::warn!("Review server task failed: {e}"),
        Err(_) => {
            tracing::warn!("Review server did not stop in time, aborting");
            server.abort();
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix. A handler that cannot be
/// installed never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
