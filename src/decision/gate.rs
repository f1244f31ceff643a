//! Single-assignment decision slot shared by the route handlers.
//!
//! The first `resolve` wins; later calls are no-ops and report `false`.
//! Built on a `watch` channel so any number of tasks can wait for the
//! outcome and the resolved value stays readable afterwards.

use crate::decision::types::Decision;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct DecisionGate {
    slot: Arc<watch::Sender<Option<Decision>>>,
}

impl DecisionGate {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Install `decision` if nothing has been decided yet.
    /// Returns true when this call was the one that resolved the gate.
    pub fn resolve(&self, decision: Decision) -> bool {
        self.slot.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(decision);
            true
        })
    }

    pub fn current(&self) -> Option<Decision> {
        self.slot.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Wait until a decision is made. Returns immediately if one already was.
    pub async fn wait(&self) -> Decision {
        let mut rx = self.slot.subscribe();
        let resolved = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| value.clone());

        match resolved {
            Some(decision) => decision,
            // The sender lives in `self`, so the channel cannot close under us.
            None => std::future::pending().await,
        }
    }
}

impl Default for DecisionGate {
    fn default() -> Self {
        Self::new()
    }
}
