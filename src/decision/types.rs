//! Decision and hook-output types.

use serde::{Deserialize, Serialize};

/// Feedback used when a plan is denied without a message.
pub const DEFAULT_DENY_FEEDBACK: &str = "Plan rejected by user";

/// Feedback used when an annotation session ends without a message.
pub const DEFAULT_ANNOTATE_FEEDBACK: &str = "No feedback provided.";

/// Feedback recorded when the inactivity watchdog closes the review.
pub const INACTIVITY_FEEDBACK: &str = "Session timed out due to inactivity";

/// The outcome of a review. Resolved once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub approved: bool,
    /// Only set when `approved` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Decision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            feedback: None,
        }
    }

    pub fn deny(feedback: impl Into<String>) -> Self {
        Self {
            approved: false,
            feedback: Some(feedback.into()),
        }
    }

    /// The feedback text, or `default` when none was given.
    pub fn feedback_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.feedback.as_deref().unwrap_or(default)
    }
}

/// What the calling tool reads from stdout when a plan review finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub decision: PermissionDecision,
}

/// `{"behavior":"allow"}` or `{"behavior":"deny","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "lowercase")]
pub enum PermissionDecision {
    Allow,
    Deny { message: String },
}

impl HookOutput {
    /// Build the `PermissionRequest` payload for a decision.
    pub fn permission_request(decision: &Decision) -> Self {
        let decision = if decision.approved {
            PermissionDecision::Allow
        } else {
            PermissionDecision::Deny {
                message: decision.feedback_or(DEFAULT_DENY_FEEDBACK).to_string(),
            }
        };

        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: "PermissionRequest".to_string(),
                decision,
            },
        }
    }

    /// Single-line JSON, as written to stdout.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
