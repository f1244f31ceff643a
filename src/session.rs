//! What a review session shows the browser.

use crate::decision::{DEFAULT_ANNOTATE_FEEDBACK, DEFAULT_DENY_FEEDBACK};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewMode {
    /// Gate an agent's plan: approve or deny, JSON decision on stdout.
    PlanReview,
    /// Annotate a Markdown file: feedback text on stdout.
    Annotate,
}

impl ReviewMode {
    /// Feedback recorded when the reviewer sends none.
    pub fn default_feedback(self) -> &'static str {
        match self {
            ReviewMode::PlanReview => DEFAULT_DENY_FEEDBACK,
            ReviewMode::Annotate => DEFAULT_ANNOTATE_FEEDBACK,
        }
    }
}

/// The note under review. Immutable once the server starts.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    pub content: String,
    pub mode: ReviewMode,
    pub file_path: Option<PathBuf>,
    pub plan_name: Option<String>,
}

impl ReviewSession {
    pub fn plan(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mode: ReviewMode::PlanReview,
            file_path: None,
            plan_name: None,
        }
    }

    pub fn annotate(content: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            content: content.into(),
            mode: ReviewMode::Annotate,
            file_path: Some(file_path),
            plan_name: None,
        }
    }

    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.file_path = Some(file_path);
        self
    }

    pub fn with_plan_name(mut self, plan_name: impl Into<String>) -> Self {
        self.plan_name = Some(plan_name.into());
        self
    }
}
