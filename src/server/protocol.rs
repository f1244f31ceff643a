//! JSON bodies exchanged with the review UI.

use crate::session::{ReviewMode, ReviewSession};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `GET /api/content` (and `/api/plan`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub content: String,
    /// Same text as `content`; older UI builds read this field.
    pub plan: String,
    pub mode: ReviewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

impl From<&ReviewSession> for ContentResponse {
    fn from(session: &ReviewSession) -> Self {
        Self {
            content: session.content.clone(),
            plan: session.content.clone(),
            mode: session.mode,
            file_path: session
                .file_path
                .as_deref()
                .map(|p| p.display().to_string()),
            plan_name: session.plan_name.clone(),
        }
    }
}

/// `{"ok": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body of `/api/deny` and the annotate-mode feedback routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub annotations: Option<AnnotationSummary>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationSummary {
    #[serde(default)]
    pub summary: Option<String>,
}

impl FeedbackRequest {
    /// First non-blank of `feedback`, `annotations.summary`, `prompt`, trimmed.
    pub fn feedback_text(&self) -> Option<String> {
        let summary = self.annotations.as_ref().and_then(|a| a.summary.as_deref());
        [self.feedback.as_deref(), summary, self.prompt.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Body of `/api/save`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn saved(path: &Path) -> Self {
        Self {
            ok: true,
            message: Some("Note saved".to_string()),
            path: Some(path.display().to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: None,
            path: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_priority() {
        let request: FeedbackRequest = serde_json::from_str(
            r#"{"feedback":"  ","annotations":{"summary":" Fix step 2 "},"prompt":"p"}"#,
        )
        .unwrap();
        assert_eq!(request.feedback_text().as_deref(), Some("Fix step 2"));
    }

    #[test]
    fn test_feedback_absent() {
        let request: FeedbackRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.feedback_text(), None);
    }

    #[test]
    fn test_content_response_fields() {
        let session = ReviewSession::plan("Do the thing").with_plan_name("p1");
        let value = serde_json::to_value(ContentResponse::from(&session)).unwrap();
        assert_eq!(value["content"], "Do the thing");
        assert_eq!(value["plan"], "Do the thing");
        assert_eq!(value["mode"], "plan-review");
        assert_eq!(value["planName"], "p1");
        assert!(value.get("filePath").is_none());
    }

    #[test]
    fn test_save_response_omits_empty_fields() {
        let json = serde_json::to_string(&SaveResponse::failed("nope")).unwrap();
        assert_eq!(json, r#"{"ok":false,"error":"nope"}"#);
    }
}
