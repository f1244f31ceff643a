//! Read the hook event from stdin and turn it into a review session.
//!
//! Every failure here is fatal for the process: the caller exits 1 before
//! any server is started.

use crate::event::types::ReviewEvent;
use crate::paths::validate_path;
use crate::session::ReviewSession;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to read hook event from stdin")]
    Read(#[source] std::io::Error),

    #[error("Failed to parse hook event JSON")]
    Parse(#[from] serde_json::Error),

    #[error("No plan content found in hook event")]
    EmptyContent,
}

/// Read the whole input once and parse it.
pub async fn read_event<R: AsyncRead + Unpin>(mut input: R) -> Result<ReviewEvent, EventError> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .await
        .map_err(EventError::Read)?;
    parse_event(&raw)
}

pub fn parse_event(raw: &str) -> Result<ReviewEvent, EventError> {
    Ok(serde_json::from_str(raw)?)
}

/// Build the plan-review session for an event.
///
/// Inline `content`/`plan` wins. Otherwise `file_path` is validated and read;
/// an unusable file ends the same way as an event with no content at all.
pub async fn into_session(event: &ReviewEvent) -> Result<ReviewSession, EventError> {
    let mut session = match event.note_content() {
        Some(content) => ReviewSession::plan(content),
        None => load_plan_file(event).await?,
    };

    if let Some(name) = event.plan_name() {
        session = session.with_plan_name(name);
    }
    Ok(session)
}

async fn load_plan_file(event: &ReviewEvent) -> Result<ReviewSession, EventError> {
    let raw_path = event.file_path().ok_or(EventError::EmptyContent)?;

    let path = match validate_path(raw_path) {
        Ok(path) => path,
        Err(rejection) => {
            tracing::warn!("Ignoring plan file path: {rejection}");
            return Err(EventError::EmptyContent);
        }
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(content) if !content.is_empty() => Ok(ReviewSession::plan(content).with_file_path(path)),
        Ok(_) => Err(EventError::EmptyContent),
        Err(e) => {
            tracing::warn!("Failed to read plan file {}: {e}", path.display());
            Err(EventError::EmptyContent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_plan_field() {
        let event = read_event(&br#"{"tool_input":{"plan":"Do the thing"}}"#[..])
            .await
            .unwrap();
        let session = into_session(&event).await.unwrap();
        assert_eq!(session.content, "Do the thing");
        assert!(session.file_path.is_none());
    }

    #[tokio::test]
    async fn test_content_wins_over_plan() {
        let event = parse_event(r#"{"tool_input":{"content":"A","plan":"B"}}"#).unwrap();
        assert_eq!(into_session(&event).await.unwrap().content, "A");
    }

    #[tokio::test]
    async fn test_empty_content_falls_back_to_plan() {
        let event = parse_event(r#"{"tool_input":{"content":"","plan":"B"}}"#).unwrap();
        assert_eq!(into_session(&event).await.unwrap().content, "B");
    }

    #[tokio::test]
    async fn test_no_content_is_fatal() {
        for raw in [r#"{"tool_input":{}}"#, r#"{}"#, r#"{"tool_input":null}"#] {
            let event = parse_event(raw).unwrap();
            assert!(matches!(
                into_session(&event).await,
                Err(EventError::EmptyContent)
            ));
        }
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(parse_event("not json"), Err(EventError::Parse(_))));
        assert!(matches!(parse_event(""), Err(EventError::Parse(_))));
    }

    #[tokio::test]
    async fn test_reads_plan_file_when_no_inline_content() {
        let tmp = TempDir::new().unwrap();
        let plan = tmp.path().join("plan.md");
        std::fs::write(&plan, "# Plan\n\n1. Step").unwrap();

        let raw = serde_json::json!({
            "tool_input": { "file_path": plan.to_string_lossy(), "plan_name": "refactor" }
        })
        .to_string();
        let session = into_session(&parse_event(&raw).unwrap()).await.unwrap();

        assert_eq!(session.content, "# Plan\n\n1. Step");
        assert_eq!(session.plan_name.as_deref(), Some("refactor"));
        assert!(session.file_path.is_some());
    }

    #[tokio::test]
    async fn test_missing_plan_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let raw = serde_json::json!({
            "tool_input": { "filePath": tmp.path().join("gone.md").to_string_lossy() }
        })
        .to_string();
        assert!(matches!(
            into_session(&parse_event(&raw).unwrap()).await,
            Err(EventError::EmptyContent)
        ));
    }
}
