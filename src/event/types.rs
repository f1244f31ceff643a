//! The hook event delivered on stdin.
//!
//! Stdin format (from the calling tool):
//! {
//!   "hook_event_name": "PermissionRequest",
//!   "tool_name": "ExitPlanMode",
//!   "tool_input": { "plan": "1. Do the thing" }
//! }

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewEvent {
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    /// Plan file to read when neither `content` nor `plan` is set.
    #[serde(default, alias = "filePath")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
}

impl ReviewEvent {
    /// `content`, falling back to `plan`. Empty strings count as absent.
    pub fn note_content(&self) -> Option<&str> {
        let input = self.tool_input.as_ref()?;
        [input.content.as_deref(), input.plan.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
    }

    pub fn file_path(&self) -> Option<&str> {
        self.tool_input
            .as_ref()?
            .file_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    /// `hook_event_name/tool_name`, for logging.
    pub fn origin(&self) -> String {
        format!(
            "{}/{}",
            self.hook_event_name.as_deref().unwrap_or("unknown"),
            self.tool_name.as_deref().unwrap_or("unknown")
        )
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.tool_input
            .as_ref()?
            .plan_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}
