//! JSON bodies exchanged with the subtask proxy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct SuggestRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SuggestResponse {
    pub subtasks: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Instruction sent upstream for a task title.
pub fn subtask_prompt(title: &str) -> String {
    format!(
        "Break down the following task into 3 to 5 smaller, actionable subtasks. \
Each subtask should be concise. Provide ONLY the comma-separated subtasks, \
with no additional text, numbering, or explanations.
For example:
Task: \"Plan birthday party\"
Output: Book venue, Send invitations, Order cake, Plan decorations, Prepare playlist

Task: \"{title}\"
Output:"
    )
}

/// Splits a comma-separated model reply into trimmed, non-empty entries.
pub fn parse_subtasks(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
