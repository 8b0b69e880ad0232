use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: String,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl Task {
    /// Copy of this task with the editable fields replaced.
    ///
    /// Title and description are trimmed. Unlike [`NewTask::new`] an empty
    /// description is accepted here.
    pub fn edited(&self, title: &str, description: &str, due_date: &str) -> Task {
        Task {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            due_date: due_date.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Creation payload; the store assigns the id and starts with no subtasks.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl NewTask {
    pub fn new(title: &str, description: &str, due_date: &str) -> Result<Self, ValidationError> {
        let title = required("title", title)?;
        let description = required("description", description)?;
        let due_date = required("due date", due_date)?;

        Ok(Self {
            title,
            description,
            status: TaskStatus::Pending,
            due_date,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}
