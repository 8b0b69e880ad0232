use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use smarttask_shared::protocol::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Google Gemini API key not configured.")]
    MissingApiKey,

    /// Details are logged where the failure happens, never sent to the client.
    #[error("Failed to generate subtasks from AI.")]
    Upstream,
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingPrompt => StatusCode::BAD_REQUEST,
            ProxyError::MissingApiKey | ProxyError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
