use std::time::Duration;

use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::protocol::{ErrorResponse, SuggestRequest, SuggestResponse};

pub const GENERIC_FAILURE: &str = "Failed to generate subtasks from AI.";

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("a task title is required to suggest subtasks")]
    InvalidInput,

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("no subtasks were suggested")]
    EmptyResult,

    #[error("could not reach the subtask service: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SuggestError {
    /// True when the request worked but produced nothing usable.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, SuggestError::EmptyResult)
    }
}

/// Asks the proxy endpoint for subtasks of a task title. Holds no task state.
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    client: Client,
    endpoint: Url,
}

impl SuggestionClient {
    pub fn new(endpoint: Url) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Single attempt; no retry.
    pub async fn suggest(&self, title: &str) -> Result<Vec<String>, SuggestError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SuggestError::InvalidInput);
        }

        info!("Requesting subtasks from {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SuggestRequest {
                prompt: title.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                error!("Subtask request failed: {}", e);
                SuggestError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            error!("Subtask service returned {}: {}", status, message);
            return Err(SuggestError::Upstream { status, message });
        }

        let body: SuggestResponse = response.json().await?;
        debug!("Received {} subtasks", body.subtasks.len());
        if body.subtasks.is_empty() {
            return Err(SuggestError::EmptyResult);
        }
        Ok(body.subtasks)
    }
}
