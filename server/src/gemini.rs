use std::time::Duration;

use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::ProxyError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Text generation against the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn generate_text(&self, prompt: &str) -> Result<String, ProxyError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );
        info!("Making Gemini request: model={}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest {
                contents: vec![Content {
                    parts: vec![RequestPart { text: prompt }],
                }],
            })
            .send()
            .await
            .map_err(|e| upstream(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(upstream(format!("API returned {status}: {body}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| upstream(format!("failed to parse response: {e}")))?;

        // no candidate at all means the prompt was blocked; blank text is a valid empty reply
        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| upstream("response contained no candidates".to_string()))?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

fn upstream(detail: String) -> ProxyError {
    error!("Gemini error: {}", detail);
    ProxyError::Upstream
}
