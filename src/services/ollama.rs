//! Ollama text-generation client
//!
//! This service wraps the Ollama `/api/generate` endpoint used to draft
//! notification bodies, including HTTP client setup, response parsing,
//! timeouts and error mapping.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use crate::config::settings::OllamaConfig;
use crate::utils::errors::{EventDeskError, GenerationError, GenerationResult, Result};
use crate::utils::logging::log_api_error;

/// Text generation capability
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` with the given model
    async fn generate(&self, prompt: &str, model: &str) -> GenerationResult<String>;
}

/// Request body for `/api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Response body of a non-streaming `/api/generate` call
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// HTTP client for a local or remote Ollama server
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    base_url: Url,
}

impl OllamaClient {
    /// Create a new OllamaClient instance
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("EventDesk/1.0")
            .build()
            .map_err(EventDeskError::Http)?;

        // A trailing slash keeps any path prefix when joining endpoint paths.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> GenerationResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))
    }

    /// Check whether the server answers at all
    pub async fn health_check(&self) -> bool {
        let Ok(url) = self.endpoint("api/tags") else {
            return false;
        };

        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Ollama health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> GenerationResult<String> {
        let url = self.endpoint("api/generate")?;
        debug!(url = %url, model = model, prompt_len = prompt.len(), "Making Ollama generate request");

        let request = GenerateRequest { model, prompt, stream: false };
        let response = self.client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::ServiceUnavailable
                } else {
                    GenerationError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log_api_error("ollama", &format!("HTTP {}", status), Some(&error_text));
            return Err(GenerationError::RequestFailed(
                format!("HTTP {}: {}", status, error_text)
            ));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::InvalidResponse(e.to_string())
            }
        })?;

        match body.response.map(|text| text.trim().to_string()) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

/// Generator used when AI drafting is switched off; every call fails fast
#[derive(Clone, Debug, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str, _model: &str) -> GenerationResult<String> {
        Err(GenerationError::ServiceUnavailable)
    }
}
