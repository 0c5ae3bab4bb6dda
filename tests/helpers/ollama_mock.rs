//! Mock Ollama server for testing
//!
//! Simulates the `/api/generate` and `/api/tags` endpoints with wiremock.

use std::time::Duration;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};
use EventDesk::config::OllamaConfig;

/// Mock Ollama server for testing
pub struct OllamaMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub body: Value,
}

impl MockResponseConfig {
    /// A successful non-streaming answer carrying `text`
    pub fn text(text: &str) -> Self {
        Self {
            status: 200,
            delay_ms: None,
            body: json!({
                "model": "llama3.1",
                "created_at": "2025-01-01T00:00:00Z",
                "response": text,
                "done": true
            }),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            delay_ms: None,
            body: json!({ "error": "model crashed" }),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

impl OllamaMockServer {
    /// Start a new mock Ollama server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Settings pointing at this server
    pub fn config(&self, timeout_seconds: u64) -> OllamaConfig {
        OllamaConfig {
            base_url: self.uri(),
            model: "llama3.1".to_string(),
            timeout_seconds,
            enabled: true,
        }
    }

    /// Setup mock for the generate endpoint
    pub async fn mock_generate(&self, config: MockResponseConfig) {
        let mut response = ResponseTemplate::new(config.status).set_body_json(config.body);
        if let Some(delay) = config.delay_ms {
            response = response.set_delay(Duration::from_millis(delay));
        }

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({ "model": "llama3.1", "stream": false })))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Setup mock for the model listing used by the health check
    pub async fn mock_tags(&self) {
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every generate request received so far
    pub async fn generate_requests(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/api/generate")
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
