//! Ollama chat client implementation

use super::client::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Configuration for an Ollama-style chat endpoint
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://127.0.0.1:11434`
    pub base_url: String,
    pub default_model: String,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// A local Ollama daemon on the default port
    pub fn local() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".into(),
            default_model: "qwen2.5:3b".into(),
            timeout_secs: 120,
        }
    }

    pub fn with_endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::local()
    }
}

/// Ollama chat client
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

impl ChatClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let model = request.model.as_deref().unwrap_or(self.default_model());

        let api_request = OllamaChatRequest {
            model: model.to_string(),
            messages: request.messages,
            stream: false,
            options: request
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        };

        tracing::debug!(model, messages = api_request.messages.len(), "chat completion");

        let response = self
            .client
            .post(self.chat_url())
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(api_response.message.content)
    }
}

// ============================================================================
// Ollama API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaReplyMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaReplyMessage {
    content: String,
}
