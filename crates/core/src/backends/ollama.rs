use crate::embeddings::Embedder;
use crate::error::{EmbeddingError, GenerationError};
use crate::generation::{ChatModel, ChatPrompt};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_OLLAMA_CHAT_MODEL: &str = "llama3.2:3b";

const DEFAULT_OLLAMA_DIMENSIONS: usize = 768;
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OllamaBackend {
    base_url: String,
    embed_model: String,
    chat_model: String,
    dimensions: usize,
    temperature: f32,
    timeout: Duration,
    client: Client,
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_BASE_URL)
    }
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            embed_model: DEFAULT_OLLAMA_EMBED_MODEL.to_string(),
            chat_model: DEFAULT_OLLAMA_CHAT_MODEL.to_string(),
            dimensions: DEFAULT_OLLAMA_DIMENSIONS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
        }
    }

    pub fn with_embed_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.embed_model = model.into();
        self.dimensions = dimensions;
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Embedder for OllamaBackend {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .timeout(self.timeout)
            .json(&EmbedRequest {
                model: &self.embed_model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Backend {
                backend: "ollama".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: EmbedResponse = response.json().await?;
        if parsed.embedding.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: parsed.embedding.len(),
            });
        }

        Ok(parsed.embedding)
    }
}

#[async_trait]
impl ChatModel for OllamaBackend {
    fn model_name(&self) -> &str {
        &self.chat_model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.chat_model,
            prompt: prompt.flattened(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend {
                backend: "ollama".to_string(),
                details: format!("{status}: {body}"),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_text_never_reaches_the_server() {
        let backend = OllamaBackend::new("http://localhost:1");
        assert!(matches!(
            backend.embed("  \n ").await,
            Err(EmbeddingError::EmptyInput)
        ));
    }

    #[test]
    fn embed_model_override_updates_dimensions() {
        let backend = OllamaBackend::default().with_embed_model("all-minilm", 384);
        assert_eq!(backend.dimensions(), 384);
        assert_eq!(backend.embed_model, "all-minilm");
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let backend = OllamaBackend::new("http://localhost:11434/");
        assert_eq!(backend.base_url, "http://localhost:11434");
    }
}
