//! Text-generation client.
//!
//! [`LanguageModel`] is the single seam between the quiz and a model: a
//! prompt goes in, the raw completion text comes out. [`OllamaLlm`] calls
//! `POST /api/generate` with streaming disabled.
//!
//! Calls are made once and awaited to completion. Without
//! `ollama.timeout_secs` a hung model blocks the caller indefinitely.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::config::OllamaConfig;

/// A prompt-in, text-out language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the model identifier (e.g. `"llama2"`).
    fn model_name(&self) -> &str;

    /// Run one completion and return the raw response text.
    async fn invoke(&self, prompt: &str) -> Result<String>;
}

/// Build the HTTP client shared by the Ollama clients.
///
/// A timeout is only installed when `timeout_secs` is configured.
pub(crate) fn build_http_client(config: &OllamaConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to build HTTP client")
}

/// Language model backed by an Ollama instance.
pub struct OllamaLlm {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaLlm {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaLlm {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "generate request");

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing response text"))?;

        tracing::debug!(response_chars = text.chars().count(), "generate response");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn llm_for(server: &MockServer) -> OllamaLlm {
        OllamaLlm::new(&OllamaConfig {
            url: format!("{}/", server.uri()),
            ..OllamaConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_invoke_returns_response_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama2",
                "prompt": "Say hi",
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama2",
                "response": "  hi there \n",
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = llm_for(&server);
        assert_eq!(llm.model_name(), "llama2");
        // Raw text comes back untrimmed; callers decide how to normalize
        assert_eq!(llm.invoke("Say hi").await.unwrap(), "  hi there \n");
    }

    #[tokio::test]
    async fn test_client_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model 'llama2' not found"))
            .expect(1)
            .mount(&server)
            .await;

        let err = llm_for(&server).invoke("anything").await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_missing_response_field_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"done": true})),
            )
            .mount(&server)
            .await;

        let err = llm_for(&server).invoke("anything").await.unwrap_err();
        assert!(err.to_string().contains("missing response"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let llm = OllamaLlm::new(&OllamaConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: Some(5),
            ..OllamaConfig::default()
        })
        .unwrap();
        let err = llm.invoke("anything").await.unwrap_err();
        assert!(err.to_string().contains("is Ollama running"));
    }
}
