use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::ChatMessage;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

/// Fixed sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl GenerationParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 0.95,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY environment variable not set")]
    MissingApiKey,
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM API request failed: {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid response format from LLM")]
    MalformedResponse,
}

#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a full conversation and return the text of the first choice.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError>;

    /// Single-turn request: `instruction` followed by a blank line and `body`.
    async fn prompt(
        &self,
        instruction: &str,
        body: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let message = ChatMessage::user(format!("{}\n\n{}", instruction, body));
        self.complete(std::slice::from_ref(&message), params).await
    }
}

/// Client for Groq's OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct GroqGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GroqGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmGateway for GroqGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let payload = json!({
            "model": params.model,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "top_p": params.top_p,
            "stream": false
        });

        debug!(
            model = %params.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|_| LlmError::MalformedResponse)?;
        let content = first_choice_text(&response_json)?;

        info!(
            model = %params.model,
            characters = content.len(),
            "LLM completion received"
        );
        Ok(content)
    }
}

fn first_choice_text(response: &Value) -> Result<String, LlmError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(LlmError::MalformedResponse)
}
