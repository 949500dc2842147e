//! Chat-completion client for OpenAI-compatible endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{CompletionSettings, OPENAI_API_KEY_ENV};
use crate::contract::CompletionClient;
use crate::error::{RepoDocError, Result};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

// Every field is optional so that a partial body is reported as a
// transport error instead of a decode panic or an empty string.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_first_content(self) -> Result<String> {
        self.choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                RepoDocError::Transport("completion response contained no choices".to_string())
            })
    }
}

pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Fails with `Config` when no API key is configured.
    pub fn new(settings: &CompletionSettings) -> Result<Self> {
        let api_key = settings.api_key.clone().filter(|k| !k.is_empty());
        if api_key.is_none() {
            return Err(RepoDocError::Config(format!("{OPENAI_API_KEY_ENV} is not set")));
        }
        Ok(Self {
            http: Client::new(),
            endpoint: format!(
                "{}/v1/chat/completions",
                settings.api_base.trim_end_matches('/')
            ),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RepoDocError::Config(format!("{OPENAI_API_KEY_ENV} is not set")))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!(model = %self.model, prompt_chars = prompt.len(), "Requesting completion");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        // Every non-success status, 401 included, is a transport failure here.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(endpoint = %self.endpoint, status = %status, "Completion request failed");
            return Err(RepoDocError::Transport(format!(
                "completion endpoint returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RepoDocError::Transport(format!("malformed completion response: {e}")))?;
        let content = parsed.into_first_content()?;
        info!(chars = content.len(), "Completion received");
        Ok(content)
    }
}
