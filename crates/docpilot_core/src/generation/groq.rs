//! Groq chat-completions backend.
//!
//! # Responsibility
//! - Send one prompt to an OpenAI-compatible `/chat/completions` endpoint.
//! - Classify HTTP and transport failures into `GenerationError`.
//!
//! # Invariants
//! - Every request is bounded by `timeout_secs`.
//! - Prompts and responses are never logged, only their lengths.

use super::{GenerationError, TextGenerator};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the Groq backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GroqConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Config with default model, endpoint, temperature and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking HTTP client for Groq.
pub struct GroqClient {
    config: GroqConfig,
    http: Client,
}

impl GroqClient {
    /// Builds the HTTP client with the configured request timeout.
    pub fn new(config: GroqConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|err| self.classify_transport(err))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok());
            return Err(classify_status(status, retry_after_secs));
        }

        let text = response
            .text()
            .map_err(|err| self.classify_transport(err))?;
        parse_completion(&text)
    }

    fn classify_transport(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                after_secs: self.config.timeout_secs,
            }
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

impl TextGenerator for GroqClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let started_at = Instant::now();
        debug!(
            "event=generation_request module=generation status=start model={} prompt_chars={}",
            self.config.model,
            prompt.chars().count()
        );

        match self.send(prompt) {
            Ok(text) => {
                debug!(
                    "event=generation_request module=generation status=ok model={} duration_ms={} response_chars={}",
                    self.config.model,
                    started_at.elapsed().as_millis(),
                    text.chars().count()
                );
                Ok(text)
            }
            Err(err) => {
                warn!(
                    "event=generation_request module=generation status=error model={} duration_ms={} error_code={}",
                    self.config.model,
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                Err(err)
            }
        }
    }
}

fn classify_status(status: StatusCode, retry_after_secs: Option<u64>) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Authentication,
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited { retry_after_secs },
        other => GenerationError::Http {
            status: other.as_u16(),
        },
    }
}

/// Extracts the first choice's message content from a completion body.
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no choices in response".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(content)
}
