//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! Both supported providers speak the same wire contract:
//! `POST {base_url}/v1/chat/completions`, bearer auth when an API key is
//! configured, optional `response_format: {"type": "json_object"}`. The
//! request timeout from `llm.timeout_secs` bounds every call; the client
//! performs no retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use atelier_core::config::{LlmConfig, LlmProvider};

use crate::llm::{ChatMessage, CompletionOptions, LlmClient, LlmError, ResponseFormat};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiClient {
    client: reqwest::Client,
    url_chat: String,
    model: String,
}

impl OpenAiClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(match config.provider {
                LlmProvider::OpenAi => OPENAI_DEFAULT_BASE_URL,
                LlmProvider::Ollama => "http://localhost:11434",
            })
            .trim_end_matches('/')
            .to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let value = header::HeaderValue::from_str(&format!(
                "Bearer {}",
                api_key.expose_secret()
            ))
            .map_err(|error| {
                LlmError::Configuration(format!("api key is not a valid header value: {error}"))
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url_chat: format!("{base_url}/v1/chat/completions"),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::new(&self.model, messages, options);

        debug!(
            model = %self.model,
            message_count = messages.len(),
            json_mode = matches!(options.response_format, ResponseFormat::JsonObject),
            "POST {}", self.url_chat
        );

        let response = self.client.post(&self.url_chat).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = snippet(&response.text().await.unwrap_or_default());
            error!(
                status,
                model = %self.model,
                latency_ms = started.elapsed().as_millis() as u64,
                detail = %detail,
                "chat completion returned non-success status"
            );
            return Err(LlmError::Status { status, detail });
        }

        let decoded: ChatCompletionResponse = response.json().await.map_err(|error| {
            LlmError::Decode(format!(
                "serde error: {error}; expected `choices[0].message.content`"
            ))
        })?;

        let content = decoded
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyChoices)?;

        debug!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "chat completion completed"
        );

        Ok(content)
    }
}

fn snippet(text: &str) -> String {
    const MAX: usize = 240;
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let cut = trimmed
            .char_indices()
            .take_while(|(index, _)| *index < MAX)
            .last()
            .map(|(index, ch)| index + ch.len_utf8())
            .unwrap_or(0);
        format!("{}…", &trimmed[..cut])
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, messages: &'a [ChatMessage], options: CompletionOptions) -> Self {
        Self {
            model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            response_format: match options.response_format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => {
                    Some(WireResponseFormat { kind: "json_object" })
                }
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessageOut,
}

#[derive(Debug, Deserialize)]
struct WireMessageOut {
    content: Option<String>,
}
