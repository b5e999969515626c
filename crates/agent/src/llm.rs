use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the provider to emit a single JSON object.
    JsonObject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    pub response_format: ResponseFormat,
}

impl CompletionOptions {
    pub fn json_object() -> Self {
        Self { response_format: ResponseFormat::JsonObject }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("client configuration invalid: {0}")]
    Configuration(String),
    #[error("completion transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion request rejected with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("completion response could not be decoded: {0}")]
    Decode(String),
    #[error("completion response carried no choices")]
    EmptyChoices,
}

/// Chat-completion capability. One call, one response; retries and rate
/// limiting belong to implementations, not callers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, LlmError>;
}
