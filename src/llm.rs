//! Chat-model abstraction used by the assistant.

use async_trait::async_trait;
use std::fmt;

/// Speaker of a turn in the model's own role vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    User,
    Model,
}

impl ModelRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelRole::User => "user",
            ModelRole::Model => "model",
        }
    }
}

/// One turn of the conversation sent to a chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTurn {
    pub role: ModelRole,
    pub text: String,
}

impl ModelTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ModelRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ModelRole::Model,
            text: text.into(),
        }
    }
}

/// Failures of a single model call.
#[derive(Debug)]
pub enum ModelError {
    /// Transport failure before a response arrived.
    Http(String),
    /// Non-success status with the response body.
    Status { status: u16, body: String },
    /// Response body was not the expected JSON.
    Parse(String),
    /// No candidates or no text in the response.
    EmptyResponse,
    /// The request exceeded the configured timeout.
    Timeout,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Http(msg) => write!(f, "Model request failed: {}", msg),
            ModelError::Status { status, body } => {
                write!(f, "Model returned {}: {}", status, body)
            }
            ModelError::Parse(msg) => write!(f, "Failed to parse model response: {}", msg),
            ModelError::EmptyResponse => write!(f, "Model returned no text"),
            ModelError::Timeout => write!(f, "Model request timed out"),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout
        } else {
            // request URLs never reach logs
            ModelError::Http(err.without_url().to_string())
        }
    }
}

/// A conversational text model.
///
/// `turns` is the prior conversation in order; `message` is the new user turn
/// to answer. Implementations make exactly one outbound request per call.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, turns: &[ModelTurn], message: &str) -> Result<String, ModelError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}
