use std::fmt;

use async_trait::async_trait;

use super::types::{AskReply, AskRequest, HealthStatus, ModelDescriptor, SwitchReply};

/// Errors that can occur while talking to the model server.
/// None of them are retried; the page turns each into a visible message.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client misconfigured (bad base URL, TLS setup).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused, broken body).
    Network(String),
    /// Non-2xx status without a body we could understand.
    Api { status: u16, message: String },
    /// Body was not the JSON we expected.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The model server as seen by the page controllers.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /models`
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError>;

    /// `POST /switch_model`
    async fn switch_model(&self, model_name: &str) -> Result<SwitchReply, ApiError>;

    /// `POST /ask`
    async fn ask(&self, request: &AskRequest) -> Result<AskReply, ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
