//! Wire types for the model server's web endpoints.
//!
//! Responses carry more fields than we read (the server forwards Ollama's
//! model metadata); serde ignores the rest.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a model has no `info` block.
pub const UNKNOWN_SIZE: &str = "?";
pub const UNKNOWN_DESCRIPTION: &str = "No information";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelInfo {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub description: String,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            size: UNKNOWN_SIZE.to_string(),
            description: UNKNOWN_DESCRIPTION.to_string(),
        }
    }
}

/// One selectable model as reported by `GET /models`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(rename = "current", default)]
    pub is_current: bool,
    #[serde(default)]
    pub info: Option<ModelInfo>,
}

impl ModelDescriptor {
    /// The model's info block, or the placeholder if the server sent none.
    pub fn info_or_default(&self) -> ModelInfo {
        self.info.clone().unwrap_or_default()
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

/// Temperature and token limit sent with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Form body of `POST /ask`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AskRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AskRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParameters) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

/// Raw `/ask` body. Exactly one field is expected to be set.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct AskBody {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the server said about a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum AskReply {
    /// Generated text.
    Response(String),
    /// Application-level failure reported in an otherwise good transport.
    Error(String),
}

impl AskBody {
    /// An empty `error` counts as absent, matching how the page treats falsy values.
    pub fn into_reply(self) -> Option<AskReply> {
        match (self.error, self.response) {
            (Some(err), _) if !err.is_empty() => Some(AskReply::Error(err)),
            (_, Some(text)) => Some(AskReply::Response(text)),
            _ => None,
        }
    }
}

/// `/switch_model` result. Error responses omit `success`, which reads as false.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SwitchReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /health`. Sent with 200 when Ollama is reachable, 503 otherwise.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub server: String,
    pub ollama: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.ollama == "ok" && self.model.as_deref().is_none_or(|m| m == "ok")
    }

    /// Short form for the title bar, e.g. `ollama ok · model unavailable`.
    pub fn summary(&self) -> String {
        match &self.model {
            Some(model) => format!("ollama {} · model {}", self.ollama, model),
            None => format!("ollama {}", self.ollama),
        }
    }
}
