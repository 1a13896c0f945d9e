//! reqwest-backed [`ChatBackend`] for the model server's web endpoints.
//!
//! `/ask` and `/switch_model` take form bodies, like the HTML form they were
//! built for. Their failure responses still carry JSON (`{"error": ...}`),
//! so bodies are parsed regardless of status.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::backend::{ApiError, ChatBackend};
use super::types::{
    AskBody, AskReply, AskRequest, HealthStatus, ModelDescriptor, ModelsResponse, SwitchReply,
};

/// Header the server checks to answer `/switch_model` with JSON instead of a redirect.
const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Model server client for {base_url} (timeout {timeout:?})");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Reads the body and parses it as `T`, whatever the status.
///
/// An unparseable body on a non-2xx status is reported as `ApiError::Api`
/// so the status is not lost.
async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<(StatusCode, T), ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    debug!("{endpoint} -> {status} ({} bytes)", body.len());

    match serde_json::from_str::<T>(&body) {
        Ok(parsed) => Ok((status, parsed)),
        Err(e) if !status.is_success() => {
            warn!("{endpoint} returned {status} with unreadable body: {e}");
            Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
        Err(e) => Err(ApiError::Parse(e.to_string())),
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        let response = self
            .client
            .get(self.url("/models"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("/models error: {status} - {message}");
            return Err(ApiError::Api { status, message });
        }

        let (_, body) = read_json::<ModelsResponse>("/models", response).await?;
        debug!("/models listed {} models", body.models.len());
        Ok(body.models)
    }

    async fn switch_model(&self, model_name: &str) -> Result<SwitchReply, ApiError> {
        info!("Requesting switch to model {model_name}");
        let response = self
            .client
            .post(self.url("/switch_model"))
            .header(AJAX_HEADER.0, AJAX_HEADER.1)
            .form(&[("model_name", model_name)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (_, reply) = read_json::<SwitchReply>("/switch_model", response).await?;
        Ok(reply)
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskReply, ApiError> {
        info!(
            "Ask request: prompt_len={}, temperature={}, max_tokens={}",
            request.prompt.len(),
            request.temperature,
            request.max_tokens
        );
        let response = self
            .client
            .post(self.url("/ask"))
            .form(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (status, body) = read_json::<AskBody>("/ask", response).await?;
        match body.into_reply() {
            Some(reply) => Ok(reply),
            None if !status.is_success() => Err(ApiError::Api {
                status: status.as_u16(),
                message: "response carried neither `response` nor `error`".to_string(),
            }),
            None => Err(ApiError::Parse(
                "response carried neither `response` nor `error`".to_string(),
            )),
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let (_, health) = read_json::<HealthStatus>("/health", response).await?;
        Ok(health)
    }
}
