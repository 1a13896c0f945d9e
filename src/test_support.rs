//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, AskReply, AskRequest, ChatBackend, HealthStatus, ModelDescriptor, SwitchReply,
};
use crate::core::config::ResolvedConfig;
use crate::page::context::UiContext;
use crate::page::form::PromptForm;

/// A backend that replays scripted results and records what it was asked.
/// Unscripted calls fail with a network error.
#[derive(Default)]
pub struct FakeBackend {
    models: Option<Result<Vec<ModelDescriptor>, ApiError>>,
    switch: Option<Result<SwitchReply, ApiError>>,
    ask: Option<Result<AskReply, ApiError>>,
    health: Option<Result<HealthStatus, ApiError>>,
    model_listings: Mutex<usize>,
    switch_requests: Mutex<Vec<String>>,
    ask_requests: Mutex<Vec<AskRequest>>,
}

impl FakeBackend {
    pub fn with_models(mut self, result: Result<Vec<ModelDescriptor>, ApiError>) -> Self {
        self.models = Some(result);
        self
    }

    pub fn with_switch(mut self, result: Result<SwitchReply, ApiError>) -> Self {
        self.switch = Some(result);
        self
    }

    pub fn with_ask(mut self, result: Result<AskReply, ApiError>) -> Self {
        self.ask = Some(result);
        self
    }

    pub fn with_health(mut self, result: Result<HealthStatus, ApiError>) -> Self {
        self.health = Some(result);
        self
    }

    pub fn model_listings(&self) -> usize {
        *self.model_listings.lock().unwrap()
    }

    pub fn switch_requests(&self) -> Vec<String> {
        self.switch_requests.lock().unwrap().clone()
    }

    pub fn ask_requests(&self) -> Vec<AskRequest> {
        self.ask_requests.lock().unwrap().clone()
    }
}

fn scripted<T: Clone>(slot: &Option<Result<T, ApiError>>) -> Result<T, ApiError> {
    slot.clone()
        .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        *self.model_listings.lock().unwrap() += 1;
        scripted(&self.models)
    }

    async fn switch_model(&self, model_name: &str) -> Result<SwitchReply, ApiError> {
        self.switch_requests
            .lock()
            .unwrap()
            .push(model_name.to_string());
        scripted(&self.switch)
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskReply, ApiError> {
        self.ask_requests.lock().unwrap().push(request.clone());
        scripted(&self.ask)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        scripted(&self.health)
    }
}

pub fn model(name: &str, current: bool) -> ModelDescriptor {
    ModelDescriptor {
        name: name.to_string(),
        is_current: current,
        info: None,
    }
}

/// The prompt form with stock defaults (temperature 0.7, 1000 tokens).
pub fn test_form() -> PromptForm {
    PromptForm::from_config(&ResolvedConfig::default())
}

pub fn test_context() -> UiContext {
    UiContext::new(test_form())
}
