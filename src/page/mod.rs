//! # Page
//!
//! The chat page and its controllers. A [`Page`] is one lifetime of the UI
//! between reloads: it owns the [`UiContext`], the submission state machine
//! and a cancellation token shared by every request it started.
//!
//! ```text
//!  key press ──▶ Page::submit / open_switcher / select_model
//!                    │ (sync DOM work, then spawn)
//!                    ▼
//!              tokio task ── backend call ──▶ Envelope { generation, action }
//!                                                 │ mpsc
//!                                                 ▼
//!                                       core::action::update(page, ..)
//! ```
//!
//! Reload cancels the token and bumps the generation, so results from the
//! old page are either never sent or dropped on arrival.

pub mod context;
pub mod directory;
pub mod form;
pub mod health;
pub mod submit;
pub mod switch;
pub mod transcript;

use std::future::Future;
use std::sync::{Arc, mpsc};

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::api::ChatBackend;
use crate::core::action::{Action, Envelope};
use context::UiContext;
use form::PromptForm;
use submit::PromptSubmission;

pub struct Page {
    pub ctx: UiContext,
    pub submission: PromptSubmission,
    generation: u64,
    cancel: CancellationToken,
    defaults: PromptForm,
}

impl Page {
    /// A fresh page. `defaults` is also what every reload restores.
    pub fn new(defaults: PromptForm) -> Self {
        Self {
            ctx: UiContext::new(defaults.clone()),
            submission: PromptSubmission::new(),
            generation: 0,
            cancel: CancellationToken::new(),
            defaults,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Tears the page down and builds a new one. Requests still in flight
    /// are cancelled.
    pub fn reload(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
        self.ctx = UiContext::new(self.defaults.clone());
        self.submission = PromptSubmission::new();
        info!("Page reloaded (generation {})", self.generation);
    }

    /// Cancels everything this page started, without rebuilding it.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Runs `task` on the runtime and delivers its action tagged with this
    /// page's generation, unless the page is torn down first.
    pub fn spawn<F>(&self, tx: mpsc::Sender<Envelope>, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let token = self.cancel.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Task for generation {generation} cancelled");
                }
                action = task => {
                    if tx.send(Envelope { generation, action }).is_err() {
                        warn!("Failed to deliver action: receiver dropped");
                    }
                }
            }
        });
    }

    pub fn check_health(&self, backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Envelope>) {
        self.spawn(tx, async move { Action::HealthChecked(backend.health().await) });
    }

    /// Opens the switcher and refreshes its list.
    pub fn open_switcher(&mut self, backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Envelope>) {
        self.ctx.switcher.open();
        directory::show_loading(&mut self.ctx);
        self.spawn(tx, async move { Action::ModelsLoaded(backend.list_models().await) });
    }

    /// Switches to the model behind the given row, if the row has one.
    pub fn select_model(
        &self,
        row: usize,
        backend: Arc<dyn ChatBackend>,
        tx: mpsc::Sender<Envelope>,
    ) {
        let Some(model) = self.ctx.switcher.row_model(row).map(str::to_string) else {
            debug!("No model behind row {row}");
            return;
        };
        info!("Switching to model {model}");
        self.spawn(tx, async move {
            let result = backend.switch_model(&model).await;
            Action::SwitchFinished { model, result }
        });
    }

    /// Submits the prompt form. Returns false when nothing was sent.
    pub fn submit(&mut self, backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Envelope>) -> bool {
        let Some(pending) = self.submission.begin(&mut self.ctx) else {
            return false;
        };
        self.spawn(tx, async move {
            let result = backend.ask(&pending.request).await;
            Action::AskFinished {
                ticket: pending.ticket,
                result,
            }
        });
        true
    }
}
