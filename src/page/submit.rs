//! # Prompt Submission
//!
//! ```text
//! Idle ──begin()──▶ Submitting ──finish()──▶ Rendered | Errored ──▶ Idle
//!   ▲                    │
//!   └── empty prompt     └── second begin() is ignored
//! ```
//!
//! `begin` and `finish` are split so a front end can run the request on
//! another task. [`PromptSubmission::submit`] composes them for callers that
//! can simply await.

use log::{debug, error, info};

use crate::api::{ApiError, AskReply, AskRequest, ChatBackend};
use crate::page::context::UiContext;
use crate::page::transcript::EntryHandle;

pub const TRANSPORT_FAILURE_TEXT: &str = "An error occurred while communicating with the server";

/// Identifies one submission so late or foreign results can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rendered,
    Errored,
}

/// A request ready to go out, tagged with its ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAsk {
    pub ticket: Ticket,
    pub request: AskRequest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SubmitState {
    Idle,
    Submitting { ticket: Ticket, loading: EntryHandle },
}

#[derive(Debug)]
pub struct PromptSubmission {
    state: SubmitState,
    next_ticket: u64,
}

impl Default for PromptSubmission {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSubmission {
    pub fn new() -> Self {
        Self {
            state: SubmitState::Idle,
            next_ticket: 0,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    /// Handles a form submit. Returns `None` for an empty prompt or while a
    /// previous submission is still in flight; neither touches the page.
    pub fn begin(&mut self, ctx: &mut UiContext) -> Option<PendingAsk> {
        let prompt = ctx.form.prompt.trim().to_string();
        if prompt.is_empty() {
            return None;
        }
        if self.is_submitting() {
            debug!("Ignoring submit while a prompt is in flight");
            return None;
        }

        ctx.transcript.add_user_message(&prompt);
        ctx.form.prompt.clear();
        let loading = ctx.transcript.add_loading_message();

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.state = SubmitState::Submitting { ticket, loading };

        let request = AskRequest::new(prompt, ctx.form.parameters());
        info!(
            "Submitting prompt ({} chars, temperature={}, max_tokens={})",
            request.prompt.len(),
            request.temperature,
            request.max_tokens
        );
        Some(PendingAsk { ticket, request })
    }

    /// Applies the server's answer. The loading entry is removed before the
    /// result entry is added. Results for any other ticket are dropped.
    pub fn finish(
        &mut self,
        ctx: &mut UiContext,
        ticket: Ticket,
        result: Result<AskReply, ApiError>,
    ) -> Option<SubmitOutcome> {
        let SubmitState::Submitting {
            ticket: current,
            loading,
        } = self.state
        else {
            debug!("Dropping result for {ticket:?}: nothing in flight");
            return None;
        };
        if current != ticket {
            debug!("Dropping result for {ticket:?}: {current:?} is in flight");
            return None;
        }

        ctx.transcript.remove(loading);
        let outcome = match result {
            Ok(AskReply::Response(text)) => {
                ctx.transcript.add_model_message(&text);
                SubmitOutcome::Rendered
            }
            Ok(AskReply::Error(message)) => {
                ctx.transcript.add_error_message(&message);
                SubmitOutcome::Errored
            }
            Err(e) => {
                error!("Ask request failed: {e}");
                ctx.transcript.add_error_message(TRANSPORT_FAILURE_TEXT);
                SubmitOutcome::Errored
            }
        };
        ctx.transcript.scroll_to_bottom();

        self.state = SubmitState::Idle;
        Some(outcome)
    }

    /// Full submit: `begin`, await the backend, `finish`.
    pub async fn submit(
        &mut self,
        ctx: &mut UiContext,
        backend: &dyn ChatBackend,
    ) -> Option<SubmitOutcome> {
        let pending = self.begin(ctx)?;
        let result = backend.ask(&pending.request).await;
        self.finish(ctx, pending.ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::transcript::{ERROR_PREFIX, Role};
    use crate::test_support::{FakeBackend, test_context};

    fn roles(ctx: &UiContext) -> Vec<Role> {
        ctx.transcript.entries().iter().map(|e| e.role()).collect()
    }

    #[tokio::test]
    async fn whitespace_prompt_is_a_silent_no_op() {
        let mut ctx = test_context();
        ctx.form.prompt = "   \n\t ".to_string();
        let backend = FakeBackend::default();
        let mut submission = PromptSubmission::new();

        assert_eq!(submission.submit(&mut ctx, &backend).await, None);
        assert!(ctx.transcript.is_empty());
        assert!(ctx.transcript.welcome().is_some());
        assert!(backend.ask_requests().is_empty());
        assert!(!submission.is_submitting());
    }

    #[test]
    fn begin_appends_user_then_loading_and_clears_input() {
        let mut ctx = test_context();
        ctx.form.prompt = "  hello  ".to_string();
        let mut submission = PromptSubmission::new();

        let pending = submission.begin(&mut ctx).unwrap();

        assert_eq!(pending.request.prompt, "hello");
        assert!(ctx.form.prompt.is_empty());
        assert_eq!(roles(&ctx), vec![Role::User, Role::Loading]);
        assert_eq!(ctx.transcript.entries()[0].message().text, "hello");
        assert!(submission.is_submitting());
    }

    #[tokio::test]
    async fn response_replaces_loading_with_model_entry() {
        let mut ctx = test_context();
        ctx.form.prompt = "hello".to_string();
        let backend = FakeBackend::default().with_ask(Ok(AskReply::Response("hi there".into())));
        let mut submission = PromptSubmission::new();

        let outcome = submission.submit(&mut ctx, &backend).await;

        assert_eq!(outcome, Some(SubmitOutcome::Rendered));
        assert_eq!(roles(&ctx), vec![Role::User, Role::Model]);
        assert!(ctx.transcript.take_scroll_request());
        assert!(!submission.is_submitting());
    }

    #[tokio::test]
    async fn server_error_replaces_loading_with_error_entry() {
        let mut ctx = test_context();
        ctx.form.prompt = "hello".to_string();
        let backend =
            FakeBackend::default().with_ask(Ok(AskReply::Error("Ollama server is unavailable".into())));
        let mut submission = PromptSubmission::new();

        let outcome = submission.submit(&mut ctx, &backend).await;

        assert_eq!(outcome, Some(SubmitOutcome::Errored));
        assert_eq!(roles(&ctx), vec![Role::User, Role::Error]);
        assert_eq!(
            ctx.transcript.entries()[1].node().text_content(),
            format!("{ERROR_PREFIX}Ollama server is unavailable")
        );
    }

    #[tokio::test]
    async fn transport_failure_shows_generic_error() {
        let mut ctx = test_context();
        ctx.form.prompt = "hello".to_string();
        let backend = FakeBackend::default()
            .with_ask(Err(ApiError::Network("connection refused".into())));
        let mut submission = PromptSubmission::new();

        let outcome = submission.submit(&mut ctx, &backend).await;

        assert_eq!(outcome, Some(SubmitOutcome::Errored));
        assert_eq!(roles(&ctx), vec![Role::User, Role::Error]);
        assert_eq!(ctx.transcript.entries()[1].message().text, TRANSPORT_FAILURE_TEXT);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut ctx = test_context();
        let mut submission = PromptSubmission::new();

        ctx.form.prompt = "first".to_string();
        let first = submission.begin(&mut ctx).unwrap();
        ctx.form.prompt = "second".to_string();
        assert!(submission.begin(&mut ctx).is_none());
        assert_eq!(ctx.form.prompt, "second");
        assert_eq!(roles(&ctx), vec![Role::User, Role::Loading]);

        submission.finish(&mut ctx, first.ticket, Ok(AskReply::Response("ok".into())));
        let second = submission.begin(&mut ctx).unwrap();
        assert_ne!(first.ticket, second.ticket);
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut ctx = test_context();
        let mut submission = PromptSubmission::new();

        ctx.form.prompt = "first".to_string();
        let first = submission.begin(&mut ctx).unwrap();
        submission.finish(&mut ctx, first.ticket, Ok(AskReply::Response("a".into())));

        ctx.form.prompt = "second".to_string();
        submission.begin(&mut ctx).unwrap();
        let late = submission.finish(&mut ctx, first.ticket, Ok(AskReply::Response("b".into())));

        assert_eq!(late, None);
        assert_eq!(
            roles(&ctx),
            vec![Role::User, Role::Model, Role::User, Role::Loading]
        );
    }

    #[test]
    fn parameters_are_sent_with_the_prompt() {
        let mut ctx = test_context();
        ctx.form.prompt = "hello".to_string();
        ctx.form.temperature.set(0.3);
        ctx.form.max_tokens.set(500.0);
        let mut submission = PromptSubmission::new();

        let pending = submission.begin(&mut ctx).unwrap();
        assert_eq!(pending.request.temperature, 0.3);
        assert_eq!(pending.request.max_tokens, 500);
    }

    #[test]
    fn blocking_submit_through_tokio_test() {
        let mut ctx = test_context();
        ctx.form.prompt = "ping".to_string();
        let backend = FakeBackend::default().with_ask(Ok(AskReply::Response("pong".into())));
        let mut submission = PromptSubmission::new();

        let outcome = tokio_test::block_on(submission.submit(&mut ctx, &backend));

        assert_eq!(outcome, Some(SubmitOutcome::Rendered));
        assert_eq!(backend.ask_requests()[0].prompt, "ping");
    }
}
