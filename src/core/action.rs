//! # Actions
//!
//! Every backend result comes back to the event loop as an `Action`,
//! wrapped in an [`Envelope`] that records which page lifetime asked for it.
//!
//! ```text
//! Page + Envelope  →  update()  →  Effect
//! ```
//!
//! `update` only touches the page. Anything that needs the runtime (a
//! reload, which re-runs the health check) is returned as an [`Effect`].

use log::debug;

use crate::api::{ApiError, AskReply, HealthStatus, ModelDescriptor, SwitchReply};
use crate::page::submit::Ticket;
use crate::page::switch::SwitchOutcome;
use crate::page::{Page, directory, health, switch};

#[derive(Debug)]
pub enum Action {
    HealthChecked(Result<HealthStatus, ApiError>),
    ModelsLoaded(Result<Vec<ModelDescriptor>, ApiError>),
    SwitchFinished {
        model: String,
        result: Result<SwitchReply, ApiError>,
    },
    AskFinished {
        ticket: Ticket,
        result: Result<AskReply, ApiError>,
    },
}

#[derive(Debug)]
pub struct Envelope {
    pub generation: u64,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Reload,
}

pub fn update(page: &mut Page, envelope: Envelope) -> Effect {
    if envelope.generation != page.generation() {
        debug!(
            "Dropping {:?} from generation {} (now {})",
            envelope.action,
            envelope.generation,
            page.generation()
        );
        return Effect::None;
    }

    match envelope.action {
        Action::HealthChecked(result) => {
            health::apply_health(&mut page.ctx, result);
            Effect::None
        }
        Action::ModelsLoaded(result) => {
            directory::apply_models(&mut page.ctx, result);
            Effect::None
        }
        Action::SwitchFinished { model, result } => {
            match switch::apply_switch(&mut page.ctx, &model, result) {
                SwitchOutcome::Reloading => Effect::Reload,
                SwitchOutcome::Alerted => Effect::None,
            }
        }
        Action::AskFinished { ticket, result } => {
            page.submission.finish(&mut page.ctx, ticket, result);
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::transcript::Role;
    use crate::test_support::{model, test_form};

    #[test]
    fn stale_generation_is_dropped() {
        let mut page = Page::new(test_form());
        page.reload();
        let effect = update(
            &mut page,
            Envelope {
                generation: 0,
                action: Action::ModelsLoaded(Ok(vec![model("llama3", true)])),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(page.ctx.switcher.rows().is_empty());
    }

    #[test]
    fn ask_result_finishes_the_submission() {
        let mut page = Page::new(test_form());
        page.ctx.form.prompt = "hello".into();
        let pending = page.submission.begin(&mut page.ctx).unwrap();

        update(
            &mut page,
            Envelope {
                generation: 0,
                action: Action::AskFinished {
                    ticket: pending.ticket,
                    result: Err(ApiError::Network("refused".into())),
                },
            },
        );

        assert!(!page.submission.is_submitting());
        assert_eq!(page.ctx.transcript.entries()[1].role(), Role::Error);
    }

    #[test]
    fn refused_switch_has_no_effect() {
        let mut page = Page::new(test_form());
        let effect = update(
            &mut page,
            Envelope {
                generation: 0,
                action: Action::SwitchFinished {
                    model: "phi3".into(),
                    result: Ok(SwitchReply::default()),
                },
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(page.ctx.window.current_alert().is_some());
    }
}
