//! Model switch: post the selection, then reload the whole page on success.
//!
//! A reload rebuilds transcript, directory and parameter defaults from
//! scratch instead of patching them. The in-progress transcript is lost.

use log::{error, info, warn};

use crate::api::{ApiError, ChatBackend, SwitchReply};
use crate::page::context::UiContext;

pub const FAILURE_PREFIX: &str = "Failed to switch model";
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Reloading,
    Alerted,
}

pub fn apply_switch(
    ctx: &mut UiContext,
    model_name: &str,
    result: Result<SwitchReply, ApiError>,
) -> SwitchOutcome {
    match result {
        Ok(reply) if reply.success => {
            info!("Switched to model {model_name}, reloading page");
            ctx.window.reload();
            SwitchOutcome::Reloading
        }
        Ok(reply) => {
            let reason = reply
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            warn!("Server refused switch to {model_name}: {reason}");
            ctx.window.alert(format!("{FAILURE_PREFIX}: {reason}"));
            SwitchOutcome::Alerted
        }
        Err(e) => {
            error!("Switch to {model_name} failed: {e}");
            ctx.window.alert(FAILURE_PREFIX);
            SwitchOutcome::Alerted
        }
    }
}

pub async fn switch_model(
    ctx: &mut UiContext,
    backend: &dyn ChatBackend,
    model_name: &str,
) -> SwitchOutcome {
    let result = backend.switch_model(model_name).await;
    apply_switch(ctx, model_name, result)
}
