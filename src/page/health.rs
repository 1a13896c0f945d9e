//! Startup health check against `GET /health`.

use log::{info, warn};

use crate::api::{ApiError, ChatBackend, HealthStatus};
use crate::page::context::{ServerStatus, UiContext};

pub fn apply_health(ctx: &mut UiContext, result: Result<HealthStatus, ApiError>) {
    match result {
        Ok(status) => {
            if status.is_healthy() {
                info!("Server healthy: {}", status.summary());
            } else {
                warn!("Server degraded: {}", status.summary());
            }
            if let Some(name) = status.model_name.clone() {
                ctx.switcher.set_current_model(Some(name));
            }
            ctx.server = ServerStatus::Checked(status);
        }
        Err(e) => {
            warn!("Health check failed: {e}");
            ctx.server = ServerStatus::Unreachable;
        }
    }
}

pub async fn check_health(ctx: &mut UiContext, backend: &dyn ChatBackend) {
    let result = backend.health().await;
    apply_health(ctx, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, test_context};

    fn status(ollama: &str, model: Option<&str>, model_name: Option<&str>) -> HealthStatus {
        HealthStatus {
            server: "ok".into(),
            ollama: ollama.into(),
            model: model.map(Into::into),
            model_name: model_name.map(Into::into),
        }
    }

    #[tokio::test]
    async fn healthy_server_records_current_model() {
        let mut ctx = test_context();
        let backend =
            FakeBackend::default().with_health(Ok(status("ok", Some("ok"), Some("llama3"))));
        check_health(&mut ctx, &backend).await;

        assert!(matches!(ctx.server, ServerStatus::Checked(ref s) if s.is_healthy()));
        assert_eq!(ctx.switcher.current_model(), Some("llama3"));
    }

    #[test]
    fn degraded_server_is_still_checked() {
        let mut ctx = test_context();
        apply_health(&mut ctx, Ok(status("unreachable", None, None)));
        assert_eq!(ctx.server, ServerStatus::Checked(status("unreachable", None, None)));
        assert_eq!(ctx.switcher.current_model(), None);
    }

    #[test]
    fn transport_failure_marks_unreachable() {
        let mut ctx = test_context();
        apply_health(&mut ctx, Err(ApiError::Network("connection refused".into())));
        assert_eq!(ctx.server, ServerStatus::Unreachable);
    }
}
