//! Model directory: fills the switcher's list container from `GET /models`.
//!
//! The container is cleared and rebuilt on every call. Row actions are read
//! back from each row's `data-model` attribute, so a rebuild leaves nothing
//! stale behind.

use log::{debug, error};

use crate::api::{ApiError, ChatBackend, ModelDescriptor};
use crate::page::context::UiContext;
use crate::render::Element;

pub const LOADING_TEXT: &str = "Loading available models...";
pub const EMPTY_TEXT: &str = "No models available";
pub const FAILURE_TEXT: &str = "Failed to fetch the model list";
pub const ACTIVE_LABEL: &str = "active";
pub const SELECT_LABEL: &str = "select";

pub fn show_loading(ctx: &mut UiContext) {
    let list = ctx.switcher.list_mut();
    list.clear();
    list.append(Element::new("p").text(LOADING_TEXT));
}

pub fn apply_models(ctx: &mut UiContext, result: Result<Vec<ModelDescriptor>, ApiError>) {
    match result {
        Ok(models) if models.is_empty() => {
            debug!("Model directory is empty");
            let list = ctx.switcher.list_mut();
            list.clear();
            list.append(Element::new("p").text(EMPTY_TEXT));
        }
        Ok(models) => {
            debug!("Rendering {} model rows", models.len());
            let list = ctx.switcher.list_mut();
            list.clear();
            for model in &models {
                list.append(model_row(model));
            }
            let current = models.iter().find(|m| m.is_current).map(|m| m.name.clone());
            ctx.switcher.set_current_model(current);
        }
        Err(e) => {
            error!("Failed to fetch models: {e}");
            let list = ctx.switcher.list_mut();
            list.clear();
            list.append(Element::new("p").class("error").text(FAILURE_TEXT));
        }
    }
}

pub async fn fetch_models(ctx: &mut UiContext, backend: &dyn ChatBackend) {
    show_loading(ctx);
    let result = backend.list_models().await;
    apply_models(ctx, result);
}

fn model_row(model: &ModelDescriptor) -> Element {
    let info = model.info_or_default();

    let mut row = Element::new("div").class("model-item");
    let mut button = Element::new("button")
        .class("btn")
        .attr("data-model", model.name.as_str());
    if model.is_current {
        row = row.class("active");
        button = button.class("btn-primary").text(ACTIVE_LABEL);
    } else {
        button = button.text(SELECT_LABEL);
    }

    row.child(
        Element::new("div")
            .child(Element::new("div").class("model-name").text(model.name.as_str()))
            .child(
                Element::new("div")
                    .class("model-details")
                    .text(format!("{} - {}", info.size, info.description)),
            ),
    )
    .child(Element::new("div").class("model-actions").child(button))
}
