//! # UI Context
//!
//! Every handle the page controllers touch, built once per page lifetime and
//! passed explicitly to each controller.
//!
//! ```text
//! UiContext
//! ├── transcript: Transcript     // chat container
//! ├── form: PromptForm           // prompt input + sliders
//! ├── switcher: ModelSwitcher    // modal + model list container
//! ├── window: Window             // alert() / reload()
//! └── server: ServerStatus       // health summary for the title bar
//! ```

use std::collections::VecDeque;

use log::info;

use crate::api::HealthStatus;
use crate::page::form::PromptForm;
use crate::page::transcript::Transcript;
use crate::render::Element;

/// Window-level effects: blocking alerts and full page reloads.
#[derive(Debug, Default, Clone)]
pub struct Window {
    alerts: VecDeque<String>,
    reload_requested: bool,
}

impl Window {
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("Alert: {message}");
        self.alerts.push_back(message);
    }

    /// The alert currently shown, if any.
    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }
}

/// The model-switch modal and the list container inside it.
#[derive(Debug, Clone)]
pub struct ModelSwitcher {
    visible: bool,
    list: Element,
    current_model: Option<String>,
}

impl Default for ModelSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSwitcher {
    pub fn new() -> Self {
        Self {
            visible: false,
            list: Element::new("div").class("model-list"),
            current_model: None,
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn list(&self) -> &Element {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut Element {
        &mut self.list
    }

    pub fn current_model(&self) -> Option<&str> {
        self.current_model.as_deref()
    }

    pub fn set_current_model(&mut self, name: Option<String>) {
        self.current_model = name;
    }

    /// Model rows currently in the list, in display order.
    pub fn rows(&self) -> Vec<&Element> {
        self.list
            .child_elements()
            .filter(|el| el.has_class("model-item"))
            .collect()
    }

    /// The model a row's button would switch to, read from the live row.
    pub fn row_model(&self, index: usize) -> Option<&str> {
        let row = self.rows().into_iter().nth(index)?;
        row.find(&|el| el.tag() == "button")?
            .attribute("data-model")
    }
}

/// What the title bar knows about the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Checked(HealthStatus),
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct UiContext {
    pub transcript: Transcript,
    pub form: PromptForm,
    pub switcher: ModelSwitcher,
    pub window: Window,
    pub server: ServerStatus,
}

impl UiContext {
    pub fn new(form: PromptForm) -> Self {
        Self {
            transcript: Transcript::new(),
            form,
            switcher: ModelSwitcher::new(),
            window: Window::default(),
            server: ServerStatus::Unknown,
        }
    }
}
