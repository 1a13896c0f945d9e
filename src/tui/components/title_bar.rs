//! # TitleBar Component
//!
//! Top status bar: active model, server health, and a transient status
//! message (e.g. "Waiting for reply...").
//!
//! Stateless. All fields are props filled from the page each frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     page.ctx.switcher.current_model().map(str::to_string),
//!     &page.ctx.server,
//!     status_message,
//! );
//! title_bar.render(frame, title_area);
//! ```
//!
//! Layout: `Chatdeck (model: llama3) | ollama ok · model ok | Waiting for reply...`.
//! The status segment is dropped when empty.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::page::context::ServerStatus;
use crate::tui::component::Component;

const UNKNOWN_MODEL: &str = "unknown";

pub struct TitleBar {
    /// Active model, once the health check or model list has reported one
    pub model_name: Option<String>,
    pub server_summary: String,
    /// Empty when there is nothing to report
    pub status_message: String,
    pub server_ok: bool,
}

impl TitleBar {
    pub fn new(model_name: Option<String>, server: &ServerStatus, status_message: String) -> Self {
        Self {
            model_name,
            server_summary: server_summary(server),
            status_message,
            server_ok: matches!(server, ServerStatus::Checked(h) if h.is_healthy()),
        }
    }
}

/// Short text describing the last health check.
pub fn server_summary(server: &ServerStatus) -> String {
    match server {
        ServerStatus::Unknown => "checking server".to_string(),
        ServerStatus::Checked(health) => health.summary(),
        ServerStatus::Unreachable => "server unreachable".to_string(),
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let model = self.model_name.as_deref().unwrap_or(UNKNOWN_MODEL);
        let server_style = if self.server_ok {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let mut spans = vec![
            Span::raw(format!("Chatdeck (model: {model}) | ")),
            Span::styled(self.server_summary.clone(), server_style),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
