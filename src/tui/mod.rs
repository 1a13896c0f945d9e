//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, paints the page and
//! translates key presses into page operations.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each turn: draw if needed, wait for a key, dispatch every pending key,
//! then drain backend results from the channel through
//! [`update`](crate::core::action::update). Keys are routed by priority:
//!
//! 1. Ctrl+C always quits
//! 2. an open alert swallows everything until dismissed
//! 3. an open model switcher gets navigation keys
//! 4. global shortcuts (switcher, sliders, scrolling)
//! 5. the prompt input
//!
//! ## Redraw Strategy
//!
//! While a prompt is in flight the loop redraws every ~80ms so the loading
//! spinner moves. Otherwise it sleeps up to 500ms and only redraws on
//! events or results.

mod component;
mod components;
mod event;
pub mod markup;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ChatBackend, HttpBackend};
use crate::core::action::{Effect, update};
use crate::core::config::ResolvedConfig;
use crate::page::Page;
use crate::page::form::PromptForm;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    InputBox, InputEvent, ModelSwitcherState, SwitcherEvent, TranscriptViewState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the page)
pub struct TuiState {
    pub transcript: TranscriptViewState,
    pub input_box: InputBox,
    pub switcher: ModelSwitcherState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            transcript: TranscriptViewState::new(),
            input_box: InputBox::new(),
            switcher: ModelSwitcherState::new(),
        }
    }

    /// Fresh widget state to go with a reloaded page.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement lets Ctrl+M arrive as itself rather than Enter.
        // Terminals without the protocol ignore it; F2 covers them.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(
        HttpBackend::new(
            config.server_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .map_err(std::io::Error::other)?,
    );
    info!("Using model server at {}", config.server_url);

    let mut page = Page::new(PromptForm::from_config(&config));
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for results from background tasks
    let (tx, rx) = mpsc::channel();
    page.check_health(backend.clone(), tx.clone());

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = page.submission.is_submitting();
        if animating {
            needs_redraw = true;
        }

        if page.ctx.transcript.take_scroll_request() {
            tui.transcript.request_scroll_to_bottom();
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &page, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                break;
            }

            // Alerts are modal
            if page.ctx.window.current_alert().is_some() {
                if matches!(event, TuiEvent::Submit | TuiEvent::Escape) {
                    page.ctx.window.dismiss_alert();
                }
                continue;
            }

            if page.ctx.switcher.is_open() {
                let row_count = page.ctx.switcher.rows().len();
                match tui.switcher.handle_event(&event, row_count) {
                    Some(SwitcherEvent::Select(row)) => {
                        page.select_model(row, backend.clone(), tx.clone());
                    }
                    Some(SwitcherEvent::Dismiss) => page.ctx.switcher.close(),
                    None => {}
                }
                continue;
            }

            match event {
                TuiEvent::OpenModelSwitcher => {
                    tui.switcher.reset();
                    page.open_switcher(backend.clone(), tx.clone());
                }
                TuiEvent::TemperatureUp => page.ctx.form.temperature.step_up(),
                TuiEvent::TemperatureDown => page.ctx.form.temperature.step_down(),
                TuiEvent::MaxTokensUp => page.ctx.form.max_tokens.step_up(),
                TuiEvent::MaxTokensDown => page.ctx.form.max_tokens.step_down(),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom
                | TuiEvent::CursorUp
                | TuiEvent::CursorDown => {
                    tui.transcript.handle_event(&event);
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::ContentChanged) => {
                        page.ctx.form.prompt = tui.input_box.text().to_string();
                    }
                    Some(InputEvent::Submit) => {
                        page.ctx.form.prompt = tui.input_box.text().to_string();
                        if page.submit(backend.clone(), tx.clone()) {
                            // Accepted prompts clear the form field
                            tui.input_box.set_text(&page.ctx.form.prompt);
                        }
                    }
                    None => {}
                },
            }
        }

        if should_quit {
            break;
        }

        // Backend results. After a reload the rest of the queue belongs to
        // the old page and is dropped by `update`.
        while let Ok(envelope) = rx.try_recv() {
            needs_redraw = true;
            if update(&mut page, envelope) == Effect::Reload {
                debug!("Reloading page");
                page.reload();
                tui.reset();
                page.check_health(backend.clone(), tx.clone());
            }
        }
    }

    page.shutdown();
    ratatui::restore();
    Ok(())
}
