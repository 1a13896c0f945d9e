//! # TranscriptView Component
//!
//! Scrollable view of the chat transcript. Each entry's node tree is painted
//! through [`markup`](crate::tui::markup) inside a role-styled border.
//!
//! `TranscriptView` is a transient component (created each frame) wrapping
//! `&'a mut TranscriptViewState` (persistent scroll state) and the
//! transcript (props). The view never scrolls on its own: it only jumps to
//! the bottom when the page asked for it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::page::transcript::{Entry, Role, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markup;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Scroll state for the transcript. Lives in `TuiState`.
#[derive(Default)]
pub struct TranscriptViewState {
    pub scroll_state: ScrollViewState,
    /// Set by the page's scroll-to-bottom request, applied on the next render.
    pending_scroll_to_bottom: bool,
    content_height: u16,
    viewport_height: u16,
}

impl TranscriptViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for TranscriptViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollToBottom => self.request_scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// One painted transcript entry.
struct EntryCard<'a> {
    title: String,
    style: Style,
    border_style: Style,
    body: Paragraph<'a>,
    height: u16,
}

impl EntryCard<'_> {
    fn new(entry: &Entry, width: u16, spinner_frame: usize) -> Self {
        let (title, style) = match entry.role() {
            Role::User => ("you".to_string(), Style::default().fg(Color::Green)),
            Role::Model => ("model".to_string(), Style::default().fg(Color::Blue)),
            Role::Error => ("error".to_string(), Style::default().fg(Color::Red)),
            Role::Loading => (
                format!("model {}", SPINNER[spinner_frame % SPINNER.len()]),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        let border_style = match entry.role() {
            Role::Loading => style,
            _ => style.add_modifier(Modifier::DIM),
        };

        let text = markup::render_element(entry.node(), style);
        let body = Paragraph::new(text).wrap(Wrap { trim: false });
        let height = body_height(&body, width);

        Self {
            title,
            style,
            border_style,
            body,
            height,
        }
    }
}

impl Widget for EntryCard<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = Block::bordered()
            .title(self.title)
            .border_type(BorderType::Rounded)
            .border_style(self.border_style)
            .title_style(self.border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);
        self.body.style(self.style).render(inner, buf);
    }
}

/// Height of a bordered card whose body is `body`, at the given outer width.
fn body_height(body: &Paragraph<'_>, width: u16) -> u16 {
    let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
    if content_width == 0 {
        // Degenerate case: terminal too narrow for borders + padding.
        return 1;
    }
    (body.line_count(content_width) as u16).max(1) + VERTICAL_OVERHEAD
}

/// Combined height of cards stacked top to bottom, pinned at `u16::MAX`.
fn stack_height(heights: impl Iterator<Item = u16>) -> u16 {
    heights.fold(0, u16::saturating_add)
}

/// Scrollable transcript component.
pub struct TranscriptView<'a> {
    pub state: &'a mut TranscriptViewState,
    pub transcript: &'a Transcript,
    pub spinner_frame: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(
        state: &'a mut TranscriptViewState,
        transcript: &'a Transcript,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            spinner_frame,
        }
    }

    fn render_welcome(&self, frame: &mut Frame, area: Rect) {
        let Some(welcome) = self.transcript.welcome() else {
            return;
        };
        let text: Text<'static> = markup::render_element(welcome, Style::default().fg(Color::Gray));
        let height = (text.lines.len() as u16).min(area.height);
        let top = area.y + area.height.saturating_sub(height) / 2;
        let welcome_area = Rect::new(area.x, top, area.width, height);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            welcome_area,
        );
    }
}

impl Component for TranscriptView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.transcript.is_empty() {
            self.state.content_height = 0;
            self.state.viewport_height = area.height;
            self.render_welcome(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let cards: Vec<EntryCard> = self
            .transcript
            .entries()
            .iter()
            .map(|entry| EntryCard::new(entry, content_width, self.spinner_frame))
            .collect();
        let total_height = stack_height(cards.iter().map(|c| c.height));

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        if std::mem::take(&mut self.state.pending_scroll_to_bottom) {
            let max_y = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        } else {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for card in cards {
            let height = card.height;
            scroll_view.render_widget(card, Rect::new(0, y_offset, content_width, height));
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
