//! # Model Switcher Component
//!
//! Overlay for the model-switch modal. Opened with Ctrl+M (or F2).
//!
//! The rows are painted straight from the page's list container, so what
//! the overlay shows is exactly what the directory controller built:
//! model rows, or the loading / empty / error placeholder.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ModelSwitcherState` lives in `TuiState`
//! - `ModelSwitcherView` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::page::context::ModelSwitcher;
use crate::render::Element;
use crate::tui::event::TuiEvent;

/// Persistent state for the switcher overlay.
#[derive(Default)]
pub struct ModelSwitcherState {
    pub selected: usize,
    pub list_state: ListState,
}

impl ModelSwitcherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first row, e.g. when the modal is reopened.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Handle a key event against a list of `row_count` rows.
    pub fn handle_event(&mut self, event: &TuiEvent, row_count: usize) -> Option<SwitcherEvent> {
        match event {
            TuiEvent::Escape => Some(SwitcherEvent::Dismiss),
            TuiEvent::CursorUp if row_count > 0 => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown if row_count > 0 => {
                self.selected = (self.selected + 1).min(row_count - 1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::Submit if self.selected < row_count => {
                Some(SwitcherEvent::Select(self.selected))
            }
            _ => None,
        }
    }
}

/// Events emitted by the switcher overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitcherEvent {
    /// Switch to the model behind this row.
    Select(usize),
    Dismiss,
}

/// Transient render wrapper for the switcher overlay.
pub struct ModelSwitcherView<'a> {
    state: &'a mut ModelSwitcherState,
    switcher: &'a ModelSwitcher,
}

impl<'a> ModelSwitcherView<'a> {
    pub fn new(state: &'a mut ModelSwitcherState, switcher: &'a ModelSwitcher) -> Self {
        Self { state, switcher }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let title = match self.switcher.current_model() {
            Some(model) => format!(" Models (current: {model}) "),
            None => " Models ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" ↑/↓ Move  Enter Switch  Esc Close ").centered())
            .padding(Padding::horizontal(1));

        let rows = self.switcher.rows();
        if rows.is_empty() {
            // Loading, empty, or error placeholder
            let list = self.switcher.list();
            let style = if list.find(&|el| el.has_class("error")).is_some() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let placeholder = Paragraph::new(list.text_content())
                .style(style)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(placeholder, overlay);
            return;
        }

        let selected = self.state.selected.min(rows.len() - 1);
        self.state.list_state.select(Some(selected));

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| row_item(row, i == selected))
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

fn class_text(row: &Element, class: &str) -> String {
    row.find(&|el| el.has_class(class))
        .map(Element::text_content)
        .unwrap_or_default()
}

fn row_item(row: &Element, is_selected: bool) -> ListItem<'static> {
    let is_active = row.has_class("active");
    let name = class_text(row, "model-name");
    let details = class_text(row, "model-details");
    let action = row
        .find(&|el| el.tag() == "button")
        .map(Element::text_content)
        .unwrap_or_default();

    let style = if is_selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let dim = if is_selected {
        style
    } else {
        Style::default().fg(Color::DarkGray)
    };

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("[{action}] "), dim),
            Span::styled(name, style),
        ]),
        Line::from(Span::styled(format!("    {details}"), dim)),
    ])
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::directory;
    use crate::test_support::{model, test_context};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut state = ModelSwitcherState::new();
        state.handle_event(&TuiEvent::CursorUp, 2);
        assert_eq!(state.selected, 0);
        state.handle_event(&TuiEvent::CursorDown, 2);
        state.handle_event(&TuiEvent::CursorDown, 2);
        assert_eq!(state.selected, 1);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 2),
            Some(SwitcherEvent::Select(1))
        );
        assert_eq!(state.handle_event(&TuiEvent::Submit, 0), None);
        assert_eq!(
            state.handle_event(&TuiEvent::Escape, 0),
            Some(SwitcherEvent::Dismiss)
        );
    }

    #[test]
    fn renders_rows_from_the_list_container() {
        let mut ctx = test_context();
        directory::apply_models(&mut ctx, Ok(vec![model("llama3", true), model("phi3", false)]));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut state = ModelSwitcherState::new();

        terminal
            .draw(|f| ModelSwitcherView::new(&mut state, &ctx.switcher).render(f, f.area()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("[active] llama3"));
        assert!(text.contains("[select] phi3"));
        assert!(text.contains("? - No information"));
    }

    #[test]
    fn renders_placeholder_when_no_rows() {
        let mut ctx = test_context();
        directory::apply_models(&mut ctx, Ok(vec![]));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut state = ModelSwitcherState::new();

        terminal
            .draw(|f| ModelSwitcherView::new(&mut state, &ctx.switcher).render(f, f.area()))
            .unwrap();

        assert!(screen_text(&terminal).contains(directory::EMPTY_TEXT));
    }
}
