//! # InputBox Component
//!
//! The prompt input. Owns the editing buffer and cursor; the page's form
//! field is kept in sync by the event loop on every change.
//!
//! Enter emits [`InputEvent::Submit`] even for blank text: whether a blank
//! prompt does anything is the page's call, not the widget's.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET_X: u16 = 2;
const CONTENT_OFFSET_Y: u16 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit,
    ContentChanged,
}

pub struct InputBox {
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// Line offset for internal scrolling (0 when content fits)
    scroll_offset: u16,
    /// Dimmed while a prompt is in flight (prop)
    pub waiting: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            waiting: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer, e.g. after the page cleared the form. No-op if unchanged.
    pub fn set_text(&mut self, text: &str) {
        if self.buffer != text {
            self.buffer = text.to_string();
            self.cursor = self.buffer.len();
            self.scroll_offset = 0;
        }
    }

    /// Required height for current content, clamped to the visible maximum.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = wrap_line_count(&self.buffer, inner_width(area_width));
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Wrapped line (0-based) the cursor is on, and its display column.
    fn cursor_line_col(&self, width: u16) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let before = &self.buffer[..self.cursor];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let lines_above = if line_start == 0 {
            0
        } else {
            wrap_line_count(&before[..line_start - 1], width)
        };

        let logical = &before[line_start..];
        let wrapped = textwrap::wrap(logical, wrap_options(width));
        let segment_line = wrapped.len().saturating_sub(1) as u16;
        // textwrap trims trailing whitespace, so measure from the segment start
        let consumed: usize = wrapped
            .iter()
            .take(wrapped.len().saturating_sub(1))
            .map(|seg| seg.len())
            .sum();
        let tail = logical.get(consumed..).unwrap_or("").trim_start();
        let col = (tail.width() as u16).min(width);

        (lines_above + segment_line, col)
    }

    fn update_scroll_offset(&mut self, width: u16) {
        let total = wrap_line_count(&self.buffer, width);
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (line, _) = self.cursor_line_col(width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line.saturating_sub(MAX_VISIBLE_LINES - 1);
        }
    }

    fn visible_text(&self, width: u16) -> String {
        if self.scroll_offset == 0 || width == 0 {
            return self.buffer.clone();
        }
        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.scroll_offset as usize).min(lines.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.update_scroll_offset(width);

        let (title, border_style) = if self.waiting {
            (
                "Prompt (waiting for reply)",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            ("Prompt", Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(" Enter Send  Ctrl+J Newline  Ctrl+M Models ")
            .padding(Padding::horizontal(1));

        let mut text_style = Style::default().fg(Color::Green);
        if self.waiting {
            text_style = text_style.add_modifier(Modifier::DIM);
        }
        let input = Paragraph::new(self.visible_text(width))
            .block(block)
            .style(text_style);
        frame.render_widget(input, area);

        let (line, col) = self.cursor_line_col(width);
        let row = line.saturating_sub(self.scroll_offset);
        frame.set_cursor_position((
            area.x + CONTENT_OFFSET_X + col,
            area.y + CONTENT_OFFSET_Y + row,
        ));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped line count, counting a trailing newline as its own line.
fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map_or(text.len(), |(i, _)| pos + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    #[test]
    fn test_handle_input() {
        let mut input = typed("ab");
        assert_eq!(input.text(), "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = typed("héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.text(), "hllo");
    }

    #[test]
    fn test_submit_leaves_buffer_to_the_page() {
        let mut input = typed("hello");
        assert_eq!(input.handle_event(&TuiEvent::Submit), Some(InputEvent::Submit));
        assert_eq!(input.text(), "hello");

        input.set_text("");
        assert!(input.text().is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_height_grows_then_caps() {
        let input = typed("a\nb\nc");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
        let tall = typed("1\n2\n3\n4\n5\n6\n7");
        assert_eq!(tall.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_cursor_after_trailing_newline() {
        let input = typed("abc\n");
        assert_eq!(input.cursor_line_col(20), (1, 0));
    }

    #[test]
    fn test_render_shows_title_and_text() {
        let mut terminal = Terminal::new(TestBackend::new(50, 3)).unwrap();
        let mut input = typed("what is rust?");

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Prompt"));
        assert!(text.contains("what is rust?"));
    }
}
