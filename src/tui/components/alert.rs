//! Modal alert box for window alerts. Dismissed with Enter or Esc.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::model_switcher::centered_rect;

pub struct Alert<'a> {
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Component for Alert<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 30, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Alert ")
            .title_bottom(Line::from(" Enter OK ").centered())
            .padding(Padding::uniform(1));

        let body = Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, overlay);
    }
}
