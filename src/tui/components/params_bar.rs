//! # ParamsBar Component
//!
//! One-line strip showing the two generation sliders with their live values.
//! Stateless: the sliders live in the page's form.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::widgets::LineGauge;

use crate::page::form::RangeInput;
use crate::tui::component::Component;

pub struct ParamsBar<'a> {
    pub temperature: &'a RangeInput,
    pub max_tokens: &'a RangeInput,
}

impl<'a> ParamsBar<'a> {
    pub fn new(temperature: &'a RangeInput, max_tokens: &'a RangeInput) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

fn gauge(label: String, input: &RangeInput, color: Color) -> LineGauge<'static> {
    LineGauge::default()
        .label(label)
        .ratio(input.ratio().clamp(0.0, 1.0))
        .filled_style(Style::default().fg(color))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .filled_symbol(symbols::line::THICK_HORIZONTAL)
        .unfilled_symbol(symbols::line::THICK_HORIZONTAL)
}

impl Component for ParamsBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [temperature_area, tokens_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(2)
                .areas(area);

        frame.render_widget(
            gauge(
                format!("Temperature {} (Ctrl+←/→)", self.temperature.value_text()),
                self.temperature,
                Color::Yellow,
            ),
            temperature_area,
        );
        frame.render_widget(
            gauge(
                format!("Max tokens {} (Ctrl+↑/↓)", self.max_tokens.value_text()),
                self.max_tokens,
                Color::Cyan,
            ),
            tokens_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResolvedConfig;
    use crate::page::form::PromptForm;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn shows_live_values() {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        let mut temperature = RangeInput::new(0.0, 1.0, 0.1, 0.7);
        let tokens = RangeInput::new(100.0, 4000.0, 100.0, 1000.0);
        temperature.step_up();

        terminal
            .draw(|f| ParamsBar::new(&temperature, &tokens).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Temperature 0.8"));
        assert!(text.contains("Max tokens 1000"));
        assert!(text.contains('━'));
    }

    #[test]
    fn configured_defaults_render_without_float_noise() {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        let form = PromptForm::from_config(&ResolvedConfig::default());

        terminal
            .draw(|f| ParamsBar::new(&form.temperature, &form.max_tokens).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Temperature 0.7 (Ctrl"));
        assert!(text.contains("Max tokens 1000 (Ctrl"));
    }
}
