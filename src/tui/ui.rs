use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::page::Page;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Alert, ModelSwitcherView, ParamsBar, TitleBar, TranscriptView};

const WAITING_STATUS: &str = "Waiting for reply...";

pub fn draw_ui(frame: &mut Frame, page: &Page, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, transcript_area, params_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(1), Length(input_height)])
            .areas(frame.area());

    let status = if page.submission.is_submitting() {
        WAITING_STATUS.to_string()
    } else {
        String::new()
    };
    TitleBar::new(
        page.ctx.switcher.current_model().map(str::to_string),
        &page.ctx.server,
        status,
    )
    .render(frame, title_area);

    TranscriptView::new(&mut tui.transcript, &page.ctx.transcript, spinner_frame)
        .render(frame, transcript_area);

    ParamsBar::new(&page.ctx.form.temperature, &page.ctx.form.max_tokens)
        .render(frame, params_area);

    tui.input_box.waiting = page.submission.is_submitting();
    tui.input_box.render(frame, input_area);

    if page.ctx.switcher.is_open() {
        ModelSwitcherView::new(&mut tui.switcher, &page.ctx.switcher).render(frame, frame.area());
    }
    if let Some(message) = page.ctx.window.current_alert() {
        Alert::new(message).render(frame, frame.area());
    }
}
