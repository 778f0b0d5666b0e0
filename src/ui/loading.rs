use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
};
use throbber_widgets_tui::Throbber;

/// Renders `block` with an animated throbber and `label` centred inside it
pub fn render_loading(frame: &mut Frame, app: &mut App, block: Block, area: Rect, label: &str) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    // throbber symbol + space + label
    let width = label.chars().count() as u16 + 2;
    let offset = inner.width.saturating_sub(width) / 2;
    let line_area = Rect::new(
        inner.x + offset,
        inner.y + inner.height / 2,
        inner.width - offset,
        1,
    );

    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_style(Style::default().fg(Color::Cyan));

    frame.render_stateful_widget(throbber, line_area, &mut app.throbber_state);
}

/// Single message box used for placeholders and errors
pub fn render_notice(frame: &mut Frame, block: Block, area: Rect, message: &str, style: Style) {
    let text = vec![Line::from(""), Line::styled(message, style)];
    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
