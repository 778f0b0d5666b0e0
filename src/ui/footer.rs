use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Text,
    widgets::{Block, Borders, Paragraph},
};

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    match app.current_screen {
        CurrentScreen::Search => "(type) to search, (Enter) done, (Esc) clear, (Ctrl-c) quit",
        CurrentScreen::Results => {
            if app.search.movies.is_empty() {
                "(/) search, (Tab) switch box, (1/2) collapse, (q) quit"
            } else {
                "(↑↓/jk) scroll, (Enter) open/close, (/) search, (Tab) switch, (1/2) collapse, (q) quit"
            }
        }
        CurrentScreen::Detail => {
            if app.watched_rating().is_some() {
                "(Esc/b) back, (Tab) switch, (q) quit"
            } else {
                "(←→/hl) pick, (Enter) rate, (1-9,0) rate, (a) add, (Esc/b) back, (q) quit"
            }
        }
        CurrentScreen::Watched => "(↑↓/jk) scroll, (d) delete, (/) search, (Tab) switch, (q) quit",
        CurrentScreen::Exiting => "Quit? (y) to confirm, (n) to cancel",
    }
}

/// Renders the footer with instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let bottom_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default());

    let instruction_text = get_instruction_text(app);
    let bottom = Paragraph::new(Text::styled(instruction_text, Style::default()))
        .block(bottom_block);

    frame.render_widget(bottom, area);
}
