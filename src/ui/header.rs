use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the search box and the result count
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let editing = app.current_screen == CurrentScreen::Search;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search_block = Block::default()
        .title("🍿 popcorn")
        .borders(Borders::ALL)
        .border_style(border_style);

    let query = if app.search.query.is_empty() && !editing {
        Span::styled("Search movies...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search.query.as_str(), Style::default().fg(Color::White))
    };

    let mut line = vec![query];
    if editing {
        line.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)).block(search_block), chunks[0]);

    let count = Paragraph::new(Line::from(vec![
        Span::raw("Found "),
        Span::styled(
            app.search.movies.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" results"),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(count, chunks[1]);
}
