use crate::app::utils::{PLACEHOLDER, format_average};
use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::main_content::box_block;

/// Renders the watched summary above the watched list
pub fn render_watched(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.current_screen == CurrentScreen::Watched;
    let block = box_block("Watched", true, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(inner);

    render_summary(frame, app, chunks[0]);
    render_watched_list(frame, app, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.watchlist.summary();
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let text = vec![
        Line::from(Span::styled(
            "MOVIES YOU WATCHED",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("#️⃣ ", label),
            Span::styled(format!("{} movies", summary.count), value),
            Span::raw("   "),
            Span::styled("⭐ ", label),
            Span::styled(format_average(summary.avg_imdb_rating, 1), value),
            Span::raw("   "),
            Span::styled("🌟 ", label),
            Span::styled(format_average(summary.avg_user_rating, 1), value),
            Span::raw("   "),
            Span::styled("⏳ ", label),
            Span::styled(format!("{} min", format_average(summary.avg_runtime, 0)), value),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn render_watched_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.watchlist.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Nothing here yet. Open a result, rate it and add it to your list.",
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app
        .watchlist
        .entries()
        .iter()
        .map(|entry| {
            let imdb = entry
                .imdb_rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let runtime = entry
                .runtime
                .map(|r| r.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string());

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        entry.title.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" ({})", entry.year), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(Span::styled(
                    format!("  ⭐ {}   🌟 {}   ⏳ {} min", imdb, entry.user_rating, runtime),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.watched_state);
}
