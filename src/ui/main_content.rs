use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use tui_big_text::{BigText, PixelSize};

use super::loading::{render_loading, render_notice};
use super::movie_detail::render_movie_detail;
use super::watched::render_watched;

/// Bordered box with the open/closed marker in its title. Focused boxes get a
/// highlighted border.
pub fn box_block(title: &str, open: bool, focused: bool) -> Block<'static> {
    let marker = if open { "[–]" } else { "[+]" };
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Block::default()
        .title(format!("{} {}", marker, title))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Renders the results box on the left and the detail/watched box on the right
pub fn render_main_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_results(frame, app, chunks[0]);

    if !app.side_open {
        app.rating_area = None;
        let title = if app.detail.is_open() { "Movie" } else { "Watched" };
        let focused = matches!(app.current_screen, CurrentScreen::Detail | CurrentScreen::Watched);
        frame.render_widget(box_block(title, false, focused), chunks[1]);
        return;
    }

    if app.detail.is_open() {
        render_movie_detail(frame, app, chunks[1]);
    } else {
        render_watched(frame, app, chunks[1]);
    }
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.current_screen == CurrentScreen::Results;
    let block = box_block("Results", app.results_open, focused);

    if !app.results_open {
        frame.render_widget(block, area);
        return;
    }

    if !app.has_api_key() {
        render_missing_api_key(frame, block, area);
        return;
    }

    if app.search.is_loading {
        render_loading(frame, app, block, area, "Loading...");
        return;
    }

    if let Some(error) = &app.search.error {
        let message = format!("⛔ {}", error);
        render_notice(frame, block, area, &message, Style::default().fg(Color::Red));
        return;
    }

    if app.search.movies.is_empty() {
        let min = app.config.min_query_len;
        let message = format!("Type at least {} characters to search", min);
        render_notice(frame, block, area, &message, Style::default().fg(Color::Gray));
        return;
    }

    let selected_id = app.detail.selected_id.clone();
    let items: Vec<ListItem> = app
        .search
        .movies
        .iter()
        .map(|movie| {
            let is_open = selected_id.as_deref() == Some(movie.imdb_id.as_str());
            let title_style = if is_open {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };

            ListItem::new(vec![
                Line::from(Span::styled(movie.title.clone(), title_style)),
                Line::from(Span::styled(
                    format!("  🗓 {}", movie.year),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.results_state);
}

/// Renders missing API key error with big text
fn render_missing_api_key(frame: &mut Frame, block: Block, area: Rect) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Big text
            Constraint::Min(5),    // Instructions
        ])
        .split(inner);

    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .lines(vec!["API KEY".into(), "REQUIRED!".into()])
        .alignment(Alignment::Center)
        .build();

    frame.render_widget(big_text, chunks[0]);

    let instructions = vec![
        Line::from(Span::styled(
            "Please set your OMDb API key to search movies",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "1. Get a free key at: http://www.omdbapi.com/apikey.aspx",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "2. Set environment variable: export OMDB_API_KEY=your_key_here",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "   or add api_key = \"...\" to ~/.config/popcorn/config.toml",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "3. Restart the application",
            Style::default().fg(Color::White),
        )),
    ];

    let instructions_paragraph = Paragraph::new(instructions)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(instructions_paragraph, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::omd::MovieDetail;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn create_app_with_movie() -> App {
        let mut app = App::new(Config::default(), None, None);
        let request = app.detail.select("tt1375666").unwrap();
        let movie = MovieDetail {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            poster: "N/A".to_string(),
            response: "True".to_string(),
            ..MovieDetail::default()
        };
        app.detail.apply(&request, Ok(movie));
        app.current_screen = CurrentScreen::Detail;
        app
    }

    #[test]
    fn test_collapsed_box_has_no_clickable_stars() {
        let mut app = create_app_with_movie();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal
            .draw(|f| render_main_content(f, &mut app, f.area()))
            .unwrap();
        let stars = app.rating_area.expect("stars drawn while the box is open");

        app.toggle_side_box();
        terminal
            .draw(|f| render_main_content(f, &mut app, f.area()))
            .unwrap();

        assert_eq!(app.rating_area, None);
        assert!(!app.click_star(stars.x + 1, stars.y));
        assert_eq!(app.detail.user_rating(), None);
    }

    #[test]
    fn test_loading_detail_has_no_clickable_stars() {
        let mut app = create_app_with_movie();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal
            .draw(|f| render_main_content(f, &mut app, f.area()))
            .unwrap();
        let stars = app.rating_area.expect("stars drawn for a loaded movie");

        app.detail.is_loading = true;
        terminal
            .draw(|f| render_main_content(f, &mut app, f.area()))
            .unwrap();

        assert_eq!(app.rating_area, None);
        assert!(!app.click_star(stars.x, stars.y));
    }
}
