use crate::app::omd::MovieDetail;
use crate::app::rating::{STAR_WIDTH, StarRating};
use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

use super::loading::{render_loading, render_notice};
use super::main_content::box_block;

/// Renders the movie detail pane
pub fn render_movie_detail(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.current_screen == CurrentScreen::Detail;
    app.rating_area = None;

    if app.detail.is_loading {
        let block = box_block("Movie", true, focused);
        render_loading(frame, app, block, area, "Fetching movie details from OMDb...");
        return;
    }

    if let Some(error) = &app.detail.error {
        render_error_state(frame, box_block("Movie", true, focused), area, error);
        return;
    }

    if app.detail.movie.is_some() {
        render_movie_info(frame, area, app, focused);
    } else {
        render_notice(
            frame,
            box_block("Movie", true, focused),
            area,
            "No movie details available",
            Style::default().fg(Color::Gray),
        );
    }
}

/// Renders the poster section
fn render_poster_section(frame: &mut Frame, area: Rect, app: &mut App) {
    let poster_block = Block::default().borders(Borders::ALL).title("Poster");

    if app.detail.loading_poster {
        render_loading(frame, app, poster_block, area, "Poster...");
    } else if let Some(protocol) = &mut app.detail.poster {
        let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));

        let inner_area = poster_block.inner(area);
        frame.render_widget(poster_block, area);
        frame.render_stateful_widget(image, inner_area, protocol);
    } else {
        render_notice(
            frame,
            poster_block,
            area,
            "No poster",
            Style::default().fg(Color::Gray),
        );
    }
}

/// Renders error state
fn render_error_state(frame: &mut Frame, block: Block, area: Rect, error: &str) {
    let error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Failed to fetch movie details",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "This might happen if:",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "- The id is not in the OMDb database",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "- Network connection issues",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "- API rate limit reached",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press (Esc) or (b) to go back",
            Style::default().fg(Color::Gray),
        )),
    ];

    let error_paragraph = Paragraph::new(error_text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

/// Renders movie information
fn render_movie_info(frame: &mut Frame, area: Rect, app: &mut App, focused: bool) {
    let outer_block = box_block("Movie", true, focused);
    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Poster and overview
            Constraint::Length(4),  // Rating
            Constraint::Min(5),     // Plot and credits
            Constraint::Length(1),  // Footer
        ])
        .split(inner_area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(10)])
        .split(chunks[0]);

    render_poster_section(frame, top[0], app);

    // Borrow the movie again now that the poster is drawn
    let Some(movie) = app.detail.movie.as_ref() else {
        return;
    };

    render_overview_section(frame, top[1], movie);
    render_content_section(frame, chunks[2], movie);

    app.rating_area = render_rating_section(frame, chunks[1], app);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Press (Esc) or (b) to go back",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);
}

/// Renders title, release, runtime, genre and IMDb rating next to the poster
fn render_overview_section(frame: &mut Frame, area: Rect, movie: &MovieDetail) {
    let mut overview = vec![
        Line::from(Span::styled(
            &movie.title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(&movie.released, Style::default().fg(Color::White)),
            Span::raw(" • "),
            Span::styled(&movie.runtime, Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(&movie.genre, Style::default().fg(Color::Gray))),
    ];

    if movie.imdb_rating != "N/A" {
        overview.push(Line::from(vec![
            Span::raw("⭐ "),
            Span::styled(
                &movie.imdb_rating,
                Style::default()
                    .fg(get_rating_color(&movie.imdb_rating))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" IMDb rating", Style::default().fg(Color::Gray)),
        ]));
    }

    if !movie.rated.is_empty() && movie.rated != "N/A" {
        overview.push(Line::from(vec![
            Span::styled("Rated: ", Style::default().fg(Color::Gray)),
            Span::styled(&movie.rated, Style::default().fg(Color::White)),
        ]));
    }

    let paragraph = Paragraph::new(overview)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Renders the star control, or the existing rating for watched movies.
/// Returns where the stars were drawn.
fn render_rating_section(frame: &mut Frame, area: Rect, app: &App) -> Option<Rect> {
    let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(rating) = app.watched_rating() {
        let already = StarRating::new(app.detail.stars.max()).with_rating(rating);
        let mut spans = vec![Span::styled("Already watched: ", Style::default().fg(Color::Gray))];
        spans.extend(star_spans(&already));
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
        return None;
    }

    let stars = &app.detail.stars;
    let mut spans = star_spans(stars);
    spans.push(Span::styled(
        format!(" {}", stars.label()),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ));

    let hint = if let Some(message) = &app.status_message {
        Span::styled(message.as_str(), Style::default().fg(Color::Red))
    } else if app.detail.user_rating().is_some() {
        Span::styled(
            "(a) + Add to list",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "(←→) pick, (Enter) or click to rate",
            Style::default().fg(Color::Gray),
        )
    };

    frame.render_widget(Paragraph::new(vec![Line::from(spans), Line::from(hint)]), inner);

    Some(Rect::new(
        inner.x,
        inner.y,
        (stars.max() as u16 * STAR_WIDTH).min(inner.width),
        inner.height.min(1),
    ))
}

fn star_spans(stars: &StarRating) -> Vec<Span<'static>> {
    let displayed = stars.displayed();
    (1..=stars.max())
        .map(|i| {
            if i <= displayed {
                Span::styled("★ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("☆ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect()
}

/// Renders the main content section
fn render_content_section(frame: &mut Frame, area: Rect, movie: &MovieDetail) {
    let mut content = vec![];

    content.push(Line::from(Span::styled(
        &movie.plot,
        Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
    )));
    content.push(Line::from(""));

    content.push(Line::from(vec![
        Span::styled("Starring ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(&movie.actors, Style::default().fg(Color::White)),
    ]));

    content.push(Line::from(vec![
        Span::styled("Directed by ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(&movie.director, Style::default().fg(Color::White)),
    ]));
    content.push(Line::from(""));

    if movie.metascore != "N/A" && !movie.metascore.is_empty() {
        let rating_color = get_metascore_color(&movie.metascore);
        content.push(Line::from(vec![
            Span::raw("Metascore: "),
            Span::styled(&movie.metascore, Style::default().fg(rating_color).add_modifier(Modifier::BOLD)),
        ]));
    }

    for rating in &movie.ratings {
        content.push(Line::from(vec![
            Span::raw(format!("{}: ", rating.source)),
            Span::styled(&rating.value, Style::default().fg(Color::Yellow)),
        ]));
    }

    if movie.awards != "N/A" && !movie.awards.is_empty() {
        content.push(Line::from(vec![
            Span::styled("Awards: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(&movie.awards, Style::default().fg(Color::Yellow)),
        ]));
    }

    let content_paragraph = Paragraph::new(content).wrap(Wrap { trim: true });

    frame.render_widget(content_paragraph, area);
}

/// Helper function to get color based on IMDb rating
fn get_rating_color(rating: &str) -> Color {
    if let Ok(score) = rating.parse::<f32>() {
        if score >= 7.0 {
            Color::Green
        } else if score >= 5.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    } else {
        Color::White
    }
}

/// Helper function to get color based on Metascore
fn get_metascore_color(score: &str) -> Color {
    if let Ok(score_val) = score.parse::<i32>() {
        if score_val >= 70 {
            Color::Green
        } else if score_val >= 50 {
            Color::Yellow
        } else {
            Color::Red
        }
    } else {
        Color::White
    }
}
