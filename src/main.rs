mod app;
use app::App;

mod config;
mod logging;
mod ui;

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::prelude::CrosstermBackend;
use ratatui_image::picker::Picker;
use tracing::{error, info, warn};

use crate::app::omd::{MovieProvider, OmdbClient};
use crate::app::CurrentScreen;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "Search OMDb, rate what you watched, keep a running tally")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.config/popcorn/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Search term to start with instead of the configured one
    #[arg(long, value_name = "TERM")]
    query: Option<String>,

    /// Write the config file (plus --query) back to the config path and exit
    #[arg(long, action = ArgAction::SetTrue)]
    write_config: bool,

    /// Enable verbose logging (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    if cli.write_config {
        // OMDB_API_KEY stays in the environment, never on disk
        let mut config = Config::load_file_or_default(&config_path)?;
        if let Some(query) = cli.query {
            config.initial_query = query;
        }
        config.validate()?;
        config.save_to_file(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load(&config_path)?;
    if let Some(query) = cli.query {
        config.initial_query = query;
    }

    logging::init_logging(cli.verbose, &config.log_level, &config.log_dir()?)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting popcorn");

    let provider: Option<Arc<dyn MovieProvider>> = match config.api_key() {
        Some(key) => Some(Arc::new(OmdbClient::new(&config.base_url, key)?)),
        None => {
            warn!("no OMDb API key configured");
            None
        }
    };

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    // Must run after entering the alternate screen and before reading events
    let picker = match Picker::from_query_stdio() {
        Ok(picker) => Some(picker),
        Err(err) => {
            warn!(error = %err, "terminal graphics unavailable, posters disabled");
            None
        }
    };

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let mut app = App::new(config, provider, picker);
    app.start();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        SetTitle("")
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        return Err(err);
    }

    info!(watched = app.watchlist.len(), "bye");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let mut window_title = String::new();

    loop {
        app.drain_messages();
        app.tick();

        let title = app.window_title();
        if title != window_title {
            execute!(io::stderr(), SetTitle(&title))?;
            window_title = title;
        }

        terminal.draw(|f| ui::ui(f, app))?;

        // Poll for events with a timeout to allow UI updates
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind == event::KeyEventKind::Release {
                    // Skip events that are not KeyEventKind::Press
                    continue;
                }
                if handle_key(app, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => {}
        }
    }
}

/// Returns `true` when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // Handle search input when searching is active
    if app.current_screen == CurrentScreen::Search {
        match key.code {
            KeyCode::Char(c) => app.push_search_char(c),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                app.current_screen = CurrentScreen::Results;
            }
            KeyCode::Esc => {
                app.clear_search();
                app.current_screen = CurrentScreen::Results;
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('/') | KeyCode::Char('s') if app.current_screen != CurrentScreen::Exiting => {
            app.current_screen = CurrentScreen::Search;
            return false;
        }
        KeyCode::Tab if app.current_screen != CurrentScreen::Exiting => {
            app.switch_focus();
            return false;
        }
        KeyCode::Char('1') if app.current_screen != CurrentScreen::Detail => {
            app.toggle_results_box();
            return false;
        }
        KeyCode::Char('2') if app.current_screen != CurrentScreen::Detail => {
            app.toggle_side_box();
            return false;
        }
        _ => {}
    }

    match app.current_screen {
        CurrentScreen::Results => match key.code {
            KeyCode::Char('q') => return request_quit(app),
            KeyCode::Down | KeyCode::Char('j') => app.next_result(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_result(),
            KeyCode::Enter => app.select_highlighted(),
            KeyCode::Esc if app.detail.is_open() => app.close_movie(),
            _ => {}
        },
        CurrentScreen::Detail => match key.code {
            KeyCode::Char('q') => return request_quit(app),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.close_movie(),
            KeyCode::Right | KeyCode::Char('l') => app.detail.stars.hover_next(),
            KeyCode::Left | KeyCode::Char('h') => app.detail.stars.hover_previous(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.commit_hovered_star();
            }
            KeyCode::Char(c @ '0'..='9') => {
                let star = c.to_digit(10).map_or(0, |d| if d == 0 { 10 } else { d as u8 });
                if star <= app.detail.stars.max() {
                    app.rate(star);
                }
            }
            KeyCode::Char('a') => {
                // Rating and duplicate failures show in the rating section
                let _ = app.add_watched();
            }
            _ => {}
        },
        CurrentScreen::Watched => match key.code {
            KeyCode::Char('q') => return request_quit(app),
            KeyCode::Down | KeyCode::Char('j') => app.next_watched(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_watched(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_highlighted_watched(),
            _ => {}
        },
        CurrentScreen::Exiting => match key.code {
            KeyCode::Char('y') => return true,
            KeyCode::Char('n') | KeyCode::Esc => {
                app.current_screen = CurrentScreen::Results;
            }
            _ => {}
        },
        CurrentScreen::Search => {}
    }

    false
}

/// The watched list only lives in memory, so ask before throwing it away.
fn request_quit(app: &mut App) -> bool {
    if app.watchlist.is_empty() {
        return true;
    }
    app.current_screen = CurrentScreen::Exiting;
    false
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !app.detail.is_open() || app.watched_rating().is_some() {
        return;
    }

    match mouse.kind {
        MouseEventKind::Moved => app.hover_star(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => {
            if app.click_star(mouse.column, mouse.row) {
                app.current_screen = CurrentScreen::Detail;
            }
        }
        _ => {}
    }
}

