use crate::app::detail::{DetailRequest, DetailSession};
use crate::app::omd::{MovieDetail, MovieProvider, MovieSummary, ProviderError};
use crate::app::search::{SearchRequest, SearchSession};
use crate::app::watchlist::{WatchedEntry, Watchlist, WatchlistError};
use crate::config::Config;

use image::DynamicImage;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use ratatui_image::picker::Picker;
use std::sync::{Arc, mpsc};
use throbber_widgets_tui::ThrobberState;
use tracing::{info, warn};

pub const DEFAULT_WINDOW_TITLE: &str = "popcorn";

/// Results coming back from the fetch threads, tagged with their request.
pub enum FetchMessage {
    Search {
        request: SearchRequest,
        result: Result<Vec<MovieSummary>, ProviderError>,
    },
    Detail {
        request: DetailRequest,
        result: Result<MovieDetail, ProviderError>,
    },
    Poster {
        request: DetailRequest,
        result: Result<DynamicImage, ProviderError>,
    },
}

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    Search,
    Results,
    Detail,
    Watched,
    Exiting,
}

pub struct App {
    pub config: Config,
    pub current_screen: CurrentScreen,
    pub search: SearchSession,
    pub detail: DetailSession,
    pub watchlist: Watchlist,
    pub results_state: ListState,
    pub watched_state: ListState,
    pub results_open: bool,
    pub side_open: bool,
    pub status_message: Option<String>,
    pub throbber_state: ThrobberState,
    /// Where the rating stars were last drawn, for mouse hit testing.
    pub rating_area: Option<Rect>,
    pub picker: Option<Picker>,
    provider: Option<Arc<dyn MovieProvider>>,
    sender: mpsc::Sender<FetchMessage>,
    receiver: mpsc::Receiver<FetchMessage>,
}

impl App {
    pub fn new(
        config: Config,
        provider: Option<Arc<dyn MovieProvider>>,
        picker: Option<Picker>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let search = SearchSession::new(config.min_query_len);
        let detail = DetailSession::new(config.max_rating, config.rating_labels.clone());

        Self {
            config,
            current_screen: CurrentScreen::Results,
            search,
            detail,
            watchlist: Watchlist::new(),
            results_state: ListState::default(),
            watched_state: ListState::default(),
            results_open: true,
            side_open: true,
            status_message: None,
            throbber_state: ThrobberState::default(),
            rating_area: None,
            picker,
            provider,
            sender,
            receiver,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.provider.is_some()
    }

    /// Runs the configured initial query, the same as if the user typed it.
    pub fn start(&mut self) {
        let query = self.config.initial_query.clone();
        self.set_query(&query);
    }

    pub fn tick(&mut self) {
        if self.search.is_loading || self.detail.is_loading || self.detail.loading_poster {
            self.throbber_state.calc_next();
        }
    }

    // Search

    pub fn set_query(&mut self, query: &str) {
        let request = self.search.set_query(query);
        self.spawn_search(request);
    }

    pub fn push_search_char(&mut self, c: char) {
        let request = self.search.push_char(c);
        self.spawn_search(request);
    }

    pub fn pop_search_char(&mut self) {
        let request = self.search.pop_char();
        self.spawn_search(request);
    }

    pub fn clear_search(&mut self) {
        let request = self.search.clear();
        self.spawn_search(request);
    }

    fn spawn_search(&mut self, request: Option<SearchRequest>) {
        if self.search.movies.is_empty() {
            self.results_state.select(None);
        }

        let Some(request) = request else { return };
        let Some(provider) = self.provider.clone() else {
            self.search.is_loading = false;
            return;
        };

        info!(query = %request.query, id = request.id, "issuing search");
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = provider.search(&request.query);
            let _ = sender.send(FetchMessage::Search { request, result });
        });
    }

    // Selection

    pub fn next_result(&mut self) {
        let count = self.search.movies.len();
        if count == 0 {
            return;
        }
        let index = self.results_state.selected().map_or(0, |i| (i + 1) % count);
        self.results_state.select(Some(index));
    }

    pub fn previous_result(&mut self) {
        let count = self.search.movies.len();
        if count == 0 {
            return;
        }
        let index = match self.results_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.results_state.select(Some(index));
    }

    pub fn highlighted_result(&self) -> Option<&MovieSummary> {
        self.results_state
            .selected()
            .and_then(|i| self.search.movies.get(i))
    }

    /// Opens the detail pane for the highlighted result, or closes it when
    /// that movie is already open.
    pub fn select_highlighted(&mut self) {
        if let Some(imdb_id) = self.highlighted_result().map(|m| m.imdb_id.clone()) {
            self.select_movie(&imdb_id);
        }
    }

    pub fn select_movie(&mut self, imdb_id: &str) {
        self.status_message = None;
        self.rating_area = None;
        match self.detail.select(imdb_id) {
            Some(request) => {
                self.side_open = true;
                self.current_screen = CurrentScreen::Detail;
                self.spawn_detail(request);
            }
            None => self.current_screen = CurrentScreen::Results,
        }
    }

    pub fn close_movie(&mut self) {
        self.detail.close();
        self.rating_area = None;
        self.current_screen = CurrentScreen::Results;
    }

    fn spawn_detail(&mut self, request: DetailRequest) {
        let Some(provider) = self.provider.clone() else {
            self.detail.is_loading = false;
            return;
        };

        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = provider.details(&request.imdb_id);
            let _ = sender.send(FetchMessage::Detail { request, result });
        });
    }

    fn spawn_poster(&mut self, request: DetailRequest) {
        let (Some(provider), Some(poster_url)) = (
            self.provider.clone(),
            self.detail.movie.as_ref().map(|m| m.poster.clone()),
        ) else {
            return;
        };

        // Nothing to draw the image with.
        if self.picker.is_none() {
            self.detail.loading_poster = false;
            return;
        }

        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let result = provider.poster(&poster_url);
            let _ = sender.send(FetchMessage::Poster { request, result });
        });
    }

    // Rating and watched list

    /// User rating already given to the open movie, if it is in the list.
    pub fn watched_rating(&self) -> Option<u8> {
        let imdb_id = self.detail.selected_id.as_deref()?;
        self.watchlist.get(imdb_id).map(|entry| entry.user_rating)
    }

    pub fn rate(&mut self, star: u8) {
        if self.watched_rating().is_none() && self.detail.movie.is_some() {
            self.detail.stars.rate(star);
        }
    }

    /// Commits the star picked with the keyboard.
    pub fn commit_hovered_star(&mut self) {
        if self.watched_rating().is_none()
            && self.detail.movie.is_some()
            && self.detail.stars.is_hovering()
        {
            self.detail.stars.rate_displayed();
        }
        self.detail.stars.leave();
    }

    pub fn hover_star(&mut self, column: u16, row: u16) {
        let Some(area) = self.rating_area else { return };
        match self.detail.stars.position_at(area, column, row) {
            Some(star) => self.detail.stars.hover(star),
            None => self.detail.stars.leave(),
        }
    }

    /// Returns `true` when the click landed on a star.
    pub fn click_star(&mut self, column: u16, row: u16) -> bool {
        let Some(area) = self.rating_area else { return false };
        match self.detail.stars.position_at(area, column, row) {
            Some(star) => {
                self.rate(star);
                true
            }
            None => false,
        }
    }

    pub fn add_watched(&mut self) -> Result<(), WatchlistError> {
        let Some(movie) = self.detail.movie.as_ref() else {
            return Err(WatchlistError::NotLoaded);
        };
        let user_rating = self.detail.user_rating().unwrap_or(0);

        let entry = match WatchedEntry::from_detail(movie, user_rating) {
            Ok(entry) => entry,
            Err(err) => {
                self.status_message = Some(err.to_string());
                return Err(err);
            }
        };

        if let Err(err) = self.watchlist.add(entry) {
            warn!(error = %err, "not adding movie");
            self.status_message = Some(err.to_string());
            return Err(err);
        }

        self.status_message = None;
        self.close_movie();
        self.watched_state.select(Some(self.watchlist.len() - 1));
        self.current_screen = CurrentScreen::Watched;
        Ok(())
    }

    pub fn delete_watched(&mut self, imdb_id: &str) {
        if !self.watchlist.remove(imdb_id) {
            return;
        }

        let len = self.watchlist.len();
        let selected = match self.watched_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.watched_state.select(selected);
    }

    pub fn delete_highlighted_watched(&mut self) {
        let imdb_id = self
            .watched_state
            .selected()
            .and_then(|i| self.watchlist.entries().get(i))
            .map(|entry| entry.imdb_id.clone());

        if let Some(imdb_id) = imdb_id {
            self.delete_watched(&imdb_id);
        }
    }

    pub fn next_watched(&mut self) {
        let count = self.watchlist.len();
        if count == 0 {
            return;
        }
        let index = self.watched_state.selected().map_or(0, |i| (i + 1) % count);
        self.watched_state.select(Some(index));
    }

    pub fn previous_watched(&mut self) {
        let count = self.watchlist.len();
        if count == 0 {
            return;
        }
        let index = match self.watched_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.watched_state.select(Some(index));
    }

    // Layout

    pub fn toggle_results_box(&mut self) {
        self.results_open = !self.results_open;
    }

    pub fn toggle_side_box(&mut self) {
        self.side_open = !self.side_open;
    }

    /// Cycles focus between the results and whichever pane is on the right.
    pub fn switch_focus(&mut self) {
        self.current_screen = match self.current_screen {
            CurrentScreen::Results if self.detail.is_open() => CurrentScreen::Detail,
            CurrentScreen::Results => CurrentScreen::Watched,
            _ => CurrentScreen::Results,
        };
        if self.current_screen != CurrentScreen::Detail {
            self.detail.stars.leave();
        }
    }

    pub fn window_title(&self) -> String {
        match &self.detail.movie {
            Some(movie) if !movie.title.is_empty() => format!("Movie | {}", movie.title),
            _ => DEFAULT_WINDOW_TITLE.to_string(),
        }
    }

    // Messages

    /// Applies every finished fetch without blocking.
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_message(message);
        }
    }

    pub fn handle_message(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Search { request, result } => {
                if self.search.apply(&request, result) {
                    let first = (!self.search.movies.is_empty()).then_some(0);
                    self.results_state.select(first);
                }
            }
            FetchMessage::Detail { request, result } => {
                if self.detail.apply(&request, result) {
                    self.spawn_poster(request);
                }
            }
            FetchMessage::Poster { request, result } => {
                if let Some(picker) = &self.picker {
                    self.detail.apply_poster(&request, result, picker);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every search with one movie per query and looks details up by id.
    #[derive(Default)]
    struct FakeProvider {
        searches: AtomicUsize,
    }

    impl MovieProvider for FakeProvider {
        fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ProviderError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if query.starts_with("zzzzz") {
                return Err(ProviderError::NoMatches);
            }
            Ok(vec![MovieSummary {
                imdb_id: format!("tt-{query}"),
                title: query.to_string(),
                year: "2010".to_string(),
                poster: "N/A".to_string(),
                media_type: "movie".to_string(),
            }])
        }

        fn details(&self, imdb_id: &str) -> Result<MovieDetail, ProviderError> {
            if imdb_id == "tt-missing" {
                return Err(ProviderError::NotFound("Incorrect IMDb ID.".to_string()));
            }
            Ok(MovieDetail {
                imdb_id: imdb_id.to_string(),
                title: imdb_id.trim_start_matches("tt-").to_string(),
                year: "2010".to_string(),
                runtime: "148 min".to_string(),
                imdb_rating: "8.8".to_string(),
                poster: "N/A".to_string(),
                response: "True".to_string(),
                ..MovieDetail::default()
            })
        }

        fn poster(&self, _poster_url: &str) -> Result<DynamicImage, ProviderError> {
            Ok(DynamicImage::new_rgb8(1, 1))
        }
    }

    fn create_app() -> (App, Arc<FakeProvider>) {
        let provider = Arc::new(FakeProvider::default());
        let shared: Arc<dyn MovieProvider> = provider.clone();
        let app = App::new(Config::default(), Some(shared), None);
        (app, provider)
    }

    fn wait_for_messages(app: &mut App, count: usize) {
        for _ in 0..count {
            let message = app
                .receiver
                .recv_timeout(Duration::from_secs(5))
                .expect("fetch did not report back");
            app.handle_message(message);
        }
    }

    #[test]
    fn test_short_query_issues_no_fetch() {
        let (mut app, provider) = create_app();
        app.set_query("in");

        assert!(app.search.movies.is_empty());
        assert!(!app.search.is_loading);
        assert!(app.receiver.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(provider.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_search_select_rate_add() {
        let (mut app, _) = create_app();
        app.set_query("inception");
        wait_for_messages(&mut app, 1);

        assert_eq!(app.search.movies.len(), 1);
        assert_eq!(app.results_state.selected(), Some(0));

        app.select_highlighted();
        assert_eq!(app.current_screen, CurrentScreen::Detail);
        wait_for_messages(&mut app, 1);
        assert_eq!(app.window_title(), "Movie | inception");

        app.rate(8);
        app.add_watched().unwrap();

        assert_eq!(app.watchlist.len(), 1);
        assert_eq!(app.watchlist.entries()[0].user_rating, 8);
        assert_eq!(app.watchlist.entries()[0].runtime, Some(148));
        assert!(!app.detail.is_open());
        assert_eq!(app.current_screen, CurrentScreen::Watched);
        assert_eq!(app.window_title(), DEFAULT_WINDOW_TITLE);

        let summary = app.watchlist.summary();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.avg_user_rating, Some(8.0));
    }

    #[test]
    fn test_rapid_queries_keep_latest_result() {
        let (mut app, _) = create_app();
        app.set_query("matr");
        app.set_query("matri");
        app.set_query("matrix");
        wait_for_messages(&mut app, 3);

        assert_eq!(app.search.movies.len(), 1);
        assert_eq!(app.search.movies[0].title, "matrix");
        assert!(!app.search.is_loading);
    }

    #[test]
    fn test_failed_search_sets_error() {
        let (mut app, _) = create_app();
        app.set_query("zzzzzNoSuchMovie");
        assert!(app.search.is_loading);
        wait_for_messages(&mut app, 1);

        assert_eq!(app.search.error.as_deref(), Some("No matches found"));
        assert!(app.search.movies.is_empty());
        assert!(!app.search.is_loading);
        assert_eq!(app.results_state.selected(), None);
    }

    #[test]
    fn test_toggle_selection() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        app.select_movie("tt-alien");

        assert!(!app.detail.is_open());
        assert_eq!(app.current_screen, CurrentScreen::Results);

        // The first fetch still reports back but has nowhere to land.
        wait_for_messages(&mut app, 1);
        assert!(app.detail.movie.is_none());
    }

    #[test]
    fn test_failed_detail_shows_error() {
        let (mut app, _) = create_app();
        app.select_movie("tt-missing");
        wait_for_messages(&mut app, 1);

        assert!(!app.detail.is_loading);
        assert_eq!(
            app.detail.error.as_deref(),
            Some("Movie not found: Incorrect IMDb ID.")
        );
    }

    #[test]
    fn test_add_requires_rating() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        wait_for_messages(&mut app, 1);

        assert_eq!(app.add_watched(), Err(WatchlistError::MissingRating));
        assert!(app.watchlist.is_empty());
        assert!(app.detail.is_open());
    }

    #[test]
    fn test_add_before_details_arrive() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        app.rate(7);

        assert_eq!(app.add_watched(), Err(WatchlistError::NotLoaded));
        assert!(app.watchlist.is_empty());
        assert_eq!(app.current_screen, CurrentScreen::Detail);

        wait_for_messages(&mut app, 1);
        app.rate(7);
        assert_eq!(app.add_watched(), Ok(()));
        assert_eq!(app.watchlist.len(), 1);
    }

    #[test]
    fn test_already_watched_cannot_be_rated_again() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        wait_for_messages(&mut app, 1);
        app.rate(7);
        app.add_watched().unwrap();

        app.select_movie("tt-alien");
        wait_for_messages(&mut app, 1);
        assert_eq!(app.watched_rating(), Some(7));

        app.rate(2);
        assert_eq!(app.detail.user_rating(), None);
        assert_eq!(app.watchlist.len(), 1);
    }

    #[test]
    fn test_delete_watched() {
        let (mut app, _) = create_app();
        for imdb_id in ["tt-alien", "tt-aliens"] {
            app.select_movie(imdb_id);
            wait_for_messages(&mut app, 1);
            app.rate(9);
            app.add_watched().unwrap();
        }
        assert_eq!(app.watched_state.selected(), Some(1));

        app.delete_watched("tt-nothing");
        assert_eq!(app.watchlist.len(), 2);

        app.delete_highlighted_watched();
        assert_eq!(app.watchlist.len(), 1);
        assert_eq!(app.watchlist.entries()[0].imdb_id, "tt-alien");
        assert_eq!(app.watched_state.selected(), Some(0));

        app.delete_highlighted_watched();
        assert!(app.watchlist.is_empty());
        assert_eq!(app.watched_state.selected(), None);
    }

    #[test]
    fn test_mouse_rating() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        wait_for_messages(&mut app, 1);
        app.rating_area = Some(Rect::new(10, 5, 20, 1));

        app.hover_star(14, 5);
        assert_eq!(app.detail.stars.displayed(), 3);
        assert_eq!(app.detail.user_rating(), None);

        app.hover_star(14, 9);
        assert_eq!(app.detail.stars.displayed(), 0);

        assert!(!app.click_star(40, 5));
        assert!(app.click_star(19, 5));
        assert_eq!(app.detail.user_rating(), Some(5));
    }

    #[test]
    fn test_keyboard_rating() {
        let (mut app, _) = create_app();
        app.select_movie("tt-alien");
        wait_for_messages(&mut app, 1);

        app.detail.stars.hover_next();
        app.detail.stars.hover_next();
        app.commit_hovered_star();

        assert_eq!(app.detail.user_rating(), Some(2));
        assert!(!app.detail.stars.is_hovering());
    }

    #[test]
    fn test_without_provider_nothing_is_fetched() {
        let mut app = App::new(Config::default(), None, None);
        app.start();

        assert!(!app.has_api_key());
        assert_eq!(app.search.query, "inception");
        assert!(!app.search.is_loading);
    }
}
