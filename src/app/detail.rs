use image::DynamicImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use tracing::{debug, info, warn};

use crate::app::omd::{MovieDetail, ProviderError};
use crate::app::rating::StarRating;

/// A detail lookup tagged with the selection that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub id: u64,
    pub imdb_id: String,
}

/// Selected movie plus everything loaded for it.
pub struct DetailSession {
    pub selected_id: Option<String>,
    pub movie: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub loading_poster: bool,
    pub poster: Option<StatefulProtocol>,
    pub stars: StarRating,
    max_rating: u8,
    rating_labels: Vec<String>,
    latest_request: u64,
}

impl DetailSession {
    pub fn new(max_rating: u8, rating_labels: Vec<String>) -> Self {
        Self {
            selected_id: None,
            movie: None,
            is_loading: false,
            error: None,
            loading_poster: false,
            poster: None,
            stars: StarRating::new(max_rating).with_messages(rating_labels.clone()),
            max_rating,
            rating_labels,
            latest_request: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.selected_id.is_some()
    }

    /// Selects `imdb_id`, or deselects it when it is already selected.
    pub fn select(&mut self, imdb_id: &str) -> Option<DetailRequest> {
        if self.selected_id.as_deref() == Some(imdb_id) {
            self.close();
            return None;
        }

        self.reset();
        self.selected_id = Some(imdb_id.to_string());
        self.is_loading = true;
        Some(DetailRequest {
            id: self.latest_request,
            imdb_id: imdb_id.to_string(),
        })
    }

    pub fn close(&mut self) {
        self.reset();
        self.selected_id = None;
    }

    fn reset(&mut self) {
        self.latest_request += 1;
        self.movie = None;
        self.is_loading = false;
        self.error = None;
        self.loading_poster = false;
        self.poster = None;
        self.stars = StarRating::new(self.max_rating).with_messages(self.rating_labels.clone());
    }

    fn is_current(&self, request: &DetailRequest) -> bool {
        request.id == self.latest_request
            && self.selected_id.as_deref() == Some(request.imdb_id.as_str())
    }

    /// Applies a lookup result. Returns `true` when a poster should be fetched.
    pub fn apply(
        &mut self,
        request: &DetailRequest,
        result: Result<MovieDetail, ProviderError>,
    ) -> bool {
        if !self.is_current(request) {
            debug!(imdb_id = %request.imdb_id, "discarding stale movie details");
            return false;
        }

        self.is_loading = false;
        match result {
            Ok(movie) => {
                info!(imdb_id = %request.imdb_id, title = %movie.title, "movie details loaded");
                let wants_poster = movie.has_poster();
                self.loading_poster = wants_poster;
                self.movie = Some(movie);
                wants_poster
            }
            Err(err) => {
                warn!(imdb_id = %request.imdb_id, error = %err, "failed to fetch movie details");
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn apply_poster(
        &mut self,
        request: &DetailRequest,
        result: Result<DynamicImage, ProviderError>,
        picker: &Picker,
    ) {
        if !self.is_current(request) {
            debug!(imdb_id = %request.imdb_id, "discarding stale poster");
            return;
        }

        self.loading_poster = false;
        match result {
            Ok(image) => self.poster = Some(picker.new_resize_protocol(image)),
            Err(err) => warn!(imdb_id = %request.imdb_id, error = %err, "failed to download poster"),
        }
    }

    /// The committed user rating, if the user picked one.
    pub fn user_rating(&self) -> Option<u8> {
        match self.stars.rating() {
            0 => None,
            rating => Some(rating),
        }
    }
}
