use image::DynamicImage;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by a [`MovieProvider`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Something went wrong while fetching the movies (status {0})")]
    Status(StatusCode),
    #[error("No matches found")]
    NoMatches,
    #[error("Movie not found: {0}")]
    NotFound(String),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to decode poster: {0}")]
    Image(#[from] image::ImageError),
}

/// One row of an OMDb search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn into_movies(self) -> Result<Vec<MovieSummary>, ProviderError> {
        if self.response != "True" {
            debug!(error = ?self.error, "search returned no matches");
            return Err(ProviderError::NoMatches);
        }
        Ok(self.search)
    }
}

/// Full record from an OMDb lookup by id. Lookup failures come back with only
/// `Response` and `Error` set, hence the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MovieDetail {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub ratings: Vec<Rating>,
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub box_office: String,
    pub response: String,
    pub error: Option<String>,
}

impl MovieDetail {
    pub fn ensure_found(self, imdb_id: &str) -> Result<Self, ProviderError> {
        if self.response != "True" {
            let reason = self.error.unwrap_or_else(|| imdb_id.to_string());
            return Err(ProviderError::NotFound(reason));
        }
        Ok(self)
    }

    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty() && self.poster != "N/A"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Source of movie data. Implementations are called from worker threads.
pub trait MovieProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ProviderError>;
    fn details(&self, imdb_id: &str) -> Result<MovieDetail, ProviderError>;
    fn poster(&self, poster_url: &str) -> Result<DynamicImage, ProviderError>;
}

/// [`MovieProvider`] backed by the OMDb HTTP API.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("popcorn_tui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/?apikey={}&s={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        )
    }

    fn details_url(&self, imdb_id: &str) -> String {
        format!(
            "{}/?apikey={}&i={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(imdb_id)
        )
    }

    fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        Ok(response.text()?)
    }
}

impl MovieProvider for OmdbClient {
    fn search(&self, query: &str) -> Result<Vec<MovieSummary>, ProviderError> {
        info!(query, "searching OMDb");
        let body = self.get_text(&self.search_url(query))?;
        let data: SearchResponse = serde_json::from_str(&body)?;
        data.into_movies()
    }

    fn details(&self, imdb_id: &str) -> Result<MovieDetail, ProviderError> {
        info!(imdb_id, "fetching movie details from OMDb");
        let body = self.get_text(&self.details_url(imdb_id))?;
        let movie: MovieDetail = serde_json::from_str(&body)?;
        movie.ensure_found(imdb_id)
    }

    fn poster(&self, poster_url: &str) -> Result<DynamicImage, ProviderError> {
        debug!(poster_url, "downloading poster");
        let response = self.client.get(poster_url).send()?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let bytes = response.bytes()?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
