use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::app::omd::MovieDetail;
use crate::app::utils::{average, parse_rating, parse_runtime_minutes};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchlistError {
    #[error("{0} is already in your watched list")]
    AlreadyWatched(String),
    #[error("pick a rating before adding a movie")]
    MissingRating,
    #[error("movie details are not loaded yet")]
    NotLoaded,
}

/// A movie the user has watched and rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub imdb_rating: Option<f32>,
    pub runtime: Option<u32>,
    pub user_rating: u8,
}

impl WatchedEntry {
    pub fn from_detail(movie: &MovieDetail, user_rating: u8) -> Result<Self, WatchlistError> {
        if user_rating == 0 {
            return Err(WatchlistError::MissingRating);
        }

        Ok(Self {
            imdb_id: movie.imdb_id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster: movie.poster.clone(),
            imdb_rating: parse_rating(&movie.imdb_rating),
            runtime: parse_runtime_minutes(&movie.runtime),
            user_rating,
        })
    }
}

/// Aggregates over the watched list. Means are `None` when there is nothing to
/// average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: Option<f32>,
    pub avg_user_rating: Option<f32>,
    pub avg_runtime: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    entries: Vec<WatchedEntry>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|entry| entry.imdb_id == imdb_id)
    }

    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), WatchlistError> {
        if self.contains(&entry.imdb_id) {
            return Err(WatchlistError::AlreadyWatched(entry.title));
        }

        info!(imdb_id = %entry.imdb_id, user_rating = entry.user_rating, "added to watched list");
        self.entries.push(entry);
        Ok(())
    }

    /// Removes the entry for `imdb_id`. Unknown ids are ignored.
    pub fn remove(&mut self, imdb_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.imdb_id != imdb_id);

        let removed = self.entries.len() != before;
        if removed {
            info!(imdb_id, "removed from watched list");
        }
        removed
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary {
            count: self.entries.len(),
            avg_imdb_rating: average(self.entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(self.entries.iter().map(|e| e.user_rating as f32)),
            avg_runtime: average(self.entries.iter().filter_map(|e| e.runtime.map(|r| r as f32))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_entry(imdb_id: &str, imdb_rating: Option<f32>, runtime: Option<u32>, user_rating: u8) -> WatchedEntry {
        WatchedEntry {
            imdb_id: imdb_id.to_string(),
            title: format!("Movie {imdb_id}"),
            year: "2010".to_string(),
            poster: "N/A".to_string(),
            imdb_rating,
            runtime,
            user_rating,
        }
    }

    #[test]
    fn test_from_detail_parses_numbers() {
        let movie = MovieDetail {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            runtime: "148 min".to_string(),
            imdb_rating: "8.8".to_string(),
            ..MovieDetail::default()
        };

        let entry = WatchedEntry::from_detail(&movie, 8).unwrap();
        assert_eq!(entry.runtime, Some(148));
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.user_rating, 8);
        assert_eq!(
            WatchedEntry::from_detail(&movie, 0),
            Err(WatchlistError::MissingRating)
        );
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut watchlist = Watchlist::new();
        watchlist.add(create_entry("tt001", Some(7.0), Some(100), 6)).unwrap();

        let err = watchlist.add(create_entry("tt001", Some(7.0), Some(100), 9)).unwrap_err();
        assert_eq!(err, WatchlistError::AlreadyWatched("Movie tt001".to_string()));
        assert_eq!(watchlist.len(), 1);
        assert_eq!(watchlist.get("tt001").unwrap().user_rating, 6);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut watchlist = Watchlist::new();
        watchlist.add(create_entry("tt001", Some(7.0), Some(100), 6)).unwrap();

        assert!(!watchlist.remove("tt999"));
        assert_eq!(watchlist.len(), 1);

        assert!(watchlist.remove("tt001"));
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_empty_summary_has_no_means() {
        let summary = Watchlist::new().summary();
        assert_eq!(summary, WatchedSummary::default());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_user_rating, None);
    }

    #[test]
    fn test_summary_includes_new_entry() {
        let mut watchlist = Watchlist::new();
        watchlist.add(create_entry("tt001", Some(8.0), Some(120), 6)).unwrap();
        let before = watchlist.summary();

        watchlist.add(create_entry("tt002", Some(6.0), Some(100), 10)).unwrap();
        let after = watchlist.summary();

        assert_eq!(after.count, before.count + 1);
        assert_eq!(after.avg_imdb_rating, Some(7.0));
        assert_eq!(after.avg_user_rating, Some(8.0));
        assert_eq!(after.avg_runtime, Some(110.0));
    }

    #[test]
    fn test_summary_skips_missing_fields() {
        let mut watchlist = Watchlist::new();
        watchlist.add(create_entry("tt001", None, None, 4)).unwrap();
        watchlist.add(create_entry("tt002", Some(9.0), None, 8)).unwrap();

        let summary = watchlist.summary();
        assert_eq!(summary.avg_imdb_rating, Some(9.0));
        assert_eq!(summary.avg_runtime, None);
        assert_eq!(summary.avg_user_rating, Some(6.0));
    }
}
