use tracing::{debug, info, warn};

use crate::app::omd::{MovieSummary, ProviderError};

pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// A search that should be sent to the provider, tagged so the answer can be
/// matched against the query that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchSession {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
    min_query_len: usize,
    latest_request: u64,
}

impl SearchSession {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            query: String::new(),
            movies: Vec::new(),
            is_loading: false,
            error: None,
            min_query_len,
            latest_request: 0,
        }
    }

    /// Updates the query and returns the request to issue, if any.
    pub fn set_query(&mut self, query: &str) -> Option<SearchRequest> {
        if query == self.query {
            return None;
        }

        self.query = query.to_string();
        self.error = None;
        // Anything still in flight now answers an older query.
        self.latest_request += 1;

        if self.query.chars().count() < self.min_query_len {
            self.movies.clear();
            self.is_loading = false;
            return None;
        }

        self.is_loading = true;
        Some(SearchRequest {
            id: self.latest_request,
            query: self.query.clone(),
        })
    }

    pub fn push_char(&mut self, c: char) -> Option<SearchRequest> {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(&query)
    }

    pub fn pop_char(&mut self) -> Option<SearchRequest> {
        let mut query = self.query.clone();
        query.pop();
        self.set_query(&query)
    }

    pub fn clear(&mut self) -> Option<SearchRequest> {
        self.set_query("")
    }

    /// Applies a search result. Returns `false` when the request was superseded.
    pub fn apply(
        &mut self,
        request: &SearchRequest,
        result: Result<Vec<MovieSummary>, ProviderError>,
    ) -> bool {
        if request.id != self.latest_request {
            debug!(query = %request.query, current = %self.query, "discarding stale search result");
            return false;
        }

        match result {
            Ok(movies) => {
                info!(query = %request.query, count = movies.len(), "search complete");
                self.movies = movies;
            }
            Err(err) => {
                warn!(query = %request.query, error = %err, "search failed");
                self.movies.clear();
                self.error = Some(err.to_string());
            }
        }
        self.is_loading = false;
        true
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(imdb_id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            poster: "N/A".to_string(),
            media_type: "movie".to_string(),
        }
    }

    #[test]
    fn test_short_query_issues_no_request() {
        let mut search = SearchSession::default();
        assert_eq!(search.set_query("in"), None);
        assert!(search.movies.is_empty());
        assert!(!search.is_loading);
    }

    #[test]
    fn test_short_query_clears_previous_results() {
        let mut search = SearchSession::default();
        let request = search.set_query("inception").unwrap();
        search.apply(&request, Ok(vec![movie("tt1375666", "Inception")]));
        assert_eq!(search.movies.len(), 1);

        assert_eq!(search.set_query("in"), None);
        assert!(search.movies.is_empty());
    }

    #[test]
    fn test_one_request_per_distinct_query() {
        let mut search = SearchSession::default();
        let first = search.set_query("inception").unwrap();
        assert_eq!(first.query, "inception");
        assert!(search.is_loading);

        assert_eq!(search.set_query("inception"), None);

        let second = search.set_query("inceptio").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut search = SearchSession::default();
        let older = search.set_query("matr").unwrap();
        let newer = search.set_query("matrix").unwrap();

        assert!(search.apply(&newer, Ok(vec![movie("tt0133093", "The Matrix")])));
        assert!(!search.apply(&older, Ok(vec![movie("tt0000001", "Matriarch")])));

        assert_eq!(search.movies.len(), 1);
        assert_eq!(search.movies[0].title, "The Matrix");
        assert!(!search.is_loading);
    }

    #[test]
    fn test_response_for_short_query_superseded() {
        let mut search = SearchSession::default();
        let request = search.set_query("matrix").unwrap();
        search.set_query("ma");

        assert!(!search.apply(&request, Ok(vec![movie("tt0133093", "The Matrix")])));
        assert!(search.movies.is_empty());
    }

    #[test]
    fn test_returning_to_same_query_ignores_first_request() {
        let mut search = SearchSession::default();
        let first = search.set_query("alien").unwrap();
        search.set_query("aliens").unwrap();
        let third = search.set_query("alien").unwrap();

        assert!(!search.apply(&first, Ok(vec![])));
        assert!(search.is_loading);
        assert!(search.apply(&third, Ok(vec![movie("tt0078748", "Alien")])));
    }

    #[test]
    fn test_failure_sets_error_and_clears_list() {
        let mut search = SearchSession::default();
        let request = search.set_query("inception").unwrap();
        search.apply(&request, Ok(vec![movie("tt1375666", "Inception")]));

        let request = search.set_query("zzzzzNoSuchMovie").unwrap();
        search.apply(&request, Err(ProviderError::NoMatches));

        assert_eq!(search.error.as_deref(), Some("No matches found"));
        assert!(search.movies.is_empty());
        assert!(!search.is_loading);
    }

    #[test]
    fn test_changing_query_clears_error() {
        let mut search = SearchSession::default();
        let request = search.set_query("zzzzz").unwrap();
        search.apply(&request, Err(ProviderError::NoMatches));

        search.pop_char();
        assert_eq!(search.query, "zzzz");
        assert_eq!(search.error, None);
    }

    #[test]
    fn test_editing_helpers() {
        let mut search = SearchSession::default();
        assert_eq!(search.push_char('a'), None);
        assert_eq!(search.push_char('b'), None);
        let request = search.push_char('c').unwrap();
        assert_eq!(request.query, "abc");

        assert_eq!(search.clear(), None);
        assert!(search.query.is_empty());
    }
}
