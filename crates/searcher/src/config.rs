//! Settings for the search pipeline.

use std::time::Duration;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Path of the repository search endpoint, relative to the base URL.
pub const DEFAULT_SEARCH_PATH: &str = "/search/repositories";

/// Maximum number of store operations in flight across all runs.
pub const DEFAULT_STORE_CONCURRENCY: usize = 8;

/// Explicit configuration handed to [`crate::SearchService`] and
/// [`crate::github::GitHubSearchClient`] at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub api_base_url: String,
    pub search_path: String,
    /// Sent as `User-Agent`; GitHub rejects requests without one.
    pub user_agent: String,
    /// Transport timeout. `None` leaves reqwest's default (no timeout).
    pub request_timeout: Option<Duration>,
    /// Size of the permit pool guarding store I/O.
    pub store_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            user_agent: concat!("searcher/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            store_concurrency: DEFAULT_STORE_CONCURRENCY,
        }
    }
}

impl SearchConfig {
    /// Join the base URL with a path-and-query produced by the query builder.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            path_and_query
        )
    }
}
