//! Search request execution and response classification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::GitHubError;
use super::query::build_search_query;
use super::types::SearchRequest;
use crate::config::SearchConfig;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Header GitHub uses to announce when the rate-limit window resets (epoch seconds).
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Placeholder used in error messages when the body is not valid UTF-8.
const UNREADABLE_BODY: &str = "<unreadable response body>";

/// Client for GitHub's repository search endpoint.
///
/// Each call issues exactly one GET. Nothing is retried; failures are
/// classified once and handed back to the caller.
#[derive(Clone)]
pub struct GitHubSearchClient {
    transport: Arc<dyn HttpTransport>,
    config: SearchConfig,
}

impl GitHubSearchClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: SearchConfig) -> Self {
        Self { transport, config }
    }

    /// Create a client backed by reqwest, honoring the configured timeout.
    pub fn from_config(config: SearchConfig) -> Result<Self, GitHubError> {
        let transport = match config.request_timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)
                .map_err(|e| GitHubError::unclassified(e.to_string()))?,
            None => ReqwestTransport::new(reqwest::Client::new()),
        };
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search and return the raw `items` of the response.
    ///
    /// A successful response without an `items` array yields an empty list.
    pub async fn search_repositories(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Value>, GitHubError> {
        let path_and_query = build_search_query(
            &self.config.search_path,
            &request.query,
            request.language.as_deref(),
            request.sort.as_deref(),
        );
        let url = self.config.url_for(&path_and_query);

        tracing::info!(url = %url, "Fetching repositories from GitHub");

        let http_request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .header("User-Agent", self.config.user_agent.as_str());

        let response = self.transport.get(http_request).await.map_err(|e| {
            tracing::error!(error = %e, "GitHub search request failed");
            GitHubError::unclassified(format!("Error fetching or saving repositories: {e}"))
        })?;

        classify_response(&response, Utc::now())
    }
}

/// Resolve a search response into its items or a typed failure.
///
/// Checks run in a fixed order: rate limit (403 with a reset header), other
/// 4xx, 5xx, then any remaining non-2xx status.
pub fn classify_response(
    response: &HttpResponse,
    now: DateTime<Utc>,
) -> Result<Vec<Value>, GitHubError> {
    let status = response.status;

    if (200..300).contains(&status) {
        return decode_items(response);
    }

    let body = response.text().unwrap_or(UNREADABLE_BODY);

    if status == 403
        && let Some(reset) = response.header(RATE_LIMIT_RESET_HEADER)
    {
        let reset_epoch: i64 = reset.trim().parse().map_err(|_| {
            tracing::error!(reset = %reset, "Unparseable rate limit reset header");
            GitHubError::unclassified(format!(
                "Error fetching or saving repositories: invalid {RATE_LIMIT_RESET_HEADER} value '{reset}'"
            ))
        })?;
        let retry_after_seconds = retry_after_seconds(reset_epoch, now);
        tracing::warn!(retry_after_seconds, "GitHub API rate limit exceeded");
        return Err(GitHubError::RateLimited {
            retry_after_seconds,
        });
    }

    if (400..500).contains(&status) {
        tracing::error!(status, body = %body, "GitHub API client error");
        return Err(GitHubError::Api {
            message: format!("GitHub API client error: {body}"),
            status,
        });
    }

    if (500..600).contains(&status) {
        tracing::error!(status, body = %body, "GitHub API server error");
        return Err(GitHubError::Api {
            message: format!("GitHub API server error: {body}"),
            status,
        });
    }

    tracing::error!(status, body = %body, "Unexpected GitHub API response");
    Err(GitHubError::unclassified(format!(
        "An unexpected error occurred during GitHub API call: {body}"
    )))
}

/// Seconds until `reset_epoch`, clamped at zero.
pub fn retry_after_seconds(reset_epoch: i64, now: DateTime<Utc>) -> u64 {
    u64::try_from(reset_epoch.saturating_sub(now.timestamp())).unwrap_or(0)
}

fn decode_items(response: &HttpResponse) -> Result<Vec<Value>, GitHubError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        tracing::warn!("GitHub API response body was empty");
        return Ok(Vec::new());
    }

    let payload: Value = serde_json::from_slice(&response.body).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode GitHub search response");
        GitHubError::unclassified(format!("Error fetching or saving repositories: {e}"))
    })?;

    Ok(extract_items(payload))
}

/// Take the `items` array out of a search payload.
fn extract_items(mut payload: Value) -> Vec<Value> {
    match payload.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => {
            tracing::warn!("GitHub API response did not contain an 'items' array");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use chrono::Duration;
    use serde_json::json;

    fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn test_config() -> SearchConfig {
        SearchConfig {
            api_base_url: "https://api.test".to_string(),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_success_returns_items_in_order() {
        let resp = response(200, &[], r#"{"total_count":2,"items":[{"id":1},{"id":2}]}"#);
        let items = classify_response(&resp, Utc::now()).unwrap();
        assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_success_without_items_array_is_empty() {
        for body in [r#"{"total_count":0}"#, r#"{"items":null}"#, r#"{"items":{}}"#, ""] {
            let items = classify_response(&response(200, &[], body), Utc::now()).unwrap();
            assert!(items.is_empty(), "body {body:?} should yield no items");
        }
    }

    #[test]
    fn test_undecodable_success_body_is_unclassified() {
        let err = classify_response(&response(200, &[], "<html>"), Utc::now()).unwrap_err();
        assert!(matches!(err, GitHubError::Unclassified { .. }));
    }

    #[test]
    fn test_forbidden_with_reset_header_is_rate_limited() {
        let now = Utc::now();
        let reset = (now + Duration::seconds(120)).timestamp().to_string();
        let resp = response(403, &[("x-ratelimit-reset", &reset)], "slow down");

        let err = classify_response(&resp, now).unwrap_err();
        assert_eq!(
            err,
            GitHubError::RateLimited {
                retry_after_seconds: 120
            }
        );
    }

    #[test]
    fn test_reset_in_the_past_never_goes_negative() {
        let now = Utc::now();
        let reset = (now - Duration::seconds(300)).timestamp().to_string();
        let resp = response(403, &[(RATE_LIMIT_RESET_HEADER, &reset)], "");

        assert_eq!(classify_response(&resp, now).unwrap_err().retry_after(), Some(0));
    }

    #[test]
    fn test_forbidden_without_reset_header_is_api_error() {
        let err = classify_response(&response(403, &[], "no access"), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            GitHubError::Api {
                message: "GitHub API client error: no access".to_string(),
                status: 403,
            }
        );
    }

    #[test]
    fn test_rate_limit_header_only_counts_for_forbidden() {
        let resp = response(429, &[(RATE_LIMIT_RESET_HEADER, "9999999999")], "too many");
        assert_eq!(classify_response(&resp, Utc::now()).unwrap_err().status(), Some(429));
    }

    #[test]
    fn test_garbage_reset_header_is_unclassified() {
        let resp = response(403, &[(RATE_LIMIT_RESET_HEADER, "soon")], "");
        let err = classify_response(&resp, Utc::now()).unwrap_err();
        assert!(matches!(err, GitHubError::Unclassified { .. }));
    }

    #[test]
    fn test_client_and_server_errors_keep_status_and_body() {
        let err = classify_response(
            &response(400, &[], "Invalid query parameter"),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().starts_with("GitHub API client error: "));
        assert!(err.to_string().contains("Invalid query parameter"));

        let err = classify_response(&response(503, &[], "Internal server issue"), Utc::now())
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().starts_with("GitHub API server error: "));
        assert!(err.to_string().contains("Internal server issue"));
    }

    #[test]
    fn test_unreadable_error_body_uses_placeholder() {
        let resp = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: vec![0xff, 0xfe, 0xfd],
        };
        let err = classify_response(&resp, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), format!("GitHub API server error: {UNREADABLE_BODY}"));
    }

    #[test]
    fn test_other_error_statuses_are_unclassified() {
        for status in [101, 304, 399, 600] {
            let err = classify_response(&response(status, &[], "odd"), Utc::now()).unwrap_err();
            assert!(
                matches!(err, GitHubError::Unclassified { .. }),
                "status {status} should be unclassified"
            );
        }
    }

    #[test]
    fn test_retry_after_seconds_truncates_and_clamps() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();
        assert_eq!(retry_after_seconds(1_120, now), 120);
        assert_eq!(retry_after_seconds(1_000, now), 0);
        assert_eq!(retry_after_seconds(10, now), 0);
    }

    #[test]
    fn test_retry_after_seconds_saturates_at_the_extremes() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();
        assert_eq!(retry_after_seconds(i64::MIN, now), 0);
        assert_eq!(retry_after_seconds(i64::MAX, now), (i64::MAX - 1_000) as u64);

        let before_epoch = DateTime::from_timestamp(-1_000, 0).unwrap();
        assert_eq!(retry_after_seconds(i64::MAX, before_epoch), i64::MAX as u64);
    }

    #[test]
    fn test_minimum_reset_header_is_rate_limited_with_zero_wait() {
        let resp = response(403, &[(RATE_LIMIT_RESET_HEADER, "-9223372036854775808")], "");
        let err = classify_response(&resp, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            GitHubError::RateLimited {
                retry_after_seconds: 0
            }
        );
    }

    #[tokio::test]
    async fn test_search_sends_one_get_with_headers() {
        let transport = MockTransport::new();
        let url = "https://api.test/search/repositories?q=tokio+language:Rust&order=desc&sort=stars";
        transport.push_response(url, response(200, &[], r#"{"items":[{"id":5}]}"#));

        let client = GitHubSearchClient::new(Arc::new(transport.clone()), test_config());
        let request = SearchRequest::new("tokio")
            .with_language("Rust")
            .with_sort("stars");
        let items = client.search_repositories(&request).await.unwrap();

        assert_eq!(items, vec![json!({"id": 5})]);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, url);
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "accept"),
            Some("application/json")
        );
        assert!(crate::http::header_get(&requests[0].headers, "user-agent").is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_is_unclassified() {
        let transport = MockTransport::new();
        let url = "https://api.test/search/repositories?q=x&order=desc";
        transport.push_failure(url, "connection refused");

        let client = GitHubSearchClient::new(Arc::new(transport), test_config());
        let err = client
            .search_repositories(&SearchRequest::new("x"))
            .await
            .unwrap_err();
        match err {
            GitHubError::Unclassified { message } => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected unclassified, got {other:?}"),
        }
    }

    #[test]
    fn test_from_config_builds_reqwest_client() {
        let client = GitHubSearchClient::from_config(SearchConfig::default()).unwrap();
        assert_eq!(client.config().search_path, "/search/repositories");
    }
}
