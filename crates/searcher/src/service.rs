//! The search-and-store pipeline and the stored-repository reader.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::SearchConfig;
use crate::entity::github_repository::Model;
use crate::github::{GitHubError, GitHubSearchClient, SearchRequest};
use crate::reconcile::{ReconcileReport, reconcile_items};
use crate::repository::{RepositoryFilter, RepositoryStore, SortField};

/// Fetches repositories from GitHub and keeps the local store in sync with them.
///
/// Store access is bounded by a semaphore sized from
/// [`SearchConfig::store_concurrency`], so concurrent requests queue for the
/// store instead of piling onto it.
pub struct SearchService<S: ?Sized> {
    client: GitHubSearchClient,
    store: Arc<S>,
    store_permits: Arc<Semaphore>,
}

impl<S: ?Sized> Clone for SearchService<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            store: Arc::clone(&self.store),
            store_permits: Arc::clone(&self.store_permits),
        }
    }
}

impl<S> SearchService<S>
where
    S: RepositoryStore + ?Sized,
{
    pub fn new(client: GitHubSearchClient, store: Arc<S>) -> Self {
        let permits = client
            .config()
            .store_concurrency
            .clamp(1, Semaphore::MAX_PERMITS);
        Self {
            client,
            store,
            store_permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Build a reqwest-backed service from `config`.
    pub fn from_config(config: SearchConfig, store: Arc<S>) -> Result<Self, GitHubError> {
        Ok(Self::new(GitHubSearchClient::from_config(config)?, store))
    }

    pub fn client(&self) -> &GitHubSearchClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one GitHub search and reconcile every returned item with the store.
    ///
    /// Issues exactly one remote request. A blank query is rejected before
    /// anything is sent.
    pub async fn search_and_reconcile(
        &self,
        request: &SearchRequest,
    ) -> Result<ReconcileReport, GitHubError> {
        if let Err(errors) = request.validate() {
            let message = errors
                .iter()
                .map(|(_, msg)| *msg)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GitHubError::Api {
                message,
                status: 400,
            });
        }

        let items = self.client.search_repositories(request).await?;
        tracing::info!(count = items.len(), "Received repositories from GitHub");

        let _permit = self
            .store_permits
            .acquire()
            .await
            .map_err(|_| GitHubError::unclassified("Semaphore closed unexpectedly"))?;

        let report = reconcile_items(self.store.as_ref(), items).await?;
        tracing::info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            "Reconciled search results"
        );
        Ok(report)
    }

    /// Read stored repositories, filtered and sorted descending.
    ///
    /// `sort` accepts `forks` and `lastupdated` (any case); anything else sorts
    /// by stars. An empty `language` means no language filter.
    pub async fn read_stored(
        &self,
        language: Option<&str>,
        min_stars: Option<i32>,
        sort: Option<&str>,
    ) -> Result<Vec<Model>, GitHubError> {
        let filter = RepositoryFilter::new(language, min_stars);
        let sort = SortField::resolve(sort);
        tracing::info!(
            language = ?filter.language,
            min_stars = ?filter.min_stars,
            sort = ?sort,
            "Retrieving stored repositories"
        );

        let _permit = self
            .store_permits
            .acquire()
            .await
            .map_err(|_| GitHubError::unclassified("Semaphore closed unexpectedly"))?;

        let found = self.store.find_matching(&filter, sort).await?;
        tracing::info!(count = found.len(), "Found stored repositories");
        Ok(found)
    }
}


#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod db_tests {
    use sea_orm::DatabaseConnection;
    use serde_json::json;

    use super::*;
    use crate::connect_and_migrate;
    use crate::http::{HttpResponse, MockTransport};

    const SEARCH_URL: &str =
        "https://api.github.com/search/repositories?q=test+language:Java&order=desc&sort=stars";

    async fn setup() -> (MockTransport, SearchService<DatabaseConnection>) {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");
        let transport = MockTransport::new();
        let client = GitHubSearchClient::new(Arc::new(transport.clone()), SearchConfig::default());
        (transport, SearchService::new(client, Arc::new(db)))
    }

    fn ok_items(items: serde_json::Value) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: json!({ "items": items }).to_string().into_bytes(),
        }
    }

    fn repo(id: i64, name: &str, stars: i32, forks: i32, updated: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "owner": { "login": "octocat" },
            "language": "Java",
            "stargazers_count": stars,
            "forks_count": forks,
            "updated_at": updated
        })
    }

    fn request() -> SearchRequest {
        SearchRequest::new("test")
            .with_language("Java")
            .with_sort("stars")
    }

    #[tokio::test]
    async fn test_search_then_read_round_trip() {
        let (transport, svc) = setup().await;
        transport.push_response(
            SEARCH_URL,
            ok_items(json!([
                repo(1, "small", 50, 80, "2024-03-01T00:00:00Z"),
                repo(2, "big", 500, 5, "2024-01-01T00:00:00Z"),
            ])),
        );

        svc.search_and_reconcile(&request()).await.unwrap();

        let by_stars = svc.read_stored(Some("java"), None, None).await.unwrap();
        let names: Vec<&str> = by_stars.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small"]);

        let popular = svc.read_stored(None, Some(100), Some("forks")).await.unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].name, "big");
    }

    #[tokio::test]
    async fn test_repeat_search_updates_in_place() {
        let (transport, svc) = setup().await;
        transport.push_response(
            SEARCH_URL,
            ok_items(json!([repo(1, "repo", 50, 1, "2024-01-01T00:00:00Z")])),
        );
        transport.push_response(
            SEARCH_URL,
            ok_items(json!([repo(1, "repo-renamed", 75, 1, "2024-02-01T00:00:00Z")])),
        );

        svc.search_and_reconcile(&request()).await.unwrap();
        let report = svc.search_and_reconcile(&request()).await.unwrap();

        assert_eq!(report.updated, 1);
        let stored = svc.read_stored(None, None, None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "repo-renamed");
        assert_eq!(stored[0].stars_count, 75);
    }

    #[tokio::test]
    async fn test_offset_timestamp_survives_store_and_repeat_search() {
        use chrono::DateTime;

        let (transport, svc) = setup().await;
        let item = json!([{
            "id": 42,
            "name": "offset",
            "description": "east of UTC",
            "owner": { "login": "octocat" },
            "language": "Java",
            "stargazers_count": 7,
            "forks_count": 3,
            "updated_at": "2024-01-01T05:00:00+05:00"
        }]);
        transport.push_response(SEARCH_URL, ok_items(item.clone()));
        transport.push_response(SEARCH_URL, ok_items(item));

        let first = svc.search_and_reconcile(&request()).await.unwrap();
        assert_eq!(first.created, 1);

        let second = svc.search_and_reconcile(&request()).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.unchanged, 1);
        assert_eq!(second.writes(), 0);

        let stored = svc.read_stored(Some("JAVA"), Some(7), None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], first.repositories[0]);
        assert_eq!(stored[0].description.as_deref(), Some("east of UTC"));
        let expected = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(stored[0].last_updated, Some(expected));
        assert_eq!(
            crate::repository::count(svc.store()).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_timestamp_aborts_with_store_fault() {
        let (transport, svc) = setup().await;
        transport.push_response(
            SEARCH_URL,
            ok_items(json!([
                repo(1, "dated", 5, 0, "2024-01-01T00:00:00Z"),
                { "id": 2, "name": "undated", "owner": { "login": "octocat" } },
                repo(3, "never-reached", 5, 0, "2024-01-01T00:00:00Z"),
            ])),
        );

        let err = svc
            .search_and_reconcile(&request())
            .await
            .expect_err("undated item should fail the run");
        assert!(matches!(err, GitHubError::Unclassified { .. }));

        let stored = svc.read_stored(None, None, None).await.unwrap();
        let ids: Vec<i64> = stored.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }
}
