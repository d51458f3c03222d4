//! REST server for searching GitHub and reading stored repositories.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/github/search` | Search GitHub and reconcile the results |
//! | `GET`  | `/api/github/repositories` | Read stored repositories (`language`, `minStars`, `sort`) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! | Failure | Status | Body |
//! |---------|--------|------|
//! | blank query | 400 | `{"query": "Query cannot be empty"}` |
//! | rate limited | 429 + `Retry-After` | `{"error", "message", "retryAfterSeconds"}` |
//! | GitHub 4xx/5xx | same as GitHub | `{"error", "message"}` |
//! | anything else | 500 | `{"error", "message"}` |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use searcher::{
    GitHubError, GitHubRepositoryModel, RepositoryStore, SearchRequest, SearchService,
    connect_and_migrate,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::shutdown::shutdown_signal;

const SEARCH_SUCCESS_MESSAGE: &str = "Repositories fetched and saved successfully";

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub(crate) struct AppState {
    service: SearchService<dyn RepositoryStore>,
}

impl AppState {
    pub(crate) fn new(service: SearchService<dyn RepositoryStore>) -> Self {
        Self { service }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/github/search", post(handle_search))
        .route("/api/github/repositories", get(handle_repositories))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Start the REST server and run until Ctrl+C.
pub(crate) async fn run_server(
    config: &Config,
    database_url: &str,
    bind: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = bind.unwrap_or_else(|| config.server.bind.clone());

    let db = connect_and_migrate(database_url).await?;
    let store: Arc<dyn RepositoryStore> = Arc::new(db);
    let service = SearchService::from_config(config.search_config(), store)?;
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "Searcher server listening");
    println!("Searcher server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// ============ Error response ============

/// Failures a handler can end in, each with its own response shape.
#[derive(Debug)]
pub(crate) enum AppError {
    Validation(Vec<(&'static str, &'static str)>),
    Search(GitHubError),
}

impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        Self::Search(err)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                let body: BTreeMap<&str, &str> = errors.into_iter().collect();
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Search(err) => search_error_response(err),
        }
    }
}

fn search_error_response(err: GitHubError) -> Response {
    match err {
        GitHubError::RateLimited {
            retry_after_seconds,
        } => {
            tracing::warn!(retry_after_seconds, "Rate limit exceeded");
            let body = ErrorBody {
                error: "GitHub API Rate Limit Exceeded",
                message: err.to_string(),
                retry_after_seconds: Some(retry_after_seconds),
            };
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_seconds.to_string())],
                Json(body),
            )
                .into_response()
        }
        GitHubError::Api { message, status } => {
            tracing::error!(status, message = %message, "GitHub API error");
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = ErrorBody {
                error: "GitHub API Error",
                message,
                retry_after_seconds: None,
            };
            (status, Json(body)).into_response()
        }
        GitHubError::Unclassified { message } => {
            tracing::error!(message = %message, "Unexpected error");
            let body = ErrorBody {
                error: "Internal Server Error",
                message: format!("An unexpected error occurred: {message}"),
                retry_after_seconds: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /api/github/search ============

#[derive(Serialize)]
struct SearchResponse {
    message: &'static str,
    repositories: Vec<GitHubRepositoryModel>,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    request.validate().map_err(AppError::Validation)?;
    tracing::info!(
        query = %request.query,
        language = ?request.language,
        sort = ?request.sort,
        "Received search request"
    );

    let report = state.service.search_and_reconcile(&request).await?;

    Ok(Json(SearchResponse {
        message: SEARCH_SUCCESS_MESSAGE,
        repositories: report.repositories,
    }))
}

// ============ GET /api/github/repositories ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoriesParams {
    language: Option<String>,
    min_stars: Option<i32>,
    sort: Option<String>,
}

async fn handle_repositories(
    State(state): State<AppState>,
    Query(params): Query<RepositoriesParams>,
) -> Result<Json<Vec<GitHubRepositoryModel>>, AppError> {
    let repositories = state
        .service
        .read_stored(
            params.language.as_deref(),
            params.min_stars,
            params.sort.as_deref(),
        )
        .await?;
    Ok(Json(repositories))
}
