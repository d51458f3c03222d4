use std::sync::Arc;

use searcher::{GitHubError, SearchRequest, SearchService, connect_and_migrate};

use crate::commands::output::{OutputFormat, print_report};
use crate::config::Config;

/// One-line diagnostic for a failed search.
pub(crate) fn describe_failure(err: &GitHubError) -> String {
    match err {
        GitHubError::RateLimited {
            retry_after_seconds,
        } => format!("{err} Retry in {retry_after_seconds}s."),
        GitHubError::Api { message, status } => {
            format!("GitHub API error ({status}): {message}")
        }
        GitHubError::Unclassified { message } => format!("Search failed: {message}"),
    }
}

pub(crate) async fn handle_search(
    request: SearchRequest,
    output: OutputFormat,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(errors) = request.validate() {
        let message = errors
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(message.into());
    }

    let db = Arc::new(connect_and_migrate(database_url).await?);
    let service = SearchService::from_config(config.search_config(), db)
        .map_err(|e| describe_failure(&e))?;

    let report = service
        .search_and_reconcile(&request)
        .await
        .map_err(|e| describe_failure(&e))?;

    print_report(&report, output)?;
    Ok(())
}
