use std::sync::Arc;

use searcher::{SearchService, connect_and_migrate};

use crate::commands::output::{OutputFormat, print_repositories};
use crate::commands::search::describe_failure;
use crate::config::Config;

pub(crate) async fn handle_list(
    language: Option<String>,
    min_stars: Option<i32>,
    sort: Option<String>,
    output: OutputFormat,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Arc::new(connect_and_migrate(database_url).await?);
    let service = SearchService::from_config(config.search_config(), db)
        .map_err(|e| describe_failure(&e))?;

    let repositories = service
        .read_stored(language.as_deref(), min_stars, sort.as_deref())
        .await
        .map_err(|e| describe_failure(&e))?;

    print_repositories(&repositories, output)?;
    Ok(())
}
