use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::entity::github_repository::Model;

use super::errors::Result;
use super::query::{self, RepositoryFilter, SortField};
use super::single;

/// The operations the search pipeline needs from persistent storage.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Model>>;

    /// Persist `model`, replacing any stored row with the same id.
    async fn save(&self, model: Model) -> Result<Model>;

    async fn find_matching(&self, filter: &RepositoryFilter, sort: SortField)
    -> Result<Vec<Model>>;
}

#[async_trait]
impl RepositoryStore for DatabaseConnection {
    async fn find_by_id(&self, id: i64) -> Result<Option<Model>> {
        single::find_by_id(self, id).await
    }

    async fn save(&self, model: Model) -> Result<Model> {
        single::save(self, model).await
    }

    async fn find_matching(
        &self,
        filter: &RepositoryFilter,
        sort: SortField,
    ) -> Result<Vec<Model>> {
        query::find_matching(self, filter, sort).await
    }
}
