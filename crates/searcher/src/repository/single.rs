use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::entity::github_repository::{ActiveModel, Column, Entity as GitHubRepository, Model};

use super::errors::{RepositoryError, Result};

// ─── Single Record Operations ────────────────────────────────────────────────

/// Find a repository by its GitHub ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>> {
    GitHubRepository::find_by_id(id)
        .one(db)
        .await
        .map_err(RepositoryError::from)
}

/// Conflict clause used by [`save`]: on an existing id, overwrite every
/// non-key column with the incoming values.
pub(crate) fn save_on_conflict() -> OnConflict {
    OnConflict::column(Column::Id)
        .update_columns([
            Column::Name,
            Column::Description,
            Column::OwnerName,
            Column::Language,
            Column::StarsCount,
            Column::ForksCount,
            Column::LastUpdated,
        ])
        .to_owned()
}

/// Every column explicitly `Set`, so the insert carries the full row.
fn to_active_model(model: Model) -> ActiveModel {
    ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        description: Set(model.description),
        owner_name: Set(model.owner_name),
        language: Set(model.language),
        stars_count: Set(model.stars_count),
        forks_count: Set(model.forks_count),
        last_updated: Set(model.last_updated),
    }
}

/// Insert a repository, or overwrite the stored row with the same id.
///
/// Issues exactly one statement.
///
/// # Errors
/// Returns `RepositoryError::InvalidInput` if `last_updated` is missing (the
/// column is `NOT NULL`), or `RepositoryError::Database` if the write fails.
pub async fn save<C: ConnectionTrait>(db: &C, model: Model) -> Result<Model> {
    if model.last_updated.is_none() {
        return Err(RepositoryError::InvalidInput {
            message: format!("Missing required field: last_updated ({})", model.full_name()),
        });
    }

    GitHubRepository::insert(to_active_model(model.clone()))
        .on_conflict(save_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(model)
}
