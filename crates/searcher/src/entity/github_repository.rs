//! GitHubRepository entity - one row per repository returned by a search.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A repository as stored locally.
///
/// Two models are content-equal when every field (including `id`) matches,
/// which is exactly the derived `PartialEq`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_repositories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Repository ID assigned by GitHub. Stable across fetches.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Repository name. Remote renames are picked up on the next fetch.
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Login of the owning user or organization.
    pub owner_name: String,
    /// Primary language as reported by GitHub (casing not normalized).
    #[sea_orm(nullable)]
    pub language: Option<String>,

    // ─── Statistics ──────────────────────────────────────────────────────────
    pub stars_count: i32,
    pub forks_count: i32,

    /// When the repository was last updated on GitHub.
    ///
    /// Optional in search payloads, but the column is `NOT NULL`: saving a
    /// model without it fails.
    pub last_updated: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner_name, self.name)
    }

    /// Overwrite every field except identity with the values from `fetched`.
    ///
    /// Returns a new model; `self` is left untouched.
    #[must_use]
    pub fn update_from(&self, fetched: &Model) -> Model {
        Model {
            id: self.id,
            name: fetched.name.clone(),
            description: fetched.description.clone(),
            owner_name: fetched.owner_name.clone(),
            language: fetched.language.clone(),
            stars_count: fetched.stars_count,
            forks_count: fetched.forks_count,
            last_updated: fetched.last_updated,
        }
    }
}
