//! Conversion from raw search items to repository models.

use std::fmt;

use serde_json::Value;

use super::types::SearchItem;
use crate::entity::github_repository::Model as GitHubRepositoryModel;

/// Why a search item was dropped instead of stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRejection {
    /// The item is not an object, or a required field has the wrong type.
    Malformed(String),
    /// A field needed to identify the repository is absent or null.
    MissingField(&'static str),
}

impl fmt::Display for ItemRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed item: {reason}"),
            Self::MissingField(field) => write!(f, "missing essential field: {field}"),
        }
    }
}

/// Map one raw `items` entry to a repository model.
///
/// `id`, `name`, `owner` and `owner.login` are required and must have the
/// right JSON type. Counts default to 0 when absent, null, mistyped or out of
/// `i32` range; description, language and `updated_at` become `None` in the
/// same cases.
pub fn to_repository_model(raw: Value) -> Result<GitHubRepositoryModel, ItemRejection> {
    let item: SearchItem =
        serde_json::from_value(raw).map_err(|e| ItemRejection::Malformed(e.to_string()))?;

    let id = item.id.ok_or(ItemRejection::MissingField("id"))?;
    let name = item.name.ok_or(ItemRejection::MissingField("name"))?;
    let owner = item.owner.ok_or(ItemRejection::MissingField("owner"))?;
    let owner_name = owner
        .login
        .ok_or(ItemRejection::MissingField("owner.login"))?;

    Ok(GitHubRepositoryModel {
        id,
        name,
        description: item.description,
        owner_name,
        language: item.language,
        stars_count: item.stargazers_count.unwrap_or(0),
        forks_count: item.forks_count.unwrap_or(0),
        last_updated: item.updated_at,
    })
}
