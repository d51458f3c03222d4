use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entity::github_repository::{Column, Entity as GitHubRepository, Model};

use super::errors::{RepositoryError, Result};

/// Optional filters for stored-repository queries. Set filters are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFilter {
    /// Case-insensitive match on the primary language.
    pub language: Option<String>,
    /// Inclusive lower bound on the star count.
    pub min_stars: Option<i32>,
}

impl RepositoryFilter {
    /// Build a filter, treating an empty language as "no language filter".
    pub fn new(language: Option<&str>, min_stars: Option<i32>) -> Self {
        Self {
            language: language.filter(|l| !l.is_empty()).map(str::to_string),
            min_stars,
        }
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(language) = &self.language {
            condition = condition
                .add(Expr::expr(Func::lower(Expr::col(Column::Language))).eq(language.to_lowercase()));
        }
        if let Some(min_stars) = self.min_stars {
            condition = condition.add(Column::StarsCount.gte(min_stars));
        }
        condition
    }
}

/// Descending sort applied to stored-repository queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Stars,
    Forks,
    LastUpdated,
}

impl SortField {
    /// Resolve a user-supplied sort key.
    ///
    /// `forks` and `lastupdated` are matched case-insensitively; anything else,
    /// including no key at all, sorts by stars.
    pub fn resolve(key: Option<&str>) -> Self {
        match key.map(str::to_ascii_lowercase).as_deref() {
            Some("forks") => Self::Forks,
            Some("lastupdated") => Self::LastUpdated,
            _ => Self::Stars,
        }
    }

    fn column(self) -> Column {
        match self {
            Self::Stars => Column::StarsCount,
            Self::Forks => Column::ForksCount,
            Self::LastUpdated => Column::LastUpdated,
        }
    }
}

// ─── Query Operations ────────────────────────────────────────────────────────

/// Find every repository matching `filter`, ordered descending by `sort`.
///
/// No limit is applied.
pub async fn find_matching<C: ConnectionTrait>(
    db: &C,
    filter: &RepositoryFilter,
    sort: SortField,
) -> Result<Vec<Model>> {
    GitHubRepository::find()
        .filter(filter.condition())
        .order_by_desc(sort.column())
        .all(db)
        .await
        .map_err(RepositoryError::from)
}

/// Count stored repositories.
pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64> {
    GitHubRepository::find()
        .count(db)
        .await
        .map_err(RepositoryError::from)
}
