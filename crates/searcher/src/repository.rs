//! Storage operations for GitHubRepository entities.
//!
//! Free functions work against any sea-orm connection; [`RepositoryStore`]
//! bundles the subset the search pipeline depends on.

mod errors;
mod query;
mod single;
mod store;

pub use errors::{RepositoryError, Result};
pub use query::{RepositoryFilter, SortField, count, find_matching};
pub use single::{find_by_id, save};
pub use store::RepositoryStore;
