//! Common re-exports for convenient entity usage.

pub use super::github_repository::{
    ActiveModel as GitHubRepositoryActiveModel, Column as GitHubRepositoryColumn,
    Entity as GitHubRepository, Model as GitHubRepositoryModel,
};
