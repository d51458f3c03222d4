//! SeaORM entity definitions for the searcher database schema.

pub mod github_repository;
pub mod prelude;
