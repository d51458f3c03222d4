//! Searcher - GitHub repository search with a local, reconciled store.
//!
//! A search is sent to GitHub's repository search endpoint once; every
//! returned item is matched against the store by GitHub id and created,
//! updated or left alone. Stored repositories can then be read back with
//! language and star filters.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//! - `sqlite` / `postgres` - Database drivers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use searcher::{SearchConfig, SearchRequest, SearchService, connect_and_migrate};
//!
//! let db = connect_and_migrate("sqlite://searcher.db?mode=rwc").await?;
//! let service = SearchService::from_config(SearchConfig::default(), Arc::new(db))?;
//!
//! let report = service
//!     .search_and_reconcile(&SearchRequest::new("tetris").with_language("Rust"))
//!     .await?;
//! println!("{} new, {} updated", report.created, report.updated);
//!
//! let popular = service.read_stored(Some("rust"), Some(100), Some("forks")).await?;
//! ```

pub mod config;
pub mod db;
pub mod entity;
pub mod github;
pub mod http;
pub mod reconcile;
pub mod repository;
pub mod service;

#[cfg(feature = "migrate")]
pub mod migration;

pub use config::SearchConfig;
pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use github::{GitHubError, GitHubSearchClient, SearchRequest};
pub use reconcile::{ReconcileReport, Reconciliation, reconcile};
pub use repository::{RepositoryError, RepositoryFilter, RepositoryStore, SortField};
pub use service::SearchService;
