//! GitHub repository search.
//!
//! # Module Structure
//!
//! - [`query`] - Search URL construction
//! - [`client`] - Request execution and response classification
//! - [`error`] - The three failure kinds a search can end in
//! - [`types`] - Inbound request and raw payload shapes
//! - [`convert`] - Mapping raw items to repository models

mod client;
mod convert;
mod error;
mod query;
mod types;

pub use client::{
    GitHubSearchClient, RATE_LIMIT_RESET_HEADER, classify_response, retry_after_seconds,
};
pub use convert::{ItemRejection, to_repository_model};
pub use error::GitHubError;
pub use query::build_search_query;
pub use types::{SearchItem, SearchItemOwner, SearchRequest};
