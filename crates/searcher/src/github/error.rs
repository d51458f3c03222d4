//! Typed failures of a search run.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Everything that can go wrong while searching and reconciling.
///
/// Callers match on the variant to choose a response: `RateLimited` carries a
/// retry delay, `Api` carries the status GitHub answered with, and
/// `Unclassified` covers transport, decode and store faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitHubError {
    #[error("GitHub API rate limit exceeded. Please try again later.")]
    RateLimited { retry_after_seconds: u64 },

    #[error("{message}")]
    Api { message: String, status: u16 },

    #[error("{message}")]
    Unclassified { message: String },
}

impl GitHubError {
    #[inline]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
        }
    }

    /// Seconds the caller should wait before retrying, if rate limited.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_seconds,
            } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    /// The remote HTTP status, for API errors only.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<RepositoryError> for GitHubError {
    fn from(err: RepositoryError) -> Self {
        Self::unclassified(format!("Error fetching or saving repositories: {err}"))
    }
}
