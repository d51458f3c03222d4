use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur during repository store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Invalid input data.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
