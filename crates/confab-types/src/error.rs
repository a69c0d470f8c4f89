use thiserror::Error;

/// Errors from repository operations (used by trait definitions in confab-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by conversation operations.
///
/// `Forbidden` is deliberately uniform: a conversation that does not exist
/// and a conversation owned by another user produce the same error, so
/// callers cannot probe for conversation existence.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("access to conversation denied")]
    Forbidden,

    #[error("invalid message: {0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
