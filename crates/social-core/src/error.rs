//! Repository-level error types.

use thiserror::Error;

/// Errors raised by the persistence ports.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// Unique or primary key violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The row references a parent that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
}
