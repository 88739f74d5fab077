//! Error surface shared by every repository backend.

use thiserror::Error;

/// Failures reported by the repository ports.
///
/// `Constraint` carries referential failures, e.g. a post written against a
/// category id that does not exist.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database unreachable: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violated: {0}")]
    Constraint(String),
}
