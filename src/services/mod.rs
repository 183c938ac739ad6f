//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits. They
//! own validation rules (uniqueness checks, season validation, search input
//! checks) and translate missing rows into not-found errors; handlers map
//! [`ServiceError`] variants onto HTTP status codes.

pub mod anime;
pub mod users;

#[cfg(all(test, feature = "local-repo"))]
#[path = "anime_tests.rs"]
mod anime_tests;

use crate::db::repository::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was well-formed HTTP but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// The storage backend failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
