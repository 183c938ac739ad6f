//! Repository backend selection.
//!
//! Chooses a storage backend from the environment and hands back a shared
//! [`FullRepository`] instance. The repository is constructed once at startup
//! and passed explicitly to the HTTP layer.

use std::sync::Arc;

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Which storage backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    /// In-memory backend (`local-repo` feature).
    Local,
    /// PostgreSQL backend (`postgres-repo` feature).
    Postgres,
}

impl RepositoryKind {
    /// Select a backend from the environment.
    ///
    /// `REPOSITORY_KIND` (`local` / `postgres`) wins if set; otherwise the
    /// presence of `DATABASE_URL` selects Postgres, falling back to the
    /// in-memory backend.
    pub fn from_env() -> Self {
        match std::env::var("REPOSITORY_KIND").ok().as_deref() {
            Some("postgres") => Self::Postgres,
            Some(_) => Self::Local,
            None if std::env::var("DATABASE_URL").is_ok() => Self::Postgres,
            None => Self::Local,
        }
    }
}

/// Construct the requested backend.
///
/// Returns a configuration error if the matching feature was not compiled in.
pub fn create_repository(kind: RepositoryKind) -> RepositoryResult<Arc<dyn FullRepository>> {
    match kind {
        RepositoryKind::Local => create_local(),
        RepositoryKind::Postgres => create_postgres(),
    }
}

#[cfg(feature = "local-repo")]
fn create_local() -> RepositoryResult<Arc<dyn FullRepository>> {
    Ok(Arc::new(crate::db::repositories::LocalRepository::new()))
}

#[cfg(not(feature = "local-repo"))]
fn create_local() -> RepositoryResult<Arc<dyn FullRepository>> {
    Err(RepositoryError::configuration(
        "local repository requested but the local-repo feature is not enabled",
    ))
}

#[cfg(feature = "postgres-repo")]
fn create_postgres() -> RepositoryResult<Arc<dyn FullRepository>> {
    let config = crate::db::repositories::PostgresConfig::from_env()?;
    Ok(Arc::new(crate::db::repositories::PostgresRepository::new(
        config,
    )?))
}

#[cfg(not(feature = "postgres-repo"))]
fn create_postgres() -> RepositoryResult<Arc<dyn FullRepository>> {
    Err(RepositoryError::configuration(
        "postgres repository requested but the postgres-repo feature is not enabled",
    ))
}
