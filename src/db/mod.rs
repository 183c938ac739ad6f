//! Database module for user and anime storage.
//!
//! This module provides abstractions for database operations via the
//! Repository pattern, allowing different storage backends to be swapped
//! easily:
//!
//! - `repository`: Trait definitions and the repository error type
//! - `repositories::local`: In-memory implementation for unit testing and
//!   local development
//! - `repositories::postgres`: PostgreSQL implementation with Diesel ORM
//! - `factory`: Backend selection from the environment

// Feature flag guard: at least one backend must be compiled in.
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{create_repository, RepositoryKind};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresConfig, PostgresRepository};
pub use repository::{
    AnimeRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
