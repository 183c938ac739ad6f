//! Repository trait definitions.
//!
//! These traits are the abstract interface between the service layer and the
//! storage backends. Implementations must be `Send + Sync` so a single
//! instance can be shared behind `Arc` across concurrent requests.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{
    Anime, AnimeChanges, AnimeId, NewAnime, NewUser, Season, User, UserChanges, UserId,
};

/// Repository operations over the `users` table.
///
/// Lookup methods return `Ok(None)` for missing rows; translating absence
/// into an error is the service layer's job.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    async fn get_user(&self, id: UserId) -> RepositoryResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;

    /// Applies the non-`None` fields of `changes` and bumps `updated_at`.
    /// Returns the updated row, or `None` if the id does not exist.
    async fn update_user(&self, id: UserId, changes: &UserChanges)
        -> RepositoryResult<Option<User>>;

    /// Deletes the row and returns it, or `None` if the id does not exist.
    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>>;
}

/// Repository operations over the `anime` table.
#[async_trait]
pub trait AnimeRepository: Send + Sync {
    /// One page of entries, ordered by popularity descending.
    async fn list_anime(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Anime>>;

    async fn get_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>>;

    /// Case-insensitive substring match against either title, capped at 20
    /// rows.
    async fn search_anime_by_title(&self, title: &str) -> RepositoryResult<Vec<Anime>>;

    /// Entries whose genre list contains `genre` exactly, ordered by average
    /// score descending.
    async fn find_anime_by_genre(&self, genre: &str, limit: i64) -> RepositoryResult<Vec<Anime>>;

    /// Entries airing in the given season and year, ordered by popularity
    /// descending.
    async fn find_anime_by_season(
        &self,
        season: Season,
        year: i32,
    ) -> RepositoryResult<Vec<Anime>>;

    async fn create_anime(&self, anime: &NewAnime) -> RepositoryResult<Anime>;

    async fn update_anime(
        &self,
        id: AnimeId,
        changes: &AnimeChanges,
    ) -> RepositoryResult<Option<Anime>>;

    async fn delete_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>>;
}

/// Umbrella trait implemented by every storage backend.
#[async_trait]
pub trait FullRepository: UserRepository + AnimeRepository {
    /// Verifies the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
