//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution at startup
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Bool, Jsonb};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde_json::json;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    AnimeRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
use crate::models::{
    Anime, AnimeChanges, AnimeId, NewAnime, NewUser, Season, User, UserChanges, UserId,
};

mod models;
mod schema;

use models::{AnimeChangeset, AnimeRow, NewAnimeRow, NewUserRow, UserChangeset, UserRow};
use schema::{anime, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Upper bound on rows returned by a title search.
const SEARCH_RESULT_CAP: i64 = 20;

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            connection_timeout_sec: 30,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration("DATABASE_URL or PG_DATABASE_URL must be set")
            })?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            connection_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }
}

/// Postgres-backed implementation of [`FullRepository`].
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Build the connection pool and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("build_pool"),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("initial_connection"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures.
    ///
    /// The operation runs on the blocking thread pool; it is retried up to
    /// `max_retries` times with exponential backoff when a retryable error
    /// occurs (connection errors, pool timeouts).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

/// Translate a Diesel error into the repository error taxonomy.
fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error};

    match error {
        Error::NotFound => RepositoryError::not_found("Record not found"),
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::validation(info.message().to_string())
        }
        Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            RepositoryError::connection(info.message().to_string())
        }
        other => RepositoryError::query(other.to_string()),
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.with_conn(|conn| {
            users::table
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.with_conn(move |conn| {
            users::table
                .find(id.value())
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            users::table
                .filter(users::email.eq(&email))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            users::table
                .filter(users::username.eq(&username))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let row = NewUserRow::from(user);
        self.with_conn(move |conn| {
            diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .map(Into::into)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> RepositoryResult<Option<User>> {
        let changeset = UserChangeset::from(changes);
        self.with_conn(move |conn| {
            diesel::update(users::table.find(id.value()))
                .set((changeset.clone(), users::updated_at.eq(diesel::dsl::now)))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.with_conn(move |conn| {
            diesel::delete(users::table.find(id.value()))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl AnimeRepository for PostgresRepository {
    async fn list_anime(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Anime>> {
        self.with_conn(move |conn| {
            anime::table
                .order(anime::popularity.desc())
                .limit(limit)
                .offset(offset.max(0))
                .select(AnimeRow::as_select())
                .load::<AnimeRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>> {
        self.with_conn(move |conn| {
            anime::table
                .find(id.value())
                .select(AnimeRow::as_select())
                .first::<AnimeRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn search_anime_by_title(&self, title: &str) -> RepositoryResult<Vec<Anime>> {
        let pattern = format!("%{}%", title);
        self.with_conn(move |conn| {
            anime::table
                .filter(
                    anime::title_romaji
                        .ilike(pattern.clone())
                        .or(anime::title_english.ilike(pattern.clone())),
                )
                .limit(SEARCH_RESULT_CAP)
                .select(AnimeRow::as_select())
                .load::<AnimeRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_anime_by_genre(&self, genre: &str, limit: i64) -> RepositoryResult<Vec<Anime>> {
        let genre_json = json!([genre]);
        self.with_conn(move |conn| {
            anime::table
                .filter(sql::<Bool>("genres @> ").bind::<Jsonb, _>(genre_json.clone()))
                .order(anime::average_score.desc())
                .limit(limit)
                .select(AnimeRow::as_select())
                .load::<AnimeRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_anime_by_season(
        &self,
        season: Season,
        year: i32,
    ) -> RepositoryResult<Vec<Anime>> {
        self.with_conn(move |conn| {
            anime::table
                .filter(anime::season.eq(season.as_str()))
                .filter(anime::season_year.eq(year))
                .order(anime::popularity.desc())
                .select(AnimeRow::as_select())
                .load::<AnimeRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_anime(&self, new_anime: &NewAnime) -> RepositoryResult<Anime> {
        let row = NewAnimeRow::from(new_anime);
        self.with_conn(move |conn| {
            diesel::insert_into(anime::table)
                .values(&row)
                .returning(AnimeRow::as_returning())
                .get_result::<AnimeRow>(conn)
                .map(Into::into)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_anime(
        &self,
        id: AnimeId,
        changes: &AnimeChanges,
    ) -> RepositoryResult<Option<Anime>> {
        let changeset = AnimeChangeset::from(changes);
        self.with_conn(move |conn| {
            diesel::update(anime::table.find(id.value()))
                .set((changeset.clone(), anime::updated_at.eq(diesel::dsl::now)))
                .returning(AnimeRow::as_returning())
                .get_result::<AnimeRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>> {
        self.with_conn(move |conn| {
            diesel::delete(anime::table.find(id.value()))
                .returning(AnimeRow::as_returning())
                .get_result::<AnimeRow>(conn)
                .optional()
                .map(|row| row.map(Into::into))
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}
