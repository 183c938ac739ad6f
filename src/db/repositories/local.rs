//! In-memory repository implementation.
//!
//! Backs the API with plain vectors behind `parking_lot` locks. Used for
//! unit tests and local development where a real database would be overkill.
//! Query semantics (ordering, caps, matching rules) mirror the Postgres
//! backend so tests against this backend are meaningful.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::db::repository::{
    AnimeRepository, FullRepository, RepositoryResult, UserRepository,
};
use crate::models::{
    Anime, AnimeChanges, AnimeId, NewAnime, NewUser, Season, User, UserChanges, UserId,
};

/// Cap applied to title searches, matching the Postgres backend.
const SEARCH_RESULT_CAP: usize = 20;

/// In-memory implementation of [`FullRepository`].
#[derive(Debug, Default)]
pub struct LocalRepository {
    users: RwLock<Vec<User>>,
    anime: RwLock<Vec<Anime>>,
    next_user_id: AtomicI32,
    next_anime_id: AtomicI32,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_user_id(&self) -> UserId {
        UserId::new(self.next_user_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn next_anime_id(&self) -> AnimeId {
        AnimeId::new(self.next_anime_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.read().clone())
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let now = Utc::now();
        let stored = User {
            id: self.next_user_id(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        self.users.write().push(stored.clone());
        Ok(stored)
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> RepositoryResult<Option<User>> {
        let mut users = self.users.write();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(ref username) = changes.username {
            user.username = username.clone();
        }
        if let Some(ref email) = changes.email {
            user.email = email.clone();
        }
        if let Some(ref password_hash) = changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let mut users = self.users.write();
        let position = users.iter().position(|u| u.id == id);
        Ok(position.map(|idx| users.remove(idx)))
    }
}

#[async_trait]
impl AnimeRepository for LocalRepository {
    async fn list_anime(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Anime>> {
        let mut entries = self.anime.read().clone();
        entries.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        Ok(entries
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>> {
        Ok(self.anime.read().iter().find(|a| a.id == id).cloned())
    }

    async fn search_anime_by_title(&self, title: &str) -> RepositoryResult<Vec<Anime>> {
        let needle = title.to_lowercase();
        Ok(self
            .anime
            .read()
            .iter()
            .filter(|a| {
                a.title_romaji.to_lowercase().contains(&needle)
                    || a.title_english
                        .as_ref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .take(SEARCH_RESULT_CAP)
            .cloned()
            .collect())
    }

    async fn find_anime_by_genre(&self, genre: &str, limit: i64) -> RepositoryResult<Vec<Anime>> {
        let mut entries: Vec<Anime> = self
            .anime
            .read()
            .iter()
            .filter(|a| a.genres.iter().any(|g| g == genre))
            .cloned()
            .collect();
        // None sorts after every score under descending order.
        entries.sort_by(|a, b| b.average_score.cmp(&a.average_score));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn find_anime_by_season(
        &self,
        season: Season,
        year: i32,
    ) -> RepositoryResult<Vec<Anime>> {
        let mut entries: Vec<Anime> = self
            .anime
            .read()
            .iter()
            .filter(|a| a.season == Some(season) && a.season_year == Some(year))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        Ok(entries)
    }

    async fn create_anime(&self, anime: &NewAnime) -> RepositoryResult<Anime> {
        let now = Utc::now();
        let stored = Anime {
            id: self.next_anime_id(),
            title_romaji: anime.title_romaji.clone(),
            title_english: anime.title_english.clone(),
            genres: anime.genres.clone(),
            season: anime.season,
            season_year: anime.season_year,
            episodes: anime.episodes,
            average_score: anime.average_score,
            popularity: anime.popularity,
            created_at: now,
            updated_at: now,
        };
        self.anime.write().push(stored.clone());
        Ok(stored)
    }

    async fn update_anime(
        &self,
        id: AnimeId,
        changes: &AnimeChanges,
    ) -> RepositoryResult<Option<Anime>> {
        let mut entries = self.anime.write();
        let Some(entry) = entries.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(ref title_romaji) = changes.title_romaji {
            entry.title_romaji = title_romaji.clone();
        }
        if let Some(ref title_english) = changes.title_english {
            entry.title_english = Some(title_english.clone());
        }
        if let Some(ref genres) = changes.genres {
            entry.genres = genres.clone();
        }
        if let Some(season) = changes.season {
            entry.season = Some(season);
        }
        if let Some(season_year) = changes.season_year {
            entry.season_year = Some(season_year);
        }
        if let Some(episodes) = changes.episodes {
            entry.episodes = Some(episodes);
        }
        if let Some(average_score) = changes.average_score {
            entry.average_score = Some(average_score);
        }
        if let Some(popularity) = changes.popularity {
            entry.popularity = popularity;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete_anime(&self, id: AnimeId) -> RepositoryResult<Option<Anime>> {
        let mut entries = self.anime.write();
        let position = entries.iter().position(|a| a.id == id);
        Ok(position.map(|idx| entries.remove(idx)))
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_anime(title: &str, popularity: i32) -> NewAnime {
        NewAnime {
            title_romaji: title.to_string(),
            title_english: None,
            genres: vec![],
            season: None,
            season_year: None,
            episodes: None,
            average_score: None,
            popularity,
        }
    }

    #[tokio::test]
    async fn user_ids_are_sequential() {
        let repo = LocalRepository::new();
        let a = repo.create_user(&new_user("a", "a@x.io")).await.unwrap();
        let b = repo.create_user(&new_user("b", "b@x.io")).await.unwrap();
        assert_eq!(a.id.value(), 1);
        assert_eq!(b.id.value(), 2);
    }

    #[tokio::test]
    async fn update_user_applies_only_set_fields() {
        let repo = LocalRepository::new();
        let user = repo.create_user(&new_user("a", "a@x.io")).await.unwrap();

        let changes = UserChanges {
            email: Some("new@x.io".to_string()),
            ..Default::default()
        };
        let updated = repo.update_user(user.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.email, "new@x.io");
        assert_eq!(updated.username, "a");
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn delete_returns_removed_row() {
        let repo = LocalRepository::new();
        let user = repo.create_user(&new_user("a", "a@x.io")).await.unwrap();
        let removed = repo.delete_user(user.id).await.unwrap().unwrap();
        assert_eq!(removed.id, user.id);
        assert!(repo.delete_user(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_anime_orders_by_popularity_and_paginates() {
        let repo = LocalRepository::new();
        repo.create_anime(&new_anime("low", 10)).await.unwrap();
        repo.create_anime(&new_anime("high", 100)).await.unwrap();
        repo.create_anime(&new_anime("mid", 50)).await.unwrap();

        let page = repo.list_anime(2, 0).await.unwrap();
        let titles: Vec<&str> = page.iter().map(|a| a.title_romaji.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid"]);

        let rest = repo.list_anime(2, 2).await.unwrap();
        assert_eq!(rest[0].title_romaji, "low");
    }

    #[tokio::test]
    async fn search_matches_either_title_case_insensitively() {
        let repo = LocalRepository::new();
        let mut entry = new_anime("Shingeki no Kyojin", 1);
        entry.title_english = Some("Attack on Titan".to_string());
        repo.create_anime(&entry).await.unwrap();

        assert_eq!(repo.search_anime_by_title("kyojin").await.unwrap().len(), 1);
        assert_eq!(repo.search_anime_by_title("TITAN").await.unwrap().len(), 1);
        assert!(repo.search_anime_by_title("naruto").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn genre_filter_is_exact_membership() {
        let repo = LocalRepository::new();
        let mut entry = new_anime("a", 1);
        entry.genres = vec!["Action".to_string(), "Drama".to_string()];
        repo.create_anime(&entry).await.unwrap();

        assert_eq!(repo.find_anime_by_genre("Action", 50).await.unwrap().len(), 1);
        // Matching is exact, not case-insensitive.
        assert!(repo.find_anime_by_genre("action", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn season_filter_requires_both_season_and_year() {
        let repo = LocalRepository::new();
        let mut entry = new_anime("a", 1);
        entry.season = Some(Season::Winter);
        entry.season_year = Some(2024);
        repo.create_anime(&entry).await.unwrap();

        assert_eq!(
            repo.find_anime_by_season(Season::Winter, 2024).await.unwrap().len(),
            1
        );
        assert!(repo
            .find_anime_by_season(Season::Winter, 2023)
            .await
            .unwrap()
            .is_empty());
        assert!(repo
            .find_anime_by_season(Season::Fall, 2024)
            .await
            .unwrap()
            .is_empty());
    }
}
