//! Diesel row types and conversions to the domain models.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{anime, users};
use crate::models::{Anime, AnimeChanges, AnimeId, NewAnime, NewUser, Season, User, UserChanges, UserId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<&NewUser> for NewUserRow {
    fn from(user: &NewUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl From<&UserChanges> for UserChangeset {
    fn from(changes: &UserChanges) -> Self {
        Self {
            username: changes.username.clone(),
            email: changes.email.clone(),
            password_hash: changes.password_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = anime)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnimeRow {
    pub id: i32,
    pub title_romaji: String,
    pub title_english: Option<String>,
    pub genres: Value,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    pub episodes: Option<i32>,
    pub average_score: Option<i32>,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnimeRow> for Anime {
    fn from(row: AnimeRow) -> Self {
        Self {
            id: AnimeId::new(row.id),
            title_romaji: row.title_romaji,
            title_english: row.title_english,
            genres: genres_from_json(&row.genres),
            // Rows with an unrecognized season value surface as seasonless.
            season: row.season.as_deref().and_then(Season::parse),
            season_year: row.season_year,
            episodes: row.episodes,
            average_score: row.average_score,
            popularity: row.popularity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = anime)]
pub struct NewAnimeRow {
    pub title_romaji: String,
    pub title_english: Option<String>,
    pub genres: Value,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    pub episodes: Option<i32>,
    pub average_score: Option<i32>,
    pub popularity: i32,
}

impl From<&NewAnime> for NewAnimeRow {
    fn from(anime: &NewAnime) -> Self {
        Self {
            title_romaji: anime.title_romaji.clone(),
            title_english: anime.title_english.clone(),
            genres: genres_to_json(&anime.genres),
            season: anime.season.map(|s| s.as_str().to_string()),
            season_year: anime.season_year,
            episodes: anime.episodes,
            average_score: anime.average_score,
            popularity: anime.popularity,
        }
    }
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = anime)]
pub struct AnimeChangeset {
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub genres: Option<Value>,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    pub episodes: Option<i32>,
    pub average_score: Option<i32>,
    pub popularity: Option<i32>,
}

impl From<&AnimeChanges> for AnimeChangeset {
    fn from(changes: &AnimeChanges) -> Self {
        Self {
            title_romaji: changes.title_romaji.clone(),
            title_english: changes.title_english.clone(),
            genres: changes.genres.as_deref().map(genres_to_json),
            season: changes.season.map(|s| s.as_str().to_string()),
            season_year: changes.season_year,
            episodes: changes.episodes,
            average_score: changes.average_score,
            popularity: changes.popularity,
        }
    }
}

pub fn genres_to_json(genres: &[String]) -> Value {
    Value::Array(genres.iter().cloned().map(Value::String).collect())
}

pub fn genres_from_json(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn genres_round_trip() {
        let genres = vec!["Action".to_string(), "Drama".to_string()];
        assert_eq!(genres_from_json(&genres_to_json(&genres)), genres);
    }

    #[test]
    fn non_string_genre_entries_are_dropped() {
        let value = json!(["Action", 3, null, "Drama"]);
        assert_eq!(genres_from_json(&value), vec!["Action", "Drama"]);
        assert!(genres_from_json(&json!({"not": "an array"})).is_empty());
    }
}
