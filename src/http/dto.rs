//! Request bodies and query parameters for the REST API.
//!
//! Responses reuse the domain models directly ([`crate::models::PublicUser`],
//! [`crate::models::Anime`]); only request-side shapes live here.

use serde::{Deserialize, Serialize};

use crate::models::{NewAnime, NewUser, UserChanges};

/// Body for `POST /api/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            password_hash: request.password_hash,
        }
    }
}

/// Body for `PUT /api/user/:id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            password_hash: request.password_hash,
        }
    }
}

/// Body for `POST /api/anime`. The season, when present, must be one of the
/// four uppercase season names.
pub type CreateAnimeRequest = NewAnime;

/// Body for `PUT /api/anime/:id`; absent fields are left untouched.
pub type UpdateAnimeRequest = crate::models::AnimeChanges;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

/// Query parameters for `GET /api/anime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Query parameters for `GET /api/anime/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
}

/// Query parameters for `GET /api/anime/genre/:genre`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for GenreQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

/// Payload for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_anime_request_defaults_optional_fields() {
        let request: CreateAnimeRequest =
            serde_json::from_str(r#"{"titleRomaji": "Yuru Camp"}"#).unwrap();
        assert_eq!(request.title_romaji, "Yuru Camp");
        assert!(request.genres.is_empty());
        assert_eq!(request.popularity, 0);
        assert_eq!(request.season, None);
    }

    #[test]
    fn create_anime_request_rejects_unknown_season() {
        let result = serde_json::from_str::<CreateAnimeRequest>(
            r#"{"titleRomaji": "x", "season": "MONSOON"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn page_query_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 50);
    }
}
