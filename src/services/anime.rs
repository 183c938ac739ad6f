//! Anime catalog business logic.

use crate::db::repository::FullRepository;
use crate::models::{Anime, AnimeChanges, AnimeId, NewAnime, Season};
use crate::services::{ServiceError, ServiceResult};

/// One page of entries. `page` is 1-based; out-of-range values clamp to the
/// first page, and a negative `limit` clamps to zero. The offset saturates
/// so extreme query values cannot overflow.
pub async fn list_anime(
    repo: &dyn FullRepository,
    page: i64,
    limit: i64,
) -> ServiceResult<Vec<Anime>> {
    let limit = limit.max(0);
    let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
    Ok(repo.list_anime(limit, offset).await?)
}

pub async fn get_anime(repo: &dyn FullRepository, id: AnimeId) -> ServiceResult<Anime> {
    repo.get_anime(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Anime not found".to_string()))
}

pub async fn search_anime(repo: &dyn FullRepository, title: &str) -> ServiceResult<Vec<Anime>> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Search title is required".to_string(),
        ));
    }
    Ok(repo.search_anime_by_title(title).await?)
}

pub async fn anime_by_genre(
    repo: &dyn FullRepository,
    genre: &str,
    limit: i64,
) -> ServiceResult<Vec<Anime>> {
    if genre.trim().is_empty() {
        return Err(ServiceError::Validation("Genre is required".to_string()));
    }
    Ok(repo.find_anime_by_genre(genre, limit.max(0)).await?)
}

/// Entries for a broadcast season. The season name is accepted in any case
/// and validated against the four known values.
pub async fn anime_by_season(
    repo: &dyn FullRepository,
    season: &str,
    year: i32,
) -> ServiceResult<Vec<Anime>> {
    let season = Season::parse(season).ok_or_else(|| {
        ServiceError::Validation(
            "Invalid season. Must be one of: WINTER, SPRING, SUMMER, FALL".to_string(),
        )
    })?;
    Ok(repo.find_anime_by_season(season, year).await?)
}

pub async fn create_anime(repo: &dyn FullRepository, anime: NewAnime) -> ServiceResult<Anime> {
    Ok(repo.create_anime(&anime).await?)
}

pub async fn update_anime(
    repo: &dyn FullRepository,
    id: AnimeId,
    changes: AnimeChanges,
) -> ServiceResult<Anime> {
    repo.update_anime(id, &changes)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Anime not found".to_string()))
}

pub async fn delete_anime(repo: &dyn FullRepository, id: AnimeId) -> ServiceResult<Anime> {
    repo.delete_anime(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Anime not found".to_string()))
}
