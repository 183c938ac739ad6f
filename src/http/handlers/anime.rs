//! Handlers for the `/api/anime` endpoints.

use axum::body::Body;
use axum::http::Request;

use super::{parse_json_body, parse_query, service_error_response};
use crate::http::dto::{CreateAnimeRequest, GenreQuery, PageQuery, SearchQuery, UpdateAnimeRequest};
use crate::http::response;
use crate::http::router::{HandlerResult, PathParams};
use crate::http::state::AppState;
use crate::models::AnimeId;
use crate::services::anime;

fn parse_anime_id(params: &PathParams) -> Result<AnimeId, &'static str> {
    let raw = params.get("id").ok_or("Anime ID is required")?;
    raw.parse::<i32>()
        .map(AnimeId::new)
        .map_err(|_| "Invalid anime ID")
}

/// GET /api/anime?page=&limit=
pub async fn list(state: AppState, req: Request<Body>, _params: PathParams) -> HandlerResult {
    let query: PageQuery = match parse_query(req.uri()) {
        Ok(query) => query,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match anime::list_anime(state.repository.as_ref(), query.page, query.limit).await {
        Ok(entries) => Ok(response::success(entries)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// GET /api/anime/search?title=
pub async fn search(state: AppState, req: Request<Body>, _params: PathParams) -> HandlerResult {
    let query: SearchQuery = match parse_query(req.uri()) {
        Ok(query) => query,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    let Some(title) = query.title else {
        return Ok(response::bad_request("Title query parameter is required"));
    };

    match anime::search_anime(state.repository.as_ref(), &title).await {
        Ok(entries) => Ok(response::success(entries)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// GET /api/anime/genre/:genre?limit=
pub async fn by_genre(state: AppState, req: Request<Body>, params: PathParams) -> HandlerResult {
    let Some(genre) = params.get("genre") else {
        return Ok(response::bad_request("Genre is required"));
    };

    let query: GenreQuery = match parse_query(req.uri()) {
        Ok(query) => query,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match anime::anime_by_genre(state.repository.as_ref(), genre, query.limit).await {
        Ok(entries) => Ok(response::success(entries)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// GET /api/anime/season/:season/:year
pub async fn by_season(state: AppState, _req: Request<Body>, params: PathParams) -> HandlerResult {
    let (Some(season), Some(year)) = (params.get("season"), params.get("year")) else {
        return Ok(response::bad_request("Season and year are required"));
    };

    let Ok(year) = year.parse::<i32>() else {
        return Ok(response::bad_request("Invalid year"));
    };

    match anime::anime_by_season(state.repository.as_ref(), season, year).await {
        Ok(entries) => Ok(response::success(entries)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// GET /api/anime/:id
pub async fn get_by_id(state: AppState, _req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_anime_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    match anime::get_anime(state.repository.as_ref(), id).await {
        Ok(entry) => Ok(response::success(entry)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// POST /api/anime
pub async fn create(state: AppState, req: Request<Body>, _params: PathParams) -> HandlerResult {
    let payload: CreateAnimeRequest = match parse_json_body(req).await {
        Ok(payload) => payload,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match anime::create_anime(state.repository.as_ref(), payload).await {
        Ok(entry) => Ok(response::created(entry, "Anime created successfully")),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// PUT /api/anime/:id
pub async fn update(state: AppState, req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_anime_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    let payload: UpdateAnimeRequest = match parse_json_body(req).await {
        Ok(payload) => payload,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match anime::update_anime(state.repository.as_ref(), id, payload).await {
        Ok(entry) => Ok(response::success_with_message(
            entry,
            "Anime updated successfully",
        )),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// DELETE /api/anime/:id
pub async fn delete(state: AppState, _req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_anime_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    match anime::delete_anime(state.repository.as_ref(), id).await {
        Ok(_) => Ok(response::success_with_message(
            serde_json::Value::Null,
            "Anime deleted successfully",
        )),
        Err(error) => Ok(service_error_response(error)),
    }
}
