//! Handlers for the `/api/user` endpoints.

use axum::body::Body;
use axum::http::Request;

use super::{parse_json_body, service_error_response};
use crate::http::dto::{CreateUserRequest, UpdateUserRequest};
use crate::http::response;
use crate::http::router::{HandlerResult, PathParams};
use crate::http::state::AppState;
use crate::models::UserId;
use crate::services::users;

fn parse_user_id(params: &PathParams) -> Result<UserId, &'static str> {
    let raw = params.get("id").ok_or("User ID is required")?;
    raw.parse::<i32>()
        .map(UserId::new)
        .map_err(|_| "Invalid user ID")
}

/// GET /api/user
pub async fn list(state: AppState, _req: Request<Body>, _params: PathParams) -> HandlerResult {
    match users::list_users(state.repository.as_ref()).await {
        Ok(all) => Ok(response::success(all)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// GET /api/user/:id
pub async fn get_by_id(state: AppState, _req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_user_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    match users::get_user(state.repository.as_ref(), id).await {
        Ok(user) => Ok(response::success(user)),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// POST /api/user
pub async fn create(state: AppState, req: Request<Body>, _params: PathParams) -> HandlerResult {
    let payload: CreateUserRequest = match parse_json_body(req).await {
        Ok(payload) => payload,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match users::create_user(state.repository.as_ref(), payload.into()).await {
        Ok(user) => Ok(response::created(user, "User created successfully")),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// PUT /api/user/:id
pub async fn update(state: AppState, req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_user_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    let payload: UpdateUserRequest = match parse_json_body(req).await {
        Ok(payload) => payload,
        Err(message) => return Ok(response::bad_request(&message)),
    };

    match users::update_user(state.repository.as_ref(), id, payload.into()).await {
        Ok(user) => Ok(response::success_with_message(
            user,
            "User updated successfully",
        )),
        Err(error) => Ok(service_error_response(error)),
    }
}

/// DELETE /api/user/:id
pub async fn delete(state: AppState, _req: Request<Body>, params: PathParams) -> HandlerResult {
    let id = match parse_user_id(&params) {
        Ok(id) => id,
        Err(message) => return Ok(response::bad_request(message)),
    };

    match users::delete_user(state.repository.as_ref(), id).await {
        Ok(_) => Ok(response::success_with_message(
            serde_json::Value::Null,
            "User deleted successfully",
        )),
        Err(error) => Ok(service_error_response(error)),
    }
}
