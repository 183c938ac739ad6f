//! JSON response envelope helpers.
//!
//! Every endpoint responds with the same `{success, data?, error?, message?}`
//! envelope. Handlers build success and domain-error responses here; the
//! router's own 404/500 bodies are produced by the router itself.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// The JSON envelope shared by every endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn envelope<T: Serialize>(status: StatusCode, data: T, message: Option<&str>) -> Response {
    let body = ApiResponse {
        success: true,
        data: Some(data),
        error: None,
        message: message.map(str::to_string),
    };
    (status, Json(body)).into_response()
}

/// 200 with data.
pub fn success<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, data, None)
}

/// 200 with data and a message.
pub fn success_with_message<T: Serialize>(data: T, message: &str) -> Response {
    envelope(StatusCode::OK, data, Some(message))
}

/// 201 with data and a message.
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
    envelope(StatusCode::CREATED, data, Some(message))
}

/// Failure envelope with an arbitrary status.
pub fn error(message: &str, status: StatusCode) -> Response {
    let body = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(message.to_string()),
        message: None,
    };
    (status, Json(body)).into_response()
}

pub fn bad_request(message: &str) -> Response {
    error(message, StatusCode::BAD_REQUEST)
}

pub fn not_found(message: &str) -> Response {
    error(message, StatusCode::NOT_FOUND)
}

pub fn server_error(message: &str) -> Response {
    error(message, StatusCode::INTERNAL_SERVER_ERROR)
}
