//! Request handlers for the REST API.
//!
//! Handlers parse the request themselves (path parameters, query string,
//! JSON body), delegate to the service layer, and build envelope responses.
//! Domain errors become 400/404/500 envelopes here; only unexpected failures
//! are returned as `Err`, which the router collapses into its fixed 500.

pub mod anime;
pub mod users;

use axum::body::Body;
use axum::http::{Request, Uri};
use axum::response::Response;
use serde::de::DeserializeOwned;

use crate::http::response;
use crate::http::router::{HandlerResult, PathParams};
use crate::http::state::AppState;
use crate::services::ServiceError;

/// Upper bound on accepted request bodies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Map a service error onto its failure envelope and status code.
fn service_error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::Validation(message) => response::bad_request(&message),
        ServiceError::NotFound(message) => response::not_found(&message),
        ServiceError::Repository(error) => response::server_error(&error.to_string()),
    }
}

/// Read and deserialize a JSON request body.
///
/// Failures are reported as a message for a 400 envelope; a bad body is a
/// client error, not a handler failure.
async fn parse_json_body<T: DeserializeOwned>(req: Request<Body>) -> Result<T, String> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| format!("Failed to read request body: {e}"))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("Invalid JSON body: {e}"))
}

/// Parse query parameters off the request URI.
fn parse_query<T: DeserializeOwned>(uri: &Uri) -> Result<T, String> {
    match axum::extract::Query::<T>::try_from_uri(uri) {
        Ok(axum::extract::Query(query)) => Ok(query),
        Err(rejection) => Err(format!("Invalid query parameters: {rejection}")),
    }
}

/// GET /
///
/// API info and endpoint index.
pub async fn api_info(_state: AppState, _req: Request<Body>, _params: PathParams) -> HandlerResult {
    Ok(response::success(serde_json::json!({
        "message": "AYNIA API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/user",
            "anime": "/api/anime",
        }
    })))
}

/// GET /health
///
/// Health check endpoint to verify the service is running and the database
/// is accessible.
pub async fn health(state: AppState, _req: Request<Body>, _params: PathParams) -> HandlerResult {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(response::success(crate::http::dto::HealthResponse {
        status: "ok".to_string(),
        database,
    }))
}
