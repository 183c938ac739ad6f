//! HTTP server module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Host transport (axum + tower-http layers)                │
//! │  - TCP serving, CORS, compression, request tracing        │
//! │  - Forwards every request to the router via fallback      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Router (router.rs)                                       │
//! │  - Ordered registry, path-pattern matching                │
//! │  - Parameter extraction, 404/500 translation              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Handlers (handlers/) → Services → Repository             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! axum performs no routing here; its fallback hands every request to
//! [`router::Router::dispatch`], which owns matching and error translation.

pub mod dto;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

pub use router::{PathParams, Router};
pub use routes::setup_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the serveable application: the route registry wrapped in the host
/// transport layers.
pub fn create_app(state: AppState) -> axum::Router {
    // Permissive CORS: the API serves every origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Arc::new(setup_routes(state));

    axum::Router::new()
        .fallback(move |req: Request<Body>| {
            let router = Arc::clone(&router);
            async move { router.dispatch(req).await }
        })
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
