//! # AYNIA API Backend
//!
//! Rust backend for the AYNIA anime catalog. The crate exposes a small REST
//! API over two relational entities (users, anime) backed by a SQL database.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types shared across layers
//! - [`db`]: Repository pattern and persistence backends
//! - [`services`]: Business logic sitting between handlers and repositories
//! - [`http`]: The request router, handlers, and axum host wiring
//!
//! Requests flow through a hand-rolled path-pattern router
//! ([`http::router::Router`]) rather than the host framework's routing:
//! routes are registered once at startup, matched in registration order,
//! and dispatched to async handlers that delegate to the service layer.

pub mod db;
pub mod http;
pub mod models;
pub mod services;
