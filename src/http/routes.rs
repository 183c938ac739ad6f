//! Route table for the REST API.
//!
//! Registration order is load-bearing: the router matches first-registered
//! first, so `/api/anime/search` and `/api/anime/season/:season/:year` must
//! precede `/api/anime/:id`.

use crate::http::handlers;
use crate::http::router::Router;
use crate::http::state::AppState;

/// Binds an `(AppState, request, params)` handler into the router's
/// `(request, params)` shape.
macro_rules! with_state {
    ($state:expr, $handler:path) => {{
        let state = $state.clone();
        move |req, params| $handler(state.clone(), req, params)
    }};
}

/// Build the full route registry for the API.
pub fn setup_routes(state: AppState) -> Router {
    let mut router = Router::new();

    router.get("/", with_state!(state, handlers::api_info));
    router.get("/health", with_state!(state, handlers::health));

    router.get("/api/user", with_state!(state, handlers::users::list));
    router.get("/api/user/:id", with_state!(state, handlers::users::get_by_id));
    router.post("/api/user", with_state!(state, handlers::users::create));
    router.put("/api/user/:id", with_state!(state, handlers::users::update));
    router.delete("/api/user/:id", with_state!(state, handlers::users::delete));

    router.get("/api/anime", with_state!(state, handlers::anime::list));
    router.get("/api/anime/search", with_state!(state, handlers::anime::search));
    router.get("/api/anime/genre/:genre", with_state!(state, handlers::anime::by_genre));
    router.get(
        "/api/anime/season/:season/:year",
        with_state!(state, handlers::anime::by_season),
    );
    router.get("/api/anime/:id", with_state!(state, handlers::anime::get_by_id));
    router.post("/api/anime", with_state!(state, handlers::anime::create));
    router.put("/api/anime/:id", with_state!(state, handlers::anime::update));
    router.delete("/api/anime/:id", with_state!(state, handlers::anime::delete));

    router
}
