//! Path-pattern request router.
//!
//! The router owns an ordered registry of routes and dispatches each request
//! to the first registered route whose method and path shape match. It is the
//! only routing in the crate; the axum host forwards every request here
//! untouched.
//!
//! # Matching rules
//!
//! - Methods must match exactly; only the five registered methods
//!   (GET/POST/PUT/DELETE/PATCH) can ever match.
//! - Pattern and request path are split on `/`, discarding empty segments,
//!   so `/users`, `/users/` and `//users//` are the same shape.
//! - Segment counts must be equal; there are no wildcard or optional
//!   segments.
//! - A pattern segment starting with `:` binds the request segment under the
//!   name after the sentinel; any other segment must compare equal,
//!   case-sensitively.
//! - First registered match wins. No specificity scoring: a parameterized
//!   route registered before a literal one of the same shape shadows it.
//!
//! Patterns are not validated at registration. A bare `:` segment binds
//! under the empty name, and duplicate parameter names within one pattern
//! resolve last-binding-wins.
//!
//! # Outcomes
//!
//! Dispatch always produces a response: the matched handler's response, a
//! fixed 404 envelope when nothing matches, or a fixed 500 envelope when the
//! handler returns an error. Handler errors are logged but never echoed to
//! the client.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::{Request, Response, StatusCode};
use serde_json::json;

/// HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Maps an incoming request method onto the registered set. `http::Method`
    /// compares by exact string, so e.g. a lowercase extension method never
    /// aliases a registered one.
    fn from_request(method: &axum::http::Method) -> Option<Self> {
        match *method {
            axum::http::Method::GET => Some(Self::Get),
            axum::http::Method::POST => Some(Self::Post),
            axum::http::Method::PUT => Some(Self::Put),
            axum::http::Method::DELETE => Some(Self::Delete),
            axum::http::Method::PATCH => Some(Self::Patch),
            _ => None,
        }
    }
}

/// One token of a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Binds the request segment at this position under the given name.
    Param(String),
}

fn compile_pattern(pattern: &str) -> Vec<Segment> {
    split_segments(pattern)
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(segment.to_string()),
        })
        .collect()
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Parameter bindings extracted from one matched request path.
///
/// Values are the raw path segments; nothing is percent-decoded or parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }
}

/// Outcome of a handler. `Err` is collapsed by the router into the fixed 500
/// response.
pub type HandlerResult = anyhow::Result<Response<Body>>;

type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Caller-supplied logic for one route.
///
/// Implemented for any async closure taking the request and its extracted
/// path parameters.
pub trait RouteHandler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>, params: PathParams) -> HandlerFuture;
}

impl<F, Fut> RouteHandler for F
where
    F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: Request<Body>, params: PathParams) -> HandlerFuture {
        Box::pin(self(req, params))
    }
}

/// One registered endpoint: method, compiled pattern, handler.
struct Route {
    method: Method,
    pattern: Vec<Segment>,
    handler: Box<dyn RouteHandler>,
}

/// Ordered route registry with first-registered-first-matched dispatch.
///
/// Registration and serving are two phases: routes are appended while the
/// router is still exclusively owned, then the registry is frozen by sharing
/// the router (typically behind `Arc`), which is safe for unsynchronized
/// concurrent dispatch.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&mut self, method: Method, pattern: &str, handler: impl RouteHandler) {
        self.routes.push(Route {
            method,
            pattern: compile_pattern(pattern),
            handler: Box::new(handler),
        });
    }

    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Get, pattern, handler);
    }

    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Post, pattern, handler);
    }

    pub fn put<F, Fut>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Put, pattern, handler);
    }

    pub fn delete<F, Fut>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Delete, pattern, handler);
    }

    pub fn patch<F, Fut>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::Patch, pattern, handler);
    }

    fn match_route(
        &self,
        method: &axum::http::Method,
        path: &str,
    ) -> Option<(&Route, PathParams)> {
        let method = Method::from_request(method)?;
        let request_segments: Vec<&str> = split_segments(path).collect();

        'routes: for route in &self.routes {
            if route.method != method {
                continue;
            }
            if route.pattern.len() != request_segments.len() {
                continue;
            }

            let mut params = PathParams::default();
            for (pattern_segment, request_segment) in route.pattern.iter().zip(&request_segments) {
                match pattern_segment {
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*request_segment).to_string());
                    }
                    Segment::Literal(literal) if literal == request_segment => {}
                    Segment::Literal(_) => continue 'routes,
                }
            }

            return Some((route, params));
        }

        None
    }

    /// Match the request and run its handler, translating every outcome into
    /// a response. The query string plays no part in matching.
    pub async fn dispatch(&self, req: Request<Body>) -> Response<Body> {
        let (route, params) = match self.match_route(req.method(), req.uri().path()) {
            Some(matched) => matched,
            None => return failure(StatusCode::NOT_FOUND, "Not found"),
        };

        match route.handler.call(req, params).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(error = %error, "route handler failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// The two router-owned responses: 404 with "Not found" and 500 with
/// "Internal server error".
fn failure(status: StatusCode, message: &str) -> Response<Body> {
    let body = json!({ "success": false, "error": message });
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
