//! Route table construction and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order, keyed by (method, normalized pattern)
//! - Compose prefixes and middleware through nested groups
//! - Dispatch a request to the first route matching path and method
//! - Answer 400 / 404 / 405 when nothing handles the request
//!
//! # Design Decisions
//! - Built once at startup by value, then shared read-only (no locks)
//! - Middleware is applied when a route is registered, not per request
//! - First full match wins; path-only matches are collected for `Allow`
//! - O(n) scan over routes (acceptable for a flat resource hierarchy)

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use axum::response::{IntoResponse, Response};

use crate::http::response::ApiError;
use crate::routing::handler::{boxed, BoxHandler, Handler};
use crate::routing::matcher::match_path;
use crate::routing::middleware::{chain, Middleware};
use crate::routing::scope::{with_scope, Scope};

/// A registered route.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    handler: BoxHandler,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Normalized pattern, always starting with `/`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Ordered route table with group support.
///
/// ```
/// use axum::body::Body;
/// use axum::http::{Method, Request};
/// use todo_api::routing::Router;
///
/// let mut router = Router::new();
/// router.group("/api/v1", |api| {
///     api.group("todos", |todos| {
///         todos.handle(Method::GET, "", |_req: Request<Body>| async { "list" });
///         todos.handle(Method::GET, ":id", |_req: Request<Body>| async { "one" });
///     });
/// });
///
/// let patterns: Vec<&str> = router.routes().map(|r| r.pattern()).collect();
/// assert_eq!(patterns, ["/api/v1/todos", "/api/v1/todos/:id"]);
/// ```
#[derive(Default, Clone)]
pub struct Router {
    routes: Vec<Route>,
    base_path: String,
    middleware: Vec<Middleware>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `pattern`.
    ///
    /// The pattern is joined to the router's base path and normalized. The
    /// handler is wrapped with the middleware accumulated so far. A route with
    /// the same method and normalized pattern is replaced in place.
    pub fn handle<H: Handler>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        let method = normalize_method(method);
        let pattern = join_path(&self.base_path, pattern);
        let handler = chain(&self.middleware, boxed(handler));

        let existing = self
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.pattern == pattern);

        match existing {
            Some(route) => {
                tracing::debug!(method = %method, pattern = %pattern, "Route replaced");
                route.handler = handler;
            }
            None => {
                tracing::debug!(method = %method, pattern = %pattern, "Route registered");
                self.routes.push(Route {
                    method,
                    pattern,
                    handler,
                });
            }
        }
        self
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.handle(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.handle(Method::POST, pattern, handler)
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Append middleware for routes registered from now on.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Register routes under `prefix`.
    ///
    /// The child starts with this router's routes, the joined base path and a
    /// copy of the current middleware list. Whatever the child registers ends
    /// up in this router once `build` returns; middleware it adds stays local.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut Router),
    {
        let mut child = Router {
            routes: std::mem::take(&mut self.routes),
            base_path: join_path(&self.base_path, prefix),
            middleware: self.middleware.clone(),
        };
        build(&mut child);
        self.routes = child.routes;
        self
    }

    /// Registered routes in dispatch order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route `req` to its handler.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        let path = req.uri().path().to_owned();
        let mut allow: Vec<&Method> = Vec::new();

        for route in &self.routes {
            let params = match match_path(&route.pattern, &path) {
                Ok(Some(params)) => params,
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!(
                        path = %path,
                        pattern = %route.pattern,
                        error = %err,
                        "Rejected request path"
                    );
                    return ApiError::bad_request(err.to_string()).into_response();
                }
            };

            if req.method() != route.method {
                allow.push(&route.method);
                continue;
            }

            let req = with_scope(req, Scope::new(params));
            return route.handler.call(req).await;
        }

        if allow.is_empty() {
            return ApiError::not_found().into_response();
        }

        let allow = allow
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut res = ApiError::method_not_allowed().into_response();
        if let Ok(value) = HeaderValue::from_str(&allow) {
            res.headers_mut().insert(header::ALLOW, value);
        }
        res
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("base_path", &self.base_path)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// Uppercase method names so `get` and `GET` share a route key.
fn normalize_method(method: Method) -> Method {
    let upper = method.as_str().trim().to_ascii_uppercase();
    if upper == method.as_str() {
        return method;
    }
    Method::from_bytes(upper.as_bytes()).unwrap_or(method)
}

/// Join two path fragments into canonical `/a/b` form (`/` for nothing).
fn join_path(base: &str, sub: &str) -> String {
    let base = base.trim().trim_matches('/');
    let sub = sub.trim().trim_matches('/');
    match (base.is_empty(), sub.is_empty()) {
        (true, _) => format!("/{sub}"),
        (false, true) => format!("/{base}"),
        (false, false) => format!("/{base}/{sub}"),
    }
}
