//! Per-request scope.
//!
//! The router builds a fresh [`Scope`] for every dispatched request and
//! stores it in the request's typed extensions. Handlers read it back with
//! [`ScopeExt::scope`]. A request that never went through the router has no
//! scope at all, which is a different case from a scope with no params.

use axum::http::Request;

use crate::routing::matcher::Params;

/// Data the router hands to the matched handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Parameters captured from the route pattern.
    pub params: Params,
}

impl Scope {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Shorthand for `self.params.get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Attach `scope` to `req`, replacing any scope already present.
pub fn with_scope<B>(mut req: Request<B>, scope: Scope) -> Request<B> {
    req.extensions_mut().insert(scope);
    req
}

/// Read access to the scope attached by the router.
pub trait ScopeExt {
    fn scope(&self) -> Option<&Scope>;
}

impl<B> ScopeExt for Request<B> {
    fn scope(&self) -> Option<&Scope> {
        self.extensions().get::<Scope>()
    }
}
