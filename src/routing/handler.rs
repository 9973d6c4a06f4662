//! Type-erased request handlers.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

/// Something that turns a request into a response.
///
/// Implemented for every `Fn(Request<Body>) -> impl Future<Output = impl IntoResponse>`
/// closure or async fn that is `Send + Sync + 'static`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}

/// Shared, type-erased handler as stored in the route table.
pub type BoxHandler = Arc<dyn Handler>;

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let fut = (self)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Box a handler for storage in a route or a middleware chain.
pub fn boxed<H: Handler>(handler: H) -> BoxHandler {
    Arc::new(handler)
}
