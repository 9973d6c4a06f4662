//! Middleware composition.
//!
//! A middleware maps a handler to a wrapped handler. Lists are applied so
//! that the first entry is the outermost wrapper: it sees the request first
//! and the response last.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;

use crate::routing::handler::{boxed, BoxHandler};

/// A handler transformation.
pub type Middleware = Arc<dyn Fn(BoxHandler) -> BoxHandler + Send + Sync>;

/// Wrap `handler` with every middleware in `middleware`, first = outermost.
pub fn chain(middleware: &[Middleware], handler: BoxHandler) -> BoxHandler {
    middleware
        .iter()
        .rev()
        .fold(handler, |inner, mw| mw(inner))
}

/// Fold a list of middleware into a single middleware with the same ordering.
pub fn compose(middleware: Vec<Middleware>) -> Middleware {
    Arc::new(move |handler| chain(&middleware, handler))
}

/// Build a middleware from an async function receiving the request and the next handler.
///
/// ```
/// use todo_api::routing::middleware::from_fn;
///
/// let passthrough = from_fn(|req, next: todo_api::routing::BoxHandler| async move {
///     next.call(req).await
/// });
/// # let _ = passthrough;
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> Middleware
where
    F: Fn(Request<Body>, BoxHandler) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    let f = Arc::new(f);
    Arc::new(move |next: BoxHandler| {
        let f = f.clone();
        boxed(move |req: Request<Body>| f(req, next.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::response::Response;
    use std::sync::Mutex;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn recording(name: &'static str, trace: Trace) -> Middleware {
        from_fn(move |req, next: BoxHandler| {
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push(format!("{name}:in"));
                let res = next.call(req).await;
                trace.lock().unwrap().push(format!("{name}:out"));
                res
            }
        })
    }

    fn endpoint(trace: Trace) -> BoxHandler {
        boxed(move |_req: Request<Body>| {
            let trace = trace.clone();
            async move {
                trace.lock().unwrap().push("handler".to_string());
                "done"
            }
        })
    }

    #[tokio::test]
    async fn test_first_middleware_is_outermost() {
        let trace: Trace = Arc::default();
        let mws = vec![recording("a", trace.clone()), recording("b", trace.clone())];

        let h = chain(&mws, endpoint(trace.clone()));
        h.call(Request::new(Body::empty())).await;

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["a:in", "b:in", "handler", "b:out", "a:out"]
        );
    }

    #[tokio::test]
    async fn test_compose_is_associative() {
        let flat_trace: Trace = Arc::default();
        let flat = chain(
            &[
                recording("a", flat_trace.clone()),
                recording("b", flat_trace.clone()),
                recording("c", flat_trace.clone()),
            ],
            endpoint(flat_trace.clone()),
        );
        flat.call(Request::new(Body::empty())).await;

        let nested_trace: Trace = Arc::default();
        let nested = chain(
            &[
                recording("a", nested_trace.clone()),
                compose(vec![
                    recording("b", nested_trace.clone()),
                    recording("c", nested_trace.clone()),
                ]),
            ],
            endpoint(nested_trace.clone()),
        );
        nested.call(Request::new(Body::empty())).await;

        assert_eq!(*flat_trace.lock().unwrap(), *nested_trace.lock().unwrap());
    }

    #[tokio::test]
    async fn test_empty_chain_returns_handler() {
        let trace: Trace = Arc::default();
        let h = chain(&[], endpoint(trace.clone()));
        h.call(Request::new(Body::empty())).await;
        assert_eq!(*trace.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_middleware_can_edit_response() {
        let tag = from_fn(|req, next: BoxHandler| async move {
            let mut res: Response = next.call(req).await;
            res.headers_mut().insert("x-tag", HeaderValue::from_static("1"));
            res
        });
        let h = chain(&[tag], boxed(|_req: Request<Body>| async { "ok" }));
        let res = h.call(Request::new(Body::empty())).await;
        assert_eq!(res.headers()["x-tag"], "1");
    }
}
