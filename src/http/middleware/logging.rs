//! Access logging.
//!
//! Emits one structured `info` event per request once the inner handler has
//! produced its response, and feeds the request metrics.

use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::http::{header, Request};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::{from_fn, BoxHandler, Middleware};

/// Access-log middleware.
pub fn logging() -> Middleware {
    from_fn(|req: Request<Body>, next: BoxHandler| async move {
        let start = Instant::now();

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let client_ip = req.client_ip();
        let request_id = req.request_id().unwrap_or("-").to_string();

        let res = next.call(req).await;

        let elapsed = start.elapsed();
        let status = res.status();
        let bytes = res.body().size_hint().exact();

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            bytes = ?bytes,
            elapsed = ?elapsed,
            user_agent = %user_agent,
            client_ip = %client_ip,
            "Request handled"
        );
        metrics::record_request(method.as_str(), status.as_u16(), elapsed);

        res
    })
}
