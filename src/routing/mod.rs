//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (single-threaded, by value):
//!     router.handle / use_middleware / group
//!     → prefix joined, pattern normalized
//!     → handler wrapped in current middleware chain
//!     → upsert into ordered route table
//!     → table frozen behind Arc
//!
//! Incoming Request (method, escaped path)
//!     → router.rs (scan routes in order)
//!     → matcher.rs (segment match + percent-decoding)
//!     → scope.rs (params attached to request)
//!     → matched handler, or 400 / 404 / 405
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex or wildcards (literal and `:name` segments only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod handler;
pub mod matcher;
pub mod middleware;
pub mod router;
pub mod scope;

pub use handler::{boxed, BoxHandler, Handler};
pub use matcher::{match_path, MatchError, Params};
pub use middleware::{chain, compose, from_fn, Middleware};
pub use router::{Route, Router};
pub use scope::{with_scope, Scope, ScopeExt};
