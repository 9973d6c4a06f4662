//! Middleware for the routing core.
//!
//! Each middleware here is a [`crate::routing::Middleware`], attached to a
//! router or group with `use_middleware` and applied to routes registered
//! after it.

pub mod logging;

pub use logging::logging;
