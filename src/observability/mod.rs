//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields everywhere, never preformatted strings
//! - Request ID flows into every access-log line
//! - Metric updates are cheap; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
