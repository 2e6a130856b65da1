//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, upstream client:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (upstream counters and latency histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
