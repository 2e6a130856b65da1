//! Upstream API forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds UpstreamRequest (sub-path, ordered query, request id)
//!     → client.rs (bearer token, timeout, GET)
//!     → classification (401 / error status / body)
//!     → sanitize (NaN, Infinity → null)
//!     → UpstreamResult<Value>
//! ```
//!
//! # Design Decisions
//! - Expected failures are values, not panics
//! - No retries and no caching: a failing call fails exactly one request
//! - The token lives in the client's default headers, never in the descriptor

pub mod client;
pub mod error;
pub mod request;

pub use client::{ClientBuildError, UpstreamClient};
pub use error::{FailureKind, UpstreamError, UpstreamResult};
pub use request::UpstreamRequest;
