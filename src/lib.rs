//! Suburb data proxy library.
//!
//! Forwards browser requests to the Microburbs report-generator API,
//! injecting the bearer token and sanitizing the JSON that comes back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sanitize;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResult};
