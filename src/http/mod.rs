//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (params, defaults, UpstreamRequest)
//!     → [upstream client forwards and classifies]
//!     → response.rs (always-200 JSON envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod landing;
pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequestId, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::Envelope;
pub use server::{AppState, HttpServer, StartupError};
