//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT / Ctrl+C → resolve the server's shutdown future
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber's receiver fires → axum drains and exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
