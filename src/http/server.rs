//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic recovery)
//! - Bind server to listener and shut down gracefully

use axum::{routing::get, Router};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handlers;
use crate::http::landing::render_landing;
use crate::http::request::MakeRequestUuidV4;
use crate::http::response::panic_response;
use crate::lifecycle::shutdown_signal;
use crate::upstream::{ClientBuildError, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub config: Arc<ProxyConfig>,
    pub landing: Arc<String>,
}

/// Errors that prevent the server from being built.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("upstream client: {0}")]
    Upstream(#[from] ClientBuildError),

    #[error("landing page template: {0}")]
    Template(#[from] minijinja::Error),
}

/// HTTP server for the suburb proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let landing = Arc::new(render_landing(&config.catalog)?);
        let config = Arc::new(config);

        let state = AppState {
            upstream,
            config: config.clone(),
            landing,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route("/api/properties", get(handlers::properties))
            .route("/api/suburb/{endpoint}", get(handlers::suburb_data))
            .route("/api/property/{endpoint}", get(handlers::property_data))
            .route("/api/avm", get(handlers::avm))
            .route("/api/cma", get(handlers::cma))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::custom(panic_response)),
            )
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
