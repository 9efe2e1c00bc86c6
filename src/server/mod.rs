//! HTTP API.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | service description |
//! | `GET /api/health` | liveness |
//! | `GET /api/test-browserless` | credential probe |
//! | `GET /api/video/{code}` | video metadata |
//!
//! Anything else, including other methods on these paths, gets a JSON 404
//! listing the available endpoints.

pub mod envelope;
pub mod error;
mod handlers;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::{header, HeaderName, Method};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::service::VideoService;

/// State shared by all handlers.
pub struct AppState {
    pub service: VideoService,
    pub started: Instant,
}

impl AppState {
    pub fn new(service: VideoService) -> Self {
        Self {
            service,
            started: Instant::now(),
        }
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/test-browserless", get(handlers::test_browserless))
        .route("/api/video/{code}", get(handlers::video))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Bind `config`'s address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let app = router(state);
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Jable API server listening on http://{addr}");
    info!("Health check: http://{addr}/api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
