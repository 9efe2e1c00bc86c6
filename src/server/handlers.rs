use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::envelope::{timestamp, Envelope, ErrorBody};
use super::error::ApiError;
use super::AppState;
use crate::renderer::ProbeReport;
use crate::video::VideoRecord;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Jable.tv Video Info API",
        "version": crate::VERSION,
        "endpoints": {
            "GET /": "API information",
            "GET /api/health": "Health check",
            "GET /api/test-browserless": "Test Browserless API key",
            "GET /api/video/:videoCode": "Get video information"
        },
        "examples": {
            "video": "/api/video/pppe-356",
            "test": "/api/test-browserless"
        }
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is healthy",
        "timestamp": timestamp(),
        "uptime": state.started.elapsed().as_secs_f64(),
    }))
}

/// Render a known page through the configured credential.
pub async fn test_browserless(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<ProbeReport>>, ApiError> {
    info!("Testing Browserless API key");
    let report = state.service.renderer().probe().await?;
    Ok(Json(
        Envelope::new(report).with_message("Browserless API key is valid"),
    ))
}

pub async fn video(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    code: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<VideoRecord>>, ApiError> {
    let Path(code) = code.map_err(|rejection| {
        debug!("Rejected video path {}: {rejection}", uri.path());
        ApiError::InvalidFormat {
            provided: raw_segment(&uri),
        }
    })?;
    info!(code = %code, "Processing video info request");
    let record = state.service.lookup(&code).await?;
    Ok(Json(Envelope::new(record).stamped()))
}

/// Last path segment as sent, for echoing undecodable codes back.
fn raw_segment(uri: &Uri) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Terminal handler for panics inside request handling.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Unhandled error: {detail}");

    let body = ErrorBody {
        success: false,
        error: "Internal server error".to_string(),
        message: Some("An unexpected error occurred".to_string()),
        details: None,
        provided: None,
        available_endpoints: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
