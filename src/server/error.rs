//! HTTP error mapping.
//!
//! [`ApiError`] owns the status code table. Lookup failures convert via
//! `From<LookupError>`; credential probe failures via `From<RenderError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::envelope::ErrorBody;
use crate::renderer::RenderError;
use crate::service::LookupError;

/// Endpoints listed in 404 responses.
pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /api/health",
    "GET /api/test-browserless",
    "GET /api/video/:videoCode",
];

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid video code format")]
    InvalidFormat { provided: String },

    #[error("Video not found")]
    NotFound { code: String },

    #[error("Browserless API key not configured")]
    NotConfigured,

    #[error("Invalid Browserless API key")]
    Auth { details: String },

    #[error("Browserless account limit exceeded")]
    Quota { details: String },

    #[error("Cannot connect to Browserless service")]
    Unreachable { reason: String },

    #[error("Browserless API error ({status})")]
    Upstream { status: u16, details: String },

    #[error("Unexpected response from Browserless")]
    UnexpectedProbe { reason: String },

    #[error("Internal server error")]
    ProbeFailed { reason: String },

    #[error("Route not found")]
    RouteNotFound { method: String, path: String },

    #[error("Internal server error")]
    Internal { reason: String },
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFormat { .. } | Self::NotConfigured => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Auth { .. } => StatusCode::UNAUTHORIZED,
            Self::Quota { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Unreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. }
            | Self::UnexpectedProbe { .. }
            | Self::ProbeFailed { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing explanation. Never includes internal error text for
    /// [`ApiError::Internal`].
    fn public_message(&self) -> Option<String> {
        let message = match self {
            Self::InvalidFormat { .. } => {
                "Video code should match pattern: LETTERS-NUMBERS (e.g., pppe-356)".to_string()
            }
            Self::NotFound { code } => format!("No information found for video code: {code}"),
            Self::NotConfigured => "Please set BROWSERLESS_API_KEY environment variable".to_string(),
            Self::Auth { .. } => {
                "Please check your BROWSERLESS_API_KEY environment variable".to_string()
            }
            Self::Quota { .. } => {
                "Your Browserless account has exceeded its usage limits".to_string()
            }
            Self::Unreachable { .. } => "Network connectivity issue".to_string(),
            Self::UnexpectedProbe { reason } | Self::ProbeFailed { reason } => reason.clone(),
            Self::RouteNotFound { method, path } => {
                format!("The requested endpoint {method} {path} does not exist")
            }
            Self::Internal { .. } => "An error occurred while processing your request".to_string(),
            Self::Upstream { .. } => return None,
        };
        Some(message)
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Auth { details } | Self::Quota { details } | Self::Upstream { details, .. }
                if !details.is_empty() =>
            {
                Some(details.clone())
            }
            _ => None,
        }
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.to_string(),
            message: self.public_message(),
            details: self.details(),
            provided: match self {
                Self::InvalidFormat { provided } => Some(provided.clone()),
                _ => None,
            },
            available_endpoints: match self {
                Self::RouteNotFound { .. } => Some(AVAILABLE_ENDPOINTS),
                _ => None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal { reason }
            | Self::Unreachable { reason }
            | Self::UnexpectedProbe { reason }
            | Self::ProbeFailed { reason } => {
                tracing::error!(status = status.as_u16(), reason = %reason, "{}", self);
            }
            _ if status.is_server_error() => tracing::error!(status = status.as_u16(), "{}", self),
            _ => tracing::debug!(status = status.as_u16(), "{}", self),
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidFormat(code) => Self::InvalidFormat { provided: code.0 },
            LookupError::NotFound(code) => Self::NotFound {
                code: code.to_string(),
            },
            LookupError::Render(e) => Self::Internal {
                reason: e.to_string(),
            },
        }
    }
}

/// Credential probe mapping.
impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NotConfigured => Self::NotConfigured,
            RenderError::Auth { details } => Self::Auth { details },
            RenderError::Quota { details } => Self::Quota { details },
            RenderError::Network(reason) => Self::Unreachable { reason },
            timeout @ RenderError::Timeout { .. } => Self::ProbeFailed {
                reason: timeout.to_string(),
            },
            RenderError::Upstream { status, details } => Self::Upstream { status, details },
            other @ (RenderError::InvalidEndpoint(_)
            | RenderError::Query(_)
            | RenderError::EmptyResponse
            | RenderError::Decode(_)) => Self::UnexpectedProbe {
                reason: other.to_string(),
            },
        }
    }
}
