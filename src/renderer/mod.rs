//! Remote page rendering.
//!
//! Pages are rendered by a headless browser service rather than fetched
//! directly, so client-side content is present in the returned HTML.
//!
//! # Architecture
//!
//! - [`Renderer`]: Async trait for "navigate and capture HTML"
//! - [`BrowserlessRenderer`]: Browserless BQL implementation
//! - [`RenderError`]: Failure kinds the HTTP layer maps to status codes
//!
//! # Example
//!
//! ```rust,no_run
//! use jable_info::config::BrowserlessConfig;
//! use jable_info::renderer::{BrowserlessRenderer, Renderer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let renderer = BrowserlessRenderer::new(BrowserlessConfig::default())?;
//! let html = renderer.render("https://jable.tv/videos/pppe-356/").await?;
//! println!("Rendered {} bytes", html.len());
//! # Ok(())
//! # }
//! ```

pub mod browserless;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use browserless::BrowserlessRenderer;

/// Rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Browserless API key not configured")]
    NotConfigured,

    #[error("invalid Browserless endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid Browserless API key")]
    Auth { details: String },

    #[error("Browserless account limit exceeded")]
    Quota { details: String },

    #[error("Browserless API error ({status})")]
    Upstream { status: u16, details: String },

    #[error("BQL query failed: {0}")]
    Query(String),

    #[error("cannot connect to Browserless service: {0}")]
    Network(String),

    #[error("Browserless request timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("no HTML content received")]
    EmptyResponse,

    #[error("unexpected Browserless response: {0}")]
    Decode(String),
}

impl RenderError {
    /// Upstream response body, when the service answered with an error.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Auth { details } | Self::Quota { details } | Self::Upstream { details, .. } => {
                Some(details.as_str())
            }
            Self::Query(errors) => Some(errors.as_str()),
            _ => None,
        }
    }
}

/// Result of a credential probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// HTTP status of the probe navigation, as seen by the headless browser.
    pub status: Option<u16>,
    /// Length of the captured HTML in UTF-16 code units.
    pub html_length: usize,
}

/// Renders a URL in a remote headless browser.
///
/// One attempt per call; callers decide what to do with failures.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Provider name for logs (e.g., `"browserless"`).
    fn name(&self) -> &'static str;

    /// Navigate to `url` and return the rendered HTML.
    async fn render(&self, url: &str) -> Result<String, RenderError>;

    /// Render a known-good page to check that the credential works.
    async fn probe(&self) -> Result<ProbeReport, RenderError>;
}
