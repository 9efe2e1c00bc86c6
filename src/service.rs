//! Video lookup: validate → render → extract.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::extract::extract_video;
use crate::renderer::{RenderError, Renderer};
use crate::video::{InvalidCode, VideoCode, VideoRecord};

/// Lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    InvalidFormat(#[from] InvalidCode),

    #[error("no information found for video code: {0}")]
    NotFound(VideoCode),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Resolves video codes to records using a [`Renderer`].
#[derive(Clone)]
pub struct VideoService {
    renderer: Arc<dyn Renderer>,
    site: SiteConfig,
}

impl VideoService {
    pub fn new(renderer: Arc<dyn Renderer>, site: SiteConfig) -> Self {
        Self { renderer, site }
    }

    #[must_use]
    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    /// Look up one video. The code is validated before any network call.
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw_code: &str) -> Result<VideoRecord, LookupError> {
        let code = VideoCode::parse(raw_code)?;
        let url = self.site.video_url(code.as_str());

        info!(%code, renderer = self.renderer.name(), "Rendering video page");
        let html = self.renderer.render(&url).await.inspect_err(|e| {
            warn!(%code, error = %e, "Rendering failed");
        })?;

        match extract_video(&html, code.as_str(), &url, &self.site.title_suffix) {
            Some(record) => Ok(record),
            None => {
                info!(%code, "Video not found");
                Err(LookupError::NotFound(code))
            }
        }
    }
}
