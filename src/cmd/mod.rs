pub mod probe;
pub mod serve;
pub mod video;

use std::sync::Arc;

use anyhow::Result;

use jable_info::{BrowserlessRenderer, Config, VideoService};

/// Wire the Browserless renderer into a lookup service.
fn build_service(config: &Config) -> Result<VideoService> {
    let renderer = BrowserlessRenderer::new(config.browserless.clone())?;
    Ok(VideoService::new(Arc::new(renderer), config.site.clone()))
}
