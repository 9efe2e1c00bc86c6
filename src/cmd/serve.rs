use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use jable_info::server::{self, AppState};
use jable_info::Config;

pub async fn cmd_serve(config: Config) -> Result<()> {
    if config.browserless.api_key().is_none() {
        warn!("BROWSERLESS_API_KEY is not set; video lookups will fail until it is configured");
    }

    let service = super::build_service(&config)?;
    let state = Arc::new(AppState::new(service));
    server::serve(&config.server, state).await
}
