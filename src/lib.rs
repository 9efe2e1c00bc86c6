//! `jable-info` - video metadata over HTTP
//!
//! # Features
//!
//! - **Remote rendering**: pages are rendered by Browserless (BQL), so
//!   client-side content is present
//! - **Field extraction**: title, performers, tags, thumbnail, duration, views,
//!   description
//! - **HTTP API**: axum server with JSON envelopes and a credential probe
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use jable_info::{BrowserlessRenderer, Config, VideoService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let renderer = BrowserlessRenderer::new(config.browserless.clone())?;
//!     let service = VideoService::new(Arc::new(renderer), config.site.clone());
//!     let record = service.lookup("pppe-356").await?;
//!     println!("{:?}", record.title);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extract;
pub mod renderer;
pub mod server;
pub mod service;
pub mod video;

pub use config::Config;
pub use extract::{extract_video, segment_title, DocumentQuery, HtmlDocument, TitleSegments};
pub use renderer::{BrowserlessRenderer, ProbeReport, RenderError, Renderer};
pub use server::{router, AppState};
pub use service::{LookupError, VideoService};
pub use video::{InvalidCode, VideoCode, VideoRecord};

/// Version of jable-info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
