//! Service configuration.
//!
//! Built from defaults, an optional TOML file (`~/.config/jable-info/config.toml`
//! or an explicit path) and environment overrides. The resulting [`Config`] is
//! passed explicitly into the renderer and the router.
//!
//! ```toml
//! [server]
//! port = 3000
//!
//! [browserless]
//! endpoint = "https://production-sfo.browserless.io"
//! api_key = "..."
//! navigation_timeout_ms = 15000
//!
//! [site]
//! base_url = "https://jable.tv"
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BROWSERLESS_ENDPOINT: &str = "https://production-sfo.browserless.io";
pub const DEFAULT_BASE_URL: &str = "https://jable.tv";
pub const DEFAULT_TITLE_SUFFIX: &str = " - Jable.tv";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub browserless: BrowserlessConfig,
    pub site: SiteConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Remote rendering service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserlessConfig {
    /// Base endpoint, without the `/chromium/bql` path.
    pub endpoint: String,
    /// Access token. `None` (or empty) means the renderer is not configured.
    pub api_key: Option<String>,
    /// Navigation and HTML capture timeout passed into the BQL query.
    pub navigation_timeout_ms: u64,
    /// Overall HTTP request timeout for one BQL call.
    pub request_timeout_ms: u64,
}

impl Default for BrowserlessConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BROWSERLESS_ENDPOINT.to_string(),
            api_key: None,
            navigation_timeout_ms: 15_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl BrowserlessConfig {
    /// The configured credential, if any. Blank keys count as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Target site settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Suffix stripped from `<title>` when the page header is missing.
    pub title_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
        }
    }
}

impl SiteConfig {
    /// Canonical page URL for a video code.
    #[must_use]
    pub fn video_url(&self, code: &str) -> String {
        format!("{}/videos/{code}/", self.base_url.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from `path` (or the default location if it exists),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = config_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT: {port}"))?;
        }
        if let Some(bind) = lookup("BIND_ADDR") {
            self.server.bind = bind
                .trim()
                .parse()
                .with_context(|| format!("invalid BIND_ADDR: {bind}"))?;
        }
        if let Some(endpoint) = lookup("BROWSERLESS_ENDPOINT") {
            self.browserless.endpoint = endpoint;
        }
        if let Some(key) = lookup("BROWSERLESS_API_KEY") {
            self.browserless.api_key = Some(key);
        }
        if let Some(ms) = lookup("BROWSERLESS_NAV_TIMEOUT_MS") {
            self.browserless.navigation_timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("invalid BROWSERLESS_NAV_TIMEOUT_MS: {ms}"))?;
        }
        if let Some(ms) = lookup("BROWSERLESS_TIMEOUT_MS") {
            self.browserless.request_timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("invalid BROWSERLESS_TIMEOUT_MS: {ms}"))?;
        }
        if let Some(base) = lookup("JABLE_BASE_URL") {
            self.site.base_url = base;
        }
        Ok(())
    }
}

/// Return the path to the default config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jable-info")
        .join("config.toml")
}
