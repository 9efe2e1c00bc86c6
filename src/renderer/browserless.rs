//! Browserless BQL client.
//!
//! Sends one BQL mutation per call to `{endpoint}/chromium/bql?token=...`:
//! navigate to the target, wait for the DOM, capture the HTML.
//!
//! - Navigation and capture share the configured navigation timeout
//! - The whole HTTP call is bounded by the request timeout
//! - No retries

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{ProbeReport, RenderError, Renderer};
use crate::config::BrowserlessConfig;

/// Page rendered by [`BrowserlessRenderer::probe`].
pub const PROBE_URL: &str = "https://httpbin.org/json";

const PROBE_HTML_TIMEOUT_MS: u64 = 10_000;

/// Renderer backed by the Browserless BQL API.
pub struct BrowserlessRenderer {
    client: Client,
    config: BrowserlessConfig,
}

impl BrowserlessRenderer {
    /// Create a renderer. A missing API key is not an error here; calls fail
    /// with [`RenderError::NotConfigured`] instead.
    pub fn new(config: BrowserlessConfig) -> Result<Self> {
        let client = Client::builder()
            // Keep connections to the BQL endpoint alive between requests
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn bql_url(&self, token: &str) -> Result<Url, RenderError> {
        let base = format!("{}/chromium/bql", self.config.endpoint.trim_end_matches('/'));
        let mut url =
            Url::parse(&base).map_err(|e| RenderError::InvalidEndpoint(format!("{base}: {e}")))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    /// Run one BQL mutation and return its `data` object.
    async fn execute(&self, query: &str, variables: Value) -> Result<BqlData, RenderError> {
        let token = self.config.api_key().ok_or(RenderError::NotConfigured)?;
        debug!("Using Browserless key {}...", key_prefix(token));

        let url = self.bql_url(token)?;
        let body = BqlRequest { query, variables };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(&e, self.config.request_timeout()))?;

        let status = response.status();
        info!(status = %status, "Browserless response received");

        if !status.is_success() {
            let details = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error body: {e}");
                String::new()
            });
            return Err(status_error(status, details));
        }

        let parsed: BqlResponse = response
            .json()
            .await
            .map_err(|e| RenderError::Decode(e.to_string()))?;

        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let errors = Value::Array(errors).to_string();
            warn!("BQL query returned errors: {errors}");
            return Err(RenderError::Query(errors));
        }

        parsed
            .data
            .ok_or_else(|| RenderError::Decode("response has no `data` object".to_string()))
    }
}

#[async_trait]
impl Renderer for BrowserlessRenderer {
    fn name(&self) -> &'static str {
        "browserless"
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let query = render_query(self.config.navigation_timeout());
        let data = self.execute(&query, json!({ "url": url })).await?;

        if let Some(status) = data.goto.as_ref().and_then(|g| g.status) {
            debug!(status, "Navigation finished");
        }

        data.html
            .and_then(|h| h.html)
            .filter(|h| !h.is_empty())
            .ok_or(RenderError::EmptyResponse)
    }

    #[instrument(skip(self))]
    async fn probe(&self) -> Result<ProbeReport, RenderError> {
        let query = probe_query();
        let data = self.execute(&query, json!({ "url": PROBE_URL })).await?;

        Ok(ProbeReport {
            status: data.goto.and_then(|g| g.status),
            html_length: data
                .html
                .and_then(|h| h.html)
                .map_or(0, |h| h.encode_utf16().count()),
        })
    }
}

/// BQL mutation that navigates to `$url` and captures visible HTML.
fn render_query(timeout: Duration) -> String {
    let timeout_ms = timeout.as_millis();
    format!(
        "mutation RenderPage($url: String!) {{\n  \
           goto(url: $url, waitUntil: domContentLoaded, timeout: {timeout_ms}) {{ status }}\n  \
           html(timeout: {timeout_ms}, visible: true) {{ html }}\n\
         }}"
    )
}

fn probe_query() -> String {
    format!(
        "mutation TestConnection($url: String!) {{\n  \
           goto(url: $url) {{ status }}\n  \
           html(timeout: {PROBE_HTML_TIMEOUT_MS}) {{ html }}\n\
         }}"
    )
}

fn status_error(status: StatusCode, details: String) -> RenderError {
    match status {
        StatusCode::UNAUTHORIZED => RenderError::Auth { details },
        StatusCode::PAYMENT_REQUIRED => RenderError::Quota { details },
        other => RenderError::Upstream {
            status: other.as_u16(),
            details,
        },
    }
}

/// Connect failures (refused, DNS, connect timeout) are `Network`; a timeout
/// after the connection was accepted is `Timeout`.
fn network_error(err: &reqwest::Error, timeout: Duration) -> RenderError {
    if err.is_timeout() && !err.is_connect() {
        RenderError::Timeout {
            ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        RenderError::Network(err.to_string())
    }
}

/// First characters of the credential, safe to log.
fn key_prefix(key: &str) -> String {
    key.chars().take(8).collect()
}

// ============================================================================
// BQL wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct BqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct BqlResponse {
    data: Option<BqlData>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct BqlData {
    goto: Option<GotoResult>,
    html: Option<HtmlResult>,
}

#[derive(Debug, Deserialize)]
struct GotoResult {
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct HtmlResult {
    html: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TARGET: &str = "https://jable.tv/videos/abc-123/";

    fn config(endpoint: &str, key: Option<&str>) -> BrowserlessConfig {
        BrowserlessConfig {
            endpoint: endpoint.to_string(),
            api_key: key.map(str::to_string),
            ..BrowserlessConfig::default()
        }
    }

    fn renderer_for(server: &MockServer) -> BrowserlessRenderer {
        BrowserlessRenderer::new(config(&server.uri(), Some("secret-token"))).unwrap()
    }

    async fn mount(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/chromium/bql"))
            .and(query_param("token", "secret-token"))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn render_query_carries_timeouts() {
        let query = render_query(Duration::from_millis(15_000));
        assert!(query.contains("goto(url: $url, waitUntil: domContentLoaded, timeout: 15000)"));
        assert!(query.contains("html(timeout: 15000, visible: true)"));
    }

    #[test]
    fn key_prefix_is_char_safe() {
        assert_eq!(key_prefix("abcdefghijkl"), "abcdefgh");
        assert_eq!(key_prefix("短い"), "短い");
    }

    #[tokio::test]
    async fn render_returns_html() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chromium/bql"))
            .and(query_param("token", "secret-token"))
            .and(body_partial_json(json!({ "variables": { "url": TARGET } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "goto": { "status": 200 }, "html": { "html": "<html>ok</html>" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let html = renderer_for(&server).render(TARGET).await.unwrap();
        assert_eq!(html, "<html>ok</html>");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(401).set_body_string("Bad token")).await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        assert_eq!(
            err,
            RenderError::Auth {
                details: "Bad token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn payment_required_maps_to_quota() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(402)).await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        assert!(matches!(err, RenderError::Quota { .. }));
    }

    #[tokio::test]
    async fn other_status_maps_to_upstream() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(503).set_body_string("overloaded")).await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        assert_eq!(
            err,
            RenderError::Upstream {
                status: 503,
                details: "overloaded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn bql_errors_map_to_query() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Timed out waiting for selector" }]
            })),
        )
        .await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        match err {
            RenderError::Query(errors) => assert!(errors.contains("Timed out")),
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_html_is_empty_response() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": { "goto": { "status": 200 }, "html": { "html": null } }
            })),
        )
        .await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        assert_eq!(err, RenderError::EmptyResponse);
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = renderer_for(&server).render(TARGET).await.unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let renderer = BrowserlessRenderer::new(config(&server.uri(), None)).unwrap();
        assert_eq!(renderer.render(TARGET).await.unwrap_err(), RenderError::NotConfigured);
        assert_eq!(renderer.probe().await.unwrap_err(), RenderError::NotConfigured);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let renderer =
            BrowserlessRenderer::new(config(&format!("http://{addr}"), Some("secret-token")))
                .unwrap();
        let err = renderer.render(TARGET).await.unwrap_err();
        assert!(matches!(err, RenderError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_response_is_timeout_not_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chromium/bql"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let renderer = BrowserlessRenderer::new(BrowserlessConfig {
            request_timeout_ms: 200,
            ..config(&server.uri(), Some("secret-token"))
        })
        .unwrap();
        let err = renderer.render(TARGET).await.unwrap_err();
        assert_eq!(err, RenderError::Timeout { ms: 200 });
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported() {
        let renderer = BrowserlessRenderer::new(config("not a url", Some("k"))).unwrap();
        let err = renderer.render(TARGET).await.unwrap_err();
        assert!(matches!(err, RenderError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn probe_reports_status_and_length() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chromium/bql"))
            .and(body_partial_json(json!({ "variables": { "url": PROBE_URL } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "goto": { "status": 200 }, "html": { "html": "0123456789" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = renderer_for(&server).probe().await.unwrap();
        assert_eq!(
            report,
            ProbeReport {
                status: Some(200),
                html_length: 10
            }
        );
    }

    #[tokio::test]
    async fn probe_length_counts_utf16_units() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": { "goto": { "status": 200 }, "html": { "html": "愛花😀" } }
            })),
        )
        .await;

        let report = renderer_for(&server).probe().await.unwrap();
        assert_eq!(report.html_length, 4);
    }

    #[tokio::test]
    async fn probe_tolerates_empty_html() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "goto": null, "html": null } })),
        )
        .await;

        let report = renderer_for(&server).probe().await.unwrap();
        assert_eq!(report.status, None);
        assert_eq!(report.html_length, 0);
    }
}
