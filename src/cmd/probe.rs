use std::time::Instant;

use anyhow::Result;

use jable_info::renderer::browserless::PROBE_URL;
use jable_info::{BrowserlessRenderer, Config, Renderer};

pub async fn cmd_probe(config: &Config) -> Result<()> {
    let renderer = BrowserlessRenderer::new(config.browserless.clone())?;

    println!("🧪 Testing Browserless API key");
    println!("   Endpoint: {}", config.browserless.endpoint);
    println!("   Probe page: {PROBE_URL}");

    let start = Instant::now();
    let report = renderer.probe().await?;
    let elapsed = start.elapsed();

    println!("\n✅ Browserless API key is valid");
    match report.status {
        Some(status) => println!("   Navigation status: {status}"),
        None => println!("   Navigation status: unknown"),
    }
    println!("   HTML: {} bytes", report.html_length);
    println!("   Time: {:.0}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
