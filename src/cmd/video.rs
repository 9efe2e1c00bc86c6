use anyhow::Result;

use jable_info::Config;

pub async fn cmd_video(config: &Config, code: &str) -> Result<()> {
    let service = super::build_service(config)?;
    let record = service.lookup(code).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
