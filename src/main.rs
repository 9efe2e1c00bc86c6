//! `jable-info` CLI - run the API server or query it one-shot

mod cmd;

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jable_info::Config;

#[derive(Parser)]
#[command(name = "jable-info")]
#[command(about = "Video metadata API backed by Browserless rendering")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/jable-info/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<IpAddr>,
    },

    /// Look up one video code and print its metadata as JSON
    Video {
        /// Video code, e.g. pppe-356
        code: String,
    },

    /// Check that the Browserless API key works
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            cmd::serve::cmd_serve(config).await?;
        }
        Commands::Video { code } => {
            cmd::video::cmd_video(&config, &code).await?;
        }
        Commands::Probe => {
            cmd::probe::cmd_probe(&config).await?;
        }
    }

    Ok(())
}
