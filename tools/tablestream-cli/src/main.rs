//! TableStream process harness.
//!
//! Supervises a stream-producing run: parses the configuration, installs
//! interrupt handling, and enforces a stop timeout on shutdown.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use tablestream::Config;

mod harness;

#[derive(Parser)]
#[command(name = "tablestream")]
#[command(about = "Process harness for TableStream producers")]
struct Args {
    /// Configuration directory
    #[arg(long)]
    config: PathBuf,

    /// Seconds to wait for the run to stop after an interrupt
    #[arg(long, default_value_t = 5)]
    stop_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tablestream=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::new(args.config);

    harness::start(Duration::from_secs(args.stop_timeout), move |cancel| async move {
        harness::run_all(vec![Box::pin(run_config(config, cancel))]).await
    })
    .await
}

/// Placeholder service: validate the configuration, then idle until
/// cancelled or the warm-up window elapses. Stream-producing services
/// hang their run loops here.
async fn run_config(config: Config, mut cancel: watch::Receiver<bool>) -> Result<()> {
    config.validate()?;
    info!(dir = %config.dir().display(), "configuration loaded");

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(5)) => {}
        _ = cancel.changed() => {}
    }
    Ok(())
}
