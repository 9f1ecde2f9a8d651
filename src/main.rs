//! Screenshot Uploader - upload new screenshots to S3 and copy the link
//!
//! Runs in the background until interrupted.

use anyhow::Context;
use clap::Parser;
use screenshot_uploader::config::{Config, ConfigLoader};
use screenshot_uploader::delivery::DesktopDelivery;
use screenshot_uploader::pipeline::Pipeline;
use screenshot_uploader::s3::S3ClientConfig;
use screenshot_uploader::upload::S3Uploader;
use screenshot_uploader::watch::{EventSource, DEFAULT_QUEUE_CAPACITY};
use screenshot_uploader::{telemetry, VERSION};
use std::path::PathBuf;
use tracing::info;

/// Screenshot Uploader - watch a directory and share new screenshots via S3
#[derive(Parser, Debug)]
#[command(name = "screenshot-uploader")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file [default: ~/.screenshot-uploader]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    telemetry::init_subscriber(&args.log_level)?;

    info!("Starting Screenshot Uploader v{}", VERSION);

    // Load configuration
    let path = match args.config {
        Some(path) => path,
        None => ConfigLoader::default_path()?,
    };
    let config = Config::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    info!("Loaded configuration from {:?}", path);

    let source = EventSource::watch(&config.watch_directory, DEFAULT_QUEUE_CAPACITY)
        .context("Failed to start watching the screenshot directory")?;

    let uploader = S3Uploader::connect(S3ClientConfig::from(&config)).await;
    let delivery = DesktopDelivery::new(config.notification_title.clone());
    let pipeline = Pipeline::new(&config, uploader, delivery);

    tokio::select! {
        _ = pipeline.run(source) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutting down");
        }
    }

    Ok(())
}
