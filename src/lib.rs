//! Screenshot Uploader Library
//!
//! Watches a directory for new screenshots and screen recordings, uploads
//! each one to S3 under a short random key, and hands the resulting link to
//! the user through the clipboard and a desktop notification.
//!
//! # Features
//!
//! - **Private keys**: Objects are stored as `xxxxx.ext`, never under the local file name
//! - **Public links**: Uploads are `public-read` with the right content type
//! - **Custom hosts**: Links can point at a CDN or vanity domain instead of S3
//! - **Fault isolated**: A failed upload is logged; watching continues
//!
//! # Example
//!
//! ```no_run
//! use screenshot_uploader::{
//!     config::Config, delivery::DesktopDelivery, pipeline::Pipeline, s3::S3ClientConfig,
//!     upload::S3Uploader, watch::EventSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("/home/me/.screenshot-uploader")?;
//!     let source = EventSource::watch(&config.watch_directory, 256)?;
//!     let uploader = S3Uploader::connect(S3ClientConfig::from(&config)).await;
//!     let delivery = DesktopDelivery::new(config.notification_title.clone());
//!     Pipeline::new(&config, uploader, delivery).run(source).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod delivery;
pub mod pipeline;
pub mod resolve;
pub mod s3;
pub mod telemetry;
pub mod upload;
pub mod watch;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Outcome, Pipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
