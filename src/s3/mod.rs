//! S3 client module
//!
//! Builds the AWS SDK client used for uploads and knows how to spell the
//! canonical URL of a stored object.
//!
//! # Credentials
//!
//! Credentials come from a named profile (`AWS_PROFILE`, default `default`).
//! When `AWS_CONFIG_FILE` is configured, that file is read as the shared
//! credentials file in addition to the SDK's default locations.
//!
//! # Example
//!
//! ```no_run
//! use screenshot_uploader::s3::{self, S3ClientConfig};
//!
//! # async fn example() {
//! let config = S3ClientConfig {
//!     bucket: "shots".to_string(),
//!     region: "us-east-1".to_string(),
//!     endpoint: None,
//!     profile: "default".to_string(),
//!     credentials_file: None,
//! };
//!
//! let client = s3::connect(&config).await;
//! assert_eq!(config.object_url("ab12x.png"), "https://shots.s3.amazonaws.com/ab12x.png");
//! # let _ = client;
//! # }
//! ```

use crate::config::Config;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use std::path::PathBuf;

/// Region whose buckets use the legacy global endpoint
const GLOBAL_REGION: &str = "us-east-1";

/// S3 client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3ClientConfig {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint; objects are then addressed path-style
    pub endpoint: Option<String>,
    pub profile: String,
    pub credentials_file: Option<PathBuf>,
}

impl From<&Config> for S3ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            profile: config.profile.clone(),
            credentials_file: config.credentials_file.clone(),
        }
    }
}

impl S3ClientConfig {
    /// Get the endpoint URL
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.region == GLOBAL_REGION => "https://s3.amazonaws.com".to_string(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }

    /// Canonical URL of an object in the configured bucket.
    ///
    /// AWS endpoints use virtual-hosted style (`https://bucket.s3...`); a
    /// custom endpoint uses path style (`{endpoint}/{bucket}/{key}`).
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(_) => format!("{}/{}/{}", self.endpoint(), self.bucket, key),
            None => {
                let host = self.endpoint().replacen("https://", "", 1);
                format!("https://{}.{}/{}", self.bucket, host, key)
            }
        }
    }
}

/// Build an S3 client for the given configuration.
///
/// SDK retries are disabled; a failed upload is reported, not repeated.
#[tracing::instrument(
    name = "s3.connect",
    skip(config),
    fields(
        s3.bucket = %config.bucket,
        s3.region = %config.region,
        aws.profile = %config.profile
    )
)]
pub async fn connect(config: &S3ClientConfig) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .profile_name(&config.profile)
        .retry_config(RetryConfig::disabled());

    if let Some(path) = &config.credentials_file {
        let files = ProfileFiles::builder()
            .include_default_config_file(true)
            .include_default_credentials_file(true)
            .with_file(ProfileFileKind::Credentials, path)
            .build();
        loader = loader.profile_files(files);
    }

    let shared = loader.load().await;
    let mut builder = aws_sdk_s3::config::Builder::from(&shared);
    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    tracing::debug!(endpoint = %config.endpoint(), "S3 client ready");
    aws_sdk_s3::Client::from_conf(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_config(region: &str, endpoint: Option<&str>) -> S3ClientConfig {
        S3ClientConfig {
            bucket: "shots".into(),
            region: region.into(),
            endpoint: endpoint.map(String::from),
            profile: "default".into(),
            credentials_file: None,
        }
    }

    #[test]
    fn test_default_endpoint() {
        let config = client_config("us-west-2", None);
        assert_eq!(config.endpoint(), "https://s3.us-west-2.amazonaws.com");
    }

    #[test]
    fn test_custom_endpoint() {
        let config = client_config("us-east-1", Some("http://localhost:9000/"));
        assert_eq!(config.endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_object_url_global_region() {
        let config = client_config("us-east-1", None);
        assert_eq!(
            config.object_url("ab12x.png"),
            "https://shots.s3.amazonaws.com/ab12x.png"
        );
    }

    #[test]
    fn test_object_url_regional() {
        let config = client_config("eu-central-1", None);
        assert_eq!(
            config.object_url("ab12x.png"),
            "https://shots.s3.eu-central-1.amazonaws.com/ab12x.png"
        );
    }

    #[test]
    fn test_object_url_path_style() {
        let config = client_config("us-east-1", Some("http://localhost:9000"));
        assert_eq!(
            config.object_url("ab12x.png"),
            "http://localhost:9000/shots/ab12x.png"
        );
    }

    #[tokio::test]
    async fn test_connect_builds_client() {
        let config = client_config("us-east-1", Some("http://localhost:9000"));
        let client = connect(&config).await;
        assert_eq!(
            client.config().region().map(ToString::to_string),
            Some("us-east-1".to_string())
        );
    }
}
