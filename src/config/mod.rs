//! Configuration module for Screenshot Uploader
//!
//! Configuration is a dotenv-style file (by default `~/.screenshot-uploader`)
//! read once at startup. Values already present in the process environment
//! take precedence over the file. The resulting [`Config`] is immutable and is
//! handed by reference to every component that needs it.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Profile used when `AWS_PROFILE` is not set
pub const DEFAULT_PROFILE: &str = "default";

/// Title of the desktop notification when `NOTIFICATION_TITLE` is not set
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Screenshot Uploaded!";

/// Upload deadline when `UPLOAD_TIMEOUT_SECS` is not set
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Could not determine the home directory")]
    NoHomeDirectory,
}

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Destination bucket (`S3_BUCKET`)
    pub bucket: String,
    /// Storage region (`AWS_REGION`)
    pub region: String,
    /// Host that replaces the storage location in advertised links (`S3_HOST`)
    pub custom_host: Option<String>,
    /// Named credential profile (`AWS_PROFILE`)
    pub profile: String,
    /// Shared credentials file (`AWS_CONFIG_FILE`)
    pub credentials_file: Option<PathBuf>,
    /// Directory watched for new files (`SCREENSHOT_LOCATION`)
    pub watch_directory: PathBuf,
    /// S3-compatible endpoint, addressed path-style (`S3_ENDPOINT`)
    pub endpoint: Option<String>,
    /// Deadline for a single upload (`UPLOAD_TIMEOUT_SECS`)
    pub upload_timeout: Duration,
    /// Also upload on modification events (`UPLOAD_ON_MODIFY`)
    pub upload_on_modify: bool,
    /// Desktop notification title (`NOTIFICATION_TITLE`)
    pub notification_title: String,
}

impl Config {
    /// Load configuration from a dotenv file, overlaid by the process environment
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Build a configuration from a key lookup.
    ///
    /// Empty values are treated as unset, matching how dotenv files are
    /// usually written (`S3_HOST=`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingKey(key));

        let upload_timeout = match get("UPLOAD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: "UPLOAD_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        };

        let upload_on_modify = match get("UPLOAD_ON_MODIFY") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: "UPLOAD_ON_MODIFY",
                value: raw,
            })?,
            None => false,
        };

        let config = Self {
            bucket: require("S3_BUCKET")?,
            region: require("AWS_REGION")?,
            custom_host: get("S3_HOST"),
            profile: get("AWS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            credentials_file: get("AWS_CONFIG_FILE").map(|p| expand_home(&p)),
            watch_directory: expand_home(&require("SCREENSHOT_LOCATION")?),
            endpoint: get("S3_ENDPOINT"),
            upload_timeout,
            upload_on_modify,
            notification_title: get("NOTIFICATION_TITLE")
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "UPLOAD_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        if let Some(ref endpoint) = self.endpoint {
            if !is_valid_http_url(endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid S3_ENDPOINT '{}': must start with http:// or https://",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    }
}
