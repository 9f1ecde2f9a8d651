//! PutObject uploader
//!
//! Streams a local file to S3 in a single `PutObject` request with a
//! `public-read` ACL and the candidate's content type.
//!
//! # Example
//!
//! ```no_run
//! use screenshot_uploader::s3::S3ClientConfig;
//! use screenshot_uploader::upload::{S3Uploader, UploadCandidate, Uploader};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = S3ClientConfig {
//!     bucket: "shots".to_string(),
//!     region: "us-east-1".to_string(),
//!     endpoint: None,
//!     profile: "default".to_string(),
//!     credentials_file: None,
//! };
//! let uploader = S3Uploader::connect(config).await;
//!
//! let candidate = UploadCandidate {
//!     source_path: "/Users/me/Desktop/screenshot.png".into(),
//!     extension: "png".to_string(),
//!     mime_type: "image/png".to_string(),
//!     object_key: "ab12x.png".to_string(),
//! };
//! let receipt = uploader.upload(&candidate).await?;
//! println!("Uploaded to {}", receipt.location);
//! # Ok(())
//! # }
//! ```

use super::{UploadCandidate, UploadError, UploadReceipt, Uploader};
use crate::s3::{self, S3ClientConfig};
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::time::Instant;

/// S3 error codes that mean the caller lacks permission
const PERMISSION_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
    "AccessControlListNotSupported",
];

/// S3 error codes that point at bad or expired credentials
const CREDENTIAL_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
    "TokenRefreshRequired",
];

/// Uploads candidates to one S3 bucket
#[derive(Debug, Clone)]
pub struct S3Uploader {
    client: aws_sdk_s3::Client,
    config: S3ClientConfig,
}

impl S3Uploader {
    /// Build the SDK client from configuration and wrap it
    pub async fn connect(config: S3ClientConfig) -> Self {
        let client = s3::connect(&config).await;
        Self::with_client(client, config)
    }

    /// Create an uploader around an existing SDK client
    pub fn with_client(client: aws_sdk_s3::Client, config: S3ClientConfig) -> Self {
        Self { client, config }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    #[tracing::instrument(
        name = "s3.put_object",
        skip(self, candidate),
        fields(
            s3.bucket = %self.config.bucket,
            s3.key = %candidate.object_key,
            http.method = "PUT",
            http.content_type = %candidate.mime_type,
            upload.bytes = tracing::field::Empty
        ),
        err
    )]
    async fn upload(&self, candidate: &UploadCandidate) -> Result<UploadReceipt, UploadError> {
        let start_time = Instant::now();

        // The file handle lives inside the body and is released with it.
        let body = ByteStream::from_path(&candidate.source_path)
            .await
            .map_err(|e| UploadError::Read {
                path: candidate.source_path.clone(),
                message: e.to_string(),
            })?;
        if let Some(len) = body.size_hint().1 {
            tracing::Span::current().record("upload.bytes", len);
        }

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&candidate.object_key)
            .body(body)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(&candidate.mime_type)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&self.config.bucket, e))?;

        let location = self.config.object_url(&candidate.object_key);
        tracing::info!(
            location = %location,
            duration_ms = start_time.elapsed().as_millis(),
            "PutObject upload completed"
        );

        Ok(UploadReceipt {
            object_key: candidate.object_key.clone(),
            location,
        })
    }
}

/// Map an SDK failure onto the upload error taxonomy
fn classify_sdk_error<E, R>(bucket: &str, err: SdkError<E, R>) -> UploadError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    match err {
        SdkError::ServiceError(_) => match code.as_deref() {
            Some(c) if PERMISSION_CODES.contains(&c) => UploadError::PermissionDenied(message),
            Some("NoSuchBucket") => UploadError::BucketNotFound(bucket.to_string()),
            Some(c) if CREDENTIAL_CODES.contains(&c) => UploadError::Credentials(message),
            Some(c) => UploadError::Service {
                code: c.to_string(),
                message,
            },
            None => UploadError::Service {
                code: "Unknown".to_string(),
                message,
            },
        },
        // Identity resolution failures surface before dispatch, with no code.
        _ if message.to_ascii_lowercase().contains("credentials") => {
            UploadError::Credentials(message)
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            UploadError::Network(message)
        }
        _ => UploadError::Request(message),
    }
}
