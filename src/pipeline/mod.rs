//! Watch-filter-upload pipeline
//!
//! A single consumer drains the [`EventSource`] and takes each relevant event
//! through classify → key → upload → resolve → deliver before looking at the
//! next one. Every observed event ends in exactly one [`Outcome`]:
//!
//! ```text
//! Observed ──► Rejected
//!    │
//!    └──► Candidate ──► Uploaded ──► Delivered
//!             │
//!             └──► Failed
//! ```
//!
//! Failures are reported and never retried; they do not stop the loop.

use crate::config::Config;
use crate::delivery::DeliverySink;
use crate::resolve::UrlResolver;
use crate::upload::{KeyGenerator, UploadCandidate, UploadError, Uploader};
use crate::watch::{Classifier, EventSource, FileEvent, Rejection, SourceItem};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Terminal state of one observed event
#[derive(Debug)]
pub enum Outcome {
    /// Dropped by the classifier; no key generated, nothing uploaded
    Rejected(Rejection),
    /// Uploaded and handed to the delivery sink
    Delivered { object_key: String, url: String },
    /// Upload failed; nothing delivered
    Failed {
        source_path: PathBuf,
        error: UploadError,
    },
}

/// The watch-filter-upload pipeline
pub struct Pipeline<U, D> {
    classifier: Classifier,
    keys: KeyGenerator,
    uploader: U,
    resolver: UrlResolver,
    delivery: D,
    upload_timeout: Duration,
}

impl<U, D> Pipeline<U, D>
where
    U: Uploader,
    D: DeliverySink,
{
    /// Assemble a pipeline from configuration and its two collaborators
    pub fn new(config: &Config, uploader: U, delivery: D) -> Self {
        Self {
            classifier: Classifier::accepting_modified(config.upload_on_modify),
            keys: KeyGenerator::new(),
            uploader,
            resolver: UrlResolver::new(config.custom_host.clone()),
            delivery,
            upload_timeout: config.upload_timeout,
        }
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Drain the source until its event channel closes.
    ///
    /// Source errors are logged and the loop keeps going.
    pub async fn run(&self, mut source: EventSource) {
        while let Some(item) = source.next().await {
            match item {
                SourceItem::Event(event) => {
                    self.process(event).await;
                }
                SourceItem::Error(e) => {
                    error!(error = %e, "File watcher reported an error");
                }
            }
        }
        info!("Event source closed, stopping");
    }

    /// Take one event to its terminal state
    #[tracing::instrument(
        name = "pipeline.process",
        skip(self, event),
        fields(path = %event.path.display(), kind = ?event.kind)
    )]
    pub async fn process(&self, event: FileEvent) -> Outcome {
        let media = match self.classifier.classify(&event) {
            Ok(media) => media,
            Err(reason) => {
                debug!(%reason, "Ignoring event");
                return Outcome::Rejected(reason);
            }
        };

        let candidate = UploadCandidate {
            object_key: self.keys.generate(media.extension),
            extension: media.extension.to_string(),
            mime_type: media.mime_type.to_string(),
            source_path: event.path,
        };
        info!(key = %candidate.object_key, "New file detected, uploading");

        let result = tokio::time::timeout(self.upload_timeout, self.uploader.upload(&candidate))
            .await
            .unwrap_or_else(|_| Err(UploadError::Timeout(self.upload_timeout)));

        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => {
                error!(error = %e, key = %candidate.object_key, "Upload failed");
                return Outcome::Failed {
                    source_path: candidate.source_path,
                    error: e,
                };
            }
        };

        let url = self.resolver.resolve(&receipt);
        info!(url = %url, "Upload complete");

        if let Err(e) = self.delivery.deliver(&url) {
            warn!(error = %e, "Link delivery incomplete");
        }

        Outcome::Delivered {
            object_key: receipt.object_key,
            url,
        }
    }
}
