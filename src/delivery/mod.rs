//! Delivery of resolved links to the user
//!
//! After a successful upload the link is copied to the clipboard and a
//! desktop notification is raised. Both actions are best-effort and
//! independent: one failing does not prevent the other, and neither affects
//! the watch loop.

use clipboard_rs::{Clipboard, ClipboardContext};
use std::sync::Mutex;
use thiserror::Error;

/// Application name shown by notification daemons
const APP_NAME: &str = "Screenshot Uploader";

/// Delivery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

/// Receives the resolved link of every successful upload
#[cfg_attr(test, mockall::automock)]
pub trait DeliverySink: Send + Sync {
    /// Hand the link to the user.
    ///
    /// Every action is attempted; the first failure is returned.
    fn deliver(&self, url: &str) -> Result<(), DeliveryError>;
}

/// Clipboard + desktop notification delivery
pub struct DesktopDelivery {
    title: String,
    clipboard: Option<Mutex<ClipboardContext>>,
}

impl DesktopDelivery {
    /// Create a delivery sink with the given notification title.
    ///
    /// A clipboard that cannot be opened is logged and skipped; notifications
    /// still work.
    pub fn new(title: impl Into<String>) -> Self {
        let clipboard = match ClipboardContext::new() {
            Ok(context) => Some(Mutex::new(context)),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard unavailable, links will not be copied");
                None
            }
        };

        Self {
            title: title.into(),
            clipboard,
        }
    }

    fn copy_to_clipboard(&self, url: &str) -> Result<(), DeliveryError> {
        let clipboard = self
            .clipboard
            .as_ref()
            .ok_or_else(|| DeliveryError::Clipboard("clipboard unavailable".into()))?;
        let context = clipboard
            .lock()
            .map_err(|e| DeliveryError::Clipboard(e.to_string()))?;
        context
            .set_text(url.to_string())
            .map_err(|e| DeliveryError::Clipboard(e.to_string()))
    }

    fn notify(&self, url: &str) -> Result<(), DeliveryError> {
        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(&self.title)
            .body(url)
            .show()
            .map(|_| ())
            .map_err(|e| DeliveryError::Notification(e.to_string()))
    }
}

impl DeliverySink for DesktopDelivery {
    #[tracing::instrument(name = "delivery.deliver", skip(self))]
    fn deliver(&self, url: &str) -> Result<(), DeliveryError> {
        let copied = self.copy_to_clipboard(url);
        if let Err(ref e) = copied {
            tracing::warn!(error = %e, "Failed to copy link to clipboard");
        }

        let notified = self.notify(url);
        if let Err(ref e) = notified {
            tracing::warn!(error = %e, "Failed to show notification");
        }

        copied.and(notified)
    }
}
