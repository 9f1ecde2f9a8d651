//! URL resolution
//!
//! Turns the storage location of an uploaded object into the link handed to
//! the user. With a custom host (a CDN or vanity domain in front of the
//! bucket) the link is `{host}/{key}`; otherwise it is the storage location
//! itself.

use crate::upload::UploadReceipt;

/// Resolves advertised links for uploaded objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResolver {
    custom_host: Option<String>,
}

impl UrlResolver {
    pub fn new(custom_host: Option<String>) -> Self {
        Self { custom_host }
    }

    /// Resolved URL for a successful upload.
    ///
    /// The custom host is used verbatim; it is not validated or normalized.
    pub fn resolve(&self, receipt: &UploadReceipt) -> String {
        match &self.custom_host {
            Some(host) => format!("{}/{}", host, receipt.object_key),
            None => receipt.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(key: &str, location: &str) -> UploadReceipt {
        UploadReceipt {
            object_key: key.into(),
            location: location.into(),
        }
    }

    #[test]
    fn test_identity_without_custom_host() {
        let resolver = UrlResolver::new(None);
        for location in [
            "https://shots.s3.amazonaws.com/ab12x.png",
            "http://localhost:9000/shots/ab12x.png?x=1",
            "",
        ] {
            assert_eq!(resolver.resolve(&receipt("ab12x.png", location)), location);
        }
    }

    #[test]
    fn test_custom_host_replaces_location() {
        let resolver = UrlResolver::new(Some("https://img.example.com".into()));
        let url = resolver.resolve(&receipt(
            "ab12x.png",
            "https://shots.s3.amazonaws.com/ab12x.png",
        ));
        assert_eq!(url, "https://img.example.com/ab12x.png");
    }

    #[test]
    fn test_custom_host_used_verbatim() {
        let resolver = UrlResolver::new(Some("not a host/".into()));
        assert_eq!(
            resolver.resolve(&receipt("k.mov", "ignored")),
            "not a host//k.mov"
        );
    }
}
