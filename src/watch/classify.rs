//! Event classification
//!
//! Decides whether a [`FileEvent`] denotes a new uploadable file. Pure: no
//! filesystem access, no logging, no side effects.

use super::{FileEvent, FileEventKind};
use std::fmt;

/// Supported media types: extension (without dot) to MIME type
const MEDIA_TYPES: [MediaType; 3] = [
    MediaType {
        extension: "png",
        mime_type: "image/png",
    },
    MediaType {
        extension: "jpg",
        mime_type: "image/jpeg",
    },
    MediaType {
        extension: "mov",
        mime_type: "video/quicktime",
    },
];

/// A supported file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType {
    /// Extension without the leading dot, e.g. `png`
    pub extension: &'static str,
    pub mime_type: &'static str,
}

impl MediaType {
    /// Look up a media type by extension (case-sensitive, no leading dot)
    pub fn from_extension(extension: &str) -> Option<MediaType> {
        MEDIA_TYPES
            .iter()
            .copied()
            .find(|media| media.extension == extension)
    }
}

/// Why an event was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Event kind does not denote a new file
    IgnoredKind,
    /// Path has no file name component
    NoFileName,
    /// Basename starts with `.`
    Hidden,
    /// Extension missing or not in the supported set
    UnsupportedExtension,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::IgnoredKind => "ignored event kind",
            Rejection::NoFileName => "no file name",
            Rejection::Hidden => "hidden file",
            Rejection::UnsupportedExtension => "unsupported extension",
        };
        f.write_str(reason)
    }
}

/// Filters raw events down to upload candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    accept_modified: bool,
}

impl Classifier {
    /// Classifier accepting only creation events
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept modification events
    pub fn accepting_modified(accept_modified: bool) -> Self {
        Self { accept_modified }
    }

    /// Classify an event, returning its media type when it should be uploaded
    pub fn classify(&self, event: &FileEvent) -> Result<MediaType, Rejection> {
        match event.kind {
            FileEventKind::Created => {}
            FileEventKind::Modified if self.accept_modified => {}
            _ => return Err(Rejection::IgnoredKind),
        }

        let name = event
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(Rejection::NoFileName)?;

        if name.starts_with('.') {
            return Err(Rejection::Hidden);
        }

        event
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .ok_or(Rejection::UnsupportedExtension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(path: &str) -> FileEvent {
        FileEvent::new(path, FileEventKind::Created)
    }

    #[test]
    fn test_supported_extensions() {
        let classifier = Classifier::new();
        let cases = [
            ("/shots/screenshot.png", "image/png"),
            ("/shots/photo.jpg", "image/jpeg"),
            ("/shots/recording.mov", "video/quicktime"),
        ];
        for (path, mime) in cases {
            let media = classifier.classify(&created(path)).unwrap();
            assert_eq!(media.mime_type, mime, "{path}");
        }
    }

    #[test]
    fn test_hidden_files_rejected() {
        let classifier = Classifier::new();
        for path in ["/shots/.DS_Store", "/shots/.Screenshot 2024.png", "/shots/.x.mov"] {
            assert_eq!(
                classifier.classify(&created(path)),
                Err(Rejection::Hidden),
                "{path}"
            );
        }
    }

    #[test]
    fn test_unsupported_extensions_rejected() {
        let classifier = Classifier::new();
        for path in [
            "/shots/notes.txt",
            "/shots/archive.tar.gz",
            "/shots/noextension",
            "/shots/image.jpeg",
            "/shots/IMAGE.PNG",
            "/shots/trailing.",
        ] {
            assert_eq!(
                classifier.classify(&created(path)),
                Err(Rejection::UnsupportedExtension),
                "{path}"
            );
        }
    }

    #[test]
    fn test_modified_ignored_by_default() {
        let event = FileEvent::new("/shots/a.png", FileEventKind::Modified);
        assert_eq!(
            Classifier::new().classify(&event),
            Err(Rejection::IgnoredKind)
        );
    }

    #[test]
    fn test_modified_accepted_when_enabled() {
        let event = FileEvent::new("/shots/a.png", FileEventKind::Modified);
        let media = Classifier::accepting_modified(true).classify(&event).unwrap();
        assert_eq!(media.extension, "png");
    }

    #[test]
    fn test_other_kind_always_ignored() {
        let event = FileEvent::new("/shots/a.png", FileEventKind::Other);
        assert_eq!(
            Classifier::accepting_modified(true).classify(&event),
            Err(Rejection::IgnoredKind)
        );
    }

    #[test]
    fn test_root_path_has_no_file_name() {
        assert_eq!(
            Classifier::new().classify(&created("/")),
            Err(Rejection::NoFileName)
        );
    }
}
