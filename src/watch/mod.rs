//! Filesystem event source
//!
//! Wraps a `notify` watcher on a single directory (non-recursive) and turns
//! its callbacks into two bounded tokio channels: one for [`FileEvent`]s and
//! one for source-level errors. The notify thread blocks on a full channel,
//! so a slow upload delays events instead of dropping them.

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

pub mod classify;

pub use classify::{Classifier, MediaType, Rejection};

/// Default capacity of the event channel
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Event source errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to watch directory {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("File notification error: {0}")]
    Source(#[from] notify::Error),
}

/// Coarse kind of a filesystem change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
    Other,
}

/// A single change to a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a notify event into one `FileEvent` per affected path
    pub fn from_notify(event: notify::Event) -> Vec<FileEvent> {
        let notify::Event { kind, paths, .. } = event;
        paths
            .into_iter()
            .map(|path| {
                let kind = map_kind(&kind, &path);
                FileEvent { path, kind }
            })
            .collect()
    }
}

/// Map a notify event kind onto [`FileEventKind`].
///
/// Screenshot tools usually write to a hidden temporary file and rename it
/// into place, so a rename whose destination is the watched path counts as
/// a creation.
fn map_kind(kind: &EventKind, path: &Path) -> FileEventKind {
    match kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FileEventKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)) if path.exists() => {
            FileEventKind::Created
        }
        EventKind::Modify(_) => FileEventKind::Modified,
        _ => FileEventKind::Other,
    }
}

/// Item produced by [`EventSource::next`]
#[derive(Debug)]
pub enum SourceItem {
    Event(FileEvent),
    Error(WatchError),
}

/// Live stream of filesystem events for one directory
pub struct EventSource {
    events: mpsc::Receiver<FileEvent>,
    errors: mpsc::Receiver<WatchError>,
    // Dropping the watcher stops notifications and closes both channels.
    _watcher: Option<RecommendedWatcher>,
}

impl EventSource {
    /// Start watching `directory`.
    ///
    /// Fails with [`WatchError::Setup`] when the directory does not exist or
    /// the platform refuses the watch.
    pub fn watch(directory: &Path, capacity: usize) -> Result<Self, WatchError> {
        let (event_tx, events) = mpsc::channel(capacity.max(1));
        let (error_tx, errors) = mpsc::channel(capacity.max(1));

        let setup_error = |source| WatchError::Setup {
            path: directory.to_path_buf(),
            source,
        };

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    for file_event in FileEvent::from_notify(event) {
                        // Receiver gone means the source was dropped.
                        if event_tx.blocking_send(file_event).is_err() {
                            return;
                        }
                    }
                }
                Err(error) => {
                    let _ = error_tx.blocking_send(WatchError::Source(error));
                }
            }
        })
        .map_err(setup_error)?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(setup_error)?;

        tracing::info!(directory = %directory.display(), "Watching for new files");

        Ok(Self {
            events,
            errors,
            _watcher: Some(watcher),
        })
    }

    /// Build a source from pre-made channels, without an OS watcher
    pub fn from_channels(
        events: mpsc::Receiver<FileEvent>,
        errors: mpsc::Receiver<WatchError>,
    ) -> Self {
        Self {
            events,
            errors,
            _watcher: None,
        }
    }

    /// Wait for the next event or source error.
    ///
    /// Returns `None` once the event channel is closed. A closed error channel
    /// alone does not end the stream.
    pub async fn next(&mut self) -> Option<SourceItem> {
        tokio::select! {
            event = self.events.recv() => event.map(SourceItem::Event),
            Some(error) = self.errors.recv() => Some(SourceItem::Error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};

    #[test]
    fn test_create_maps_to_created() {
        let event = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/shots/a.png"));
        let events = FileEvent::from_notify(event);
        assert_eq!(
            events,
            vec![FileEvent::new("/shots/a.png", FileEventKind::Created)]
        );
    }

    #[test]
    fn test_one_event_per_path() {
        let event = notify::Event::new(EventKind::Create(CreateKind::Any))
            .add_path(PathBuf::from("/shots/a.png"))
            .add_path(PathBuf::from("/shots/b.png"));
        assert_eq!(FileEvent::from_notify(event).len(), 2);
    }

    #[test]
    fn test_rename_into_place_is_created() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
            .add_path(PathBuf::from("/shots/a.png"));
        assert_eq!(
            FileEvent::from_notify(event)[0].kind,
            FileEventKind::Created
        );
    }

    #[test]
    fn test_rename_of_missing_path_is_modified() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
            .add_path(PathBuf::from("/nonexistent/moved-away.png"));
        assert_eq!(
            FileEvent::from_notify(event)[0].kind,
            FileEventKind::Modified
        );
    }

    #[test]
    fn test_data_change_is_modified() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/shots/a.png"));
        assert_eq!(
            FileEvent::from_notify(event)[0].kind,
            FileEventKind::Modified
        );
    }

    #[test]
    fn test_other_kinds() {
        for kind in [
            EventKind::Remove(RemoveKind::File),
            EventKind::Access(AccessKind::Any),
            EventKind::Any,
        ] {
            let event = notify::Event::new(kind).add_path(PathBuf::from("/shots/a.png"));
            assert_eq!(FileEvent::from_notify(event)[0].kind, FileEventKind::Other);
        }
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let result = EventSource::watch(Path::new("/nonexistent/screenshots"), 8);
        assert!(matches!(result, Err(WatchError::Setup { .. })));
    }

    #[tokio::test]
    async fn test_from_channels_yields_events_then_ends() {
        let (event_tx, event_rx) = mpsc::channel(4);
        let (_error_tx, error_rx) = mpsc::channel(4);
        let mut source = EventSource::from_channels(event_rx, error_rx);

        event_tx
            .send(FileEvent::new("/shots/a.png", FileEventKind::Created))
            .await
            .unwrap();
        drop(event_tx);

        assert!(matches!(source.next().await, Some(SourceItem::Event(_))));
        assert!(source.next().await.is_none());
    }

    #[tokio::test]
    async fn test_errors_are_surfaced() {
        let (_event_tx, event_rx) = mpsc::channel::<FileEvent>(4);
        let (error_tx, error_rx) = mpsc::channel(4);
        let mut source = EventSource::from_channels(event_rx, error_rx);

        error_tx
            .send(WatchError::Source(notify::Error::generic("queue overflow")))
            .await
            .unwrap();

        assert!(matches!(
            source.next().await,
            Some(SourceItem::Error(WatchError::Source(_)))
        ));
    }
}
