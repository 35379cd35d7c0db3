//! Filesystem notifications as an [`EventSource`]
//!
//! A `notify` watcher runs on its own thread and forwards raw events into a
//! tokio channel. [`VaultEvents`] turns them into [`FileEvent`]s for files
//! inside the vault, dropping directories, deletions and metadata-only
//! changes.

use frontdate_core::{EventSource, FileEvent};
use frontdate_engine::Vault;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::Path;
use tokio::sync::mpsc;

/// What a raw notification means for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Created,
    Changed,
}

fn classify(kind: EventKind) -> Option<Change> {
    match kind {
        EventKind::Create(CreateKind::File | CreateKind::Any) => Some(Change::Created),
        // Editors that save through a rename show up as `Name(To)`
        EventKind::Modify(
            ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Name(RenameMode::To),
        ) => Some(Change::Changed),
        _ => None,
    }
}

/// Live stream of file events under a vault root
pub struct VaultEvents {
    vault: Vault,
    receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
    pending: VecDeque<FileEvent>,
    _watcher: RecommendedWatcher,
}

impl VaultEvents {
    /// Start watching the vault recursively
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or the root
    /// cannot be watched
    pub fn watch(vault: Vault) -> notify::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |result| {
            // The receiver is gone once the event loop has stopped
            let _ = sender.send(result);
        })?;
        watcher.watch(vault.root(), RecursiveMode::Recursive)?;

        tracing::info!(root = %vault.root().display(), "Watching vault");

        Ok(Self {
            vault,
            receiver,
            pending: VecDeque::new(),
            _watcher: watcher,
        })
    }

    fn to_file_event(&self, change: Change, path: &Path) -> Option<FileEvent> {
        if !path.is_file() {
            return None;
        }

        match self.vault.describe(path) {
            Ok(file) => Some(match change {
                Change::Created => FileEvent::Created(file),
                Change::Changed => FileEvent::Changed(file),
            }),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping event");
                None
            }
        }
    }

    fn enqueue(&mut self, event: Event) {
        let Some(change) = classify(event.kind) else {
            return;
        };

        for path in &event.paths {
            let Some(file_event) = self.to_file_event(change, path) else {
                continue;
            };
            // One save often arrives as several raw events
            let duplicate = self
                .pending
                .iter()
                .any(|queued| queued.file().path() == file_event.file().path());
            if !duplicate {
                self.pending.push_back(file_event);
            }
        }
    }
}

impl EventSource for VaultEvents {
    async fn next_event(&mut self) -> Option<FileEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            match self.receiver.recv().await? {
                Ok(event) => self.enqueue(event),
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use notify::event::{AccessKind, DataChange, MetadataKind, RemoveKind};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(EventKind::Create(CreateKind::File)),
            Some(Change::Created)
        );
        assert_eq!(
            classify(EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(Change::Changed)
        );
        assert_eq!(
            classify(EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(Change::Changed)
        );

        assert_eq!(classify(EventKind::Create(CreateKind::Folder)), None);
        assert_eq!(
            classify(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
            None
        );
        assert_eq!(
            classify(EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            None
        );
        assert_eq!(classify(EventKind::Remove(RemoveKind::File)), None);
        assert_eq!(classify(EventKind::Access(AccessKind::Any)), None);
    }

    #[tokio::test]
    async fn test_enqueue_translates_and_deduplicates() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("notes")).unwrap();
        fs::write(temp.path().join("notes/a.md"), "").unwrap();
        let vault = Vault::open(temp.path()).unwrap();
        let root = vault.root().to_path_buf();

        let mut events = VaultEvents::watch(vault).unwrap();

        let modify = |path: &Path| {
            Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
                .add_path(path.to_path_buf())
        };
        events.enqueue(modify(&root.join("notes/a.md")));
        events.enqueue(modify(&root.join("notes/a.md")));
        events.enqueue(modify(&root.join("notes")));
        events.enqueue(modify(&root.join("notes/gone.md")));
        events.enqueue(
            Event::new(EventKind::Remove(RemoveKind::File)).add_path(root.join("notes/a.md")),
        );

        assert_eq!(events.pending.len(), 1);
        let event = events.next_event().await.unwrap();
        assert!(matches!(&event, FileEvent::Changed(file) if file.path() == "notes/a.md"));
    }
}
