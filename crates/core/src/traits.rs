//! Capability traits supplied by the host
//!
//! The policy engine never talks to a concrete editor, filesystem watcher or
//! settings file. Instead the host hands it implementations of these traits:
//!
//! - [`EventSource`]: file changed / file created notifications
//! - [`MetadataStore`]: atomic read-modify-write of a document's front matter
//! - [`ConfigStore`]: load/save of the opaque persisted settings
//! - [`Notifier`]: user-visible notices
//! - [`Workspace`]: the host's notion of the currently active file
//!
//! Everything runs on a single cooperative task, so the async traits do not
//! require `Send` futures.

use crate::{FileDescriptor, Metadata, Result};

/// A file notification delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// An existing file was saved
    Changed(FileDescriptor),
    /// A new file appeared
    Created(FileDescriptor),
}

impl FileEvent {
    /// The file this event refers to
    pub fn file(&self) -> &FileDescriptor {
        match self {
            Self::Changed(file) | Self::Created(file) => file,
        }
    }
}

/// Stream of file notifications
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Wait for the next notification
    ///
    /// Returns `None` once the host stops delivering events.
    async fn next_event(&mut self) -> Option<FileEvent>;
}

/// Atomic read-modify-write access to a document's front matter
///
/// Implementations read and parse the metadata block, call `mutator` exactly
/// once, then serialize and write the result. If any step fails the document
/// must be left exactly as it was.
///
/// # Examples
///
/// ```ignore
/// store
///     .with_metadata(&file, |metadata| {
///         metadata.insert("reviewed".into(), true.into());
///     })
///     .await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait MetadataStore {
    /// Run `mutator` against the front matter of `file` and commit the result
    async fn with_metadata<F>(&self, file: &FileDescriptor, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Metadata);

    /// Current timestamps of `file`
    ///
    /// The default keeps the snapshot the host delivered.
    async fn refresh(&self, file: &FileDescriptor) -> Result<FileDescriptor> {
        Ok(file.clone())
    }
}

/// Persistence for settings, stored as opaque JSON
pub trait ConfigStore {
    /// Load the persisted settings, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<serde_json::Value>>;

    /// Persist settings
    fn save(&self, value: &serde_json::Value) -> Result<()>;
}

/// Sink for short user-facing messages
pub trait Notifier {
    /// Show a notice to the user
    fn notify(&self, message: &str);
}

/// The host's editing workspace
pub trait Workspace {
    /// The file the user is currently looking at, if any
    fn active_file(&self) -> Option<FileDescriptor>;
}
