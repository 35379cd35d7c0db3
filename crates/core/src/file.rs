//! File identity snapshots
//!
//! A [`FileDescriptor`] captures everything the policy engine needs to know about a
//! document at evaluation time: where it lives inside the vault, what it is called,
//! and its two timestamps. The core never mutates a descriptor.

use chrono::{DateTime, FixedOffset};

/// Point in time as seen by the host, carrying the host's UTC offset
pub type Instant = DateTime<FixedOffset>;

/// The one document type the whole system operates on (Markdown)
pub const DOCUMENT_EXTENSION: &str = "md";

/// Immutable snapshot of a document's identity
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use frontdate_core::FileDescriptor;
///
/// let at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// let file = FileDescriptor::new("notes/Daily.MD", at, at);
///
/// assert_eq!(file.name(), "Daily.MD");
/// assert_eq!(file.extension(), "md");
/// assert!(file.is_document());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    path: String,
    name: String,
    extension: String,
    modified_at: Instant,
    created_at: Instant,
}

impl FileDescriptor {
    /// Build a descriptor from a vault-relative path
    ///
    /// The path uses `/` as separator. Backslashes are normalized so descriptors
    /// built from Windows paths compare the same way. The name is the final
    /// segment and the extension is the lower-cased text after its last dot.
    pub fn new(path: impl Into<String>, modified_at: Instant, created_at: Instant) -> Self {
        let path = path.into().replace('\\', "/");
        let path = path.trim_start_matches('/').to_string();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        Self {
            path,
            name,
            extension,
            modified_at,
            created_at,
        }
    }

    /// Build a descriptor from individual path segments
    pub fn from_segments<S: AsRef<str>>(
        segments: &[S],
        modified_at: Instant,
        created_at: Instant,
    ) -> Self {
        let path = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");
        Self::new(path, modified_at, created_at)
    }

    /// Vault-relative path, segments joined by `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path segment including the extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased extension without the leading dot (empty if none)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Last modification time
    pub fn modified_at(&self) -> &Instant {
        &self.modified_at
    }

    /// Creation time
    pub fn created_at(&self) -> &Instant {
        &self.created_at
    }

    /// Whether this file is of the document type the system operates on
    pub fn is_document(&self) -> bool {
        self.extension == DOCUMENT_EXTENSION
    }
}
