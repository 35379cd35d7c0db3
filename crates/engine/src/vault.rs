//! Vault directory access
//!
//! A vault is the directory tree of documents the host operates on. This module
//! maps filesystem paths onto vault-relative [`FileDescriptor`]s.

use crate::frontmatter::FrontMatterStore;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use frontdate_core::{FileDescriptor, Instant};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// A vault rooted at a canonical directory
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

/// Convert a filesystem timestamp into the local offset
pub fn to_instant(time: SystemTime) -> Instant {
    DateTime::<Local>::from(time).fixed_offset()
}

impl Vault {
    /// Open a vault, canonicalizing its root
    ///
    /// # Errors
    ///
    /// Returns error if `root` does not exist or is not a directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| Error::FileRead {
            path: root.to_path_buf(),
            source,
        })?;

        if !canonical.is_dir() {
            return Err(Error::Message(format!(
                "Vault root is not a directory: {}",
                canonical.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Front-matter store for documents in this vault
    pub fn store(&self) -> FrontMatterStore {
        FrontMatterStore::new(&self.root)
    }

    /// Vault-relative path with `/` separators
    ///
    /// Relative inputs are taken relative to the vault root.
    ///
    /// # Errors
    ///
    /// Returns error if the path lies outside the vault or is not valid UTF-8
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let joined;
        let path = if path.is_absolute() {
            path
        } else {
            joined = self.root.join(path);
            &joined
        };

        let outside = || Error::OutsideVault {
            path: path.to_path_buf(),
            root: self.root.clone(),
        };

        let relative = path.strip_prefix(&self.root).map_err(|_| outside())?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        Error::Message(format!("Path is not valid UTF-8: {}", path.display()))
                    })?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                _ => return Err(outside()),
            }
        }

        if segments.is_empty() {
            return Err(outside());
        }

        Ok(segments.join("/"))
    }

    /// Snapshot a file's identity and timestamps
    ///
    /// Platforms without a birth time report the modification time as the
    /// creation time.
    ///
    /// # Errors
    ///
    /// Returns error if the path is outside the vault or cannot be stat'ed
    pub fn describe(&self, path: &Path) -> Result<FileDescriptor> {
        let relative = self.relative_path(path)?;
        let absolute = self.root.join(&relative);

        let metadata = std::fs::metadata(&absolute).map_err(|source| Error::FileRead {
            path: absolute.clone(),
            source,
        })?;
        let modified = metadata
            .modified()
            .map_err(|source| Error::FileRead { path: absolute, source })?;
        let created = metadata.created().unwrap_or(modified);

        Ok(FileDescriptor::new(
            relative,
            to_instant(modified),
            to_instant(created),
        ))
    }
}
