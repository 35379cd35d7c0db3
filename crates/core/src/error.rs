//! Base error types for frontdate
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading a file
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file
    #[error("Failed to write file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path is outside the vault root
    #[error("Path {} is not inside vault {}", path.display(), root.display())]
    OutsideVault { path: PathBuf, root: PathBuf },

    /// Front matter block could not be parsed
    #[error("Invalid front matter in {path}: {message}")]
    FrontMatterParse { path: String, message: String },

    /// Front matter could not be serialized back to YAML
    #[error("Failed to serialize front matter for {path}: {message}")]
    FrontMatterSerialize { path: String, message: String },

    /// Persisted settings could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
