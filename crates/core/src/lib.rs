//! Core types and capability traits for frontdate
//!
//! This is the foundation crate (Layer 0) that all other frontdate crates depend on.
//! It provides:
//! - File identity snapshots ([`FileDescriptor`])
//! - The ordered front-matter map ([`Metadata`])
//! - Base error types
//! - Capability traits the host supplies (events, metadata store, settings store,
//!   notices, active file)
//!
//! This crate has no dependencies on other frontdate crates.

pub mod error;
pub mod file;
pub mod metadata;
pub mod traits;

pub use error::{Error, Result};
pub use file::{DOCUMENT_EXTENSION, FileDescriptor, Instant};
pub use metadata::{Metadata, is_truthy};
pub use traits::{ConfigStore, EventSource, FileEvent, MetadataStore, Notifier, Workspace};
