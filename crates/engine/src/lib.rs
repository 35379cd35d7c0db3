//! # Frontdate Engine
//!
//! Policy engine for frontdate, the front-matter timestamp maintainer.
//!
//! This crate provides:
//!
//! - **Blacklist**: deciding which documents are left alone
//! - **Date formats**: moment-style templates for rendering timestamps
//! - **Upsert**: the set-once / always-refresh timestamp rule
//! - **Front matter**: atomic read-modify-write of YAML blocks on disk
//! - **Vault**: mapping filesystem paths to file descriptors
//! - **Manager**: orchestration of host events and user commands

pub mod blacklist;
pub mod datefmt;
pub mod frontmatter;
pub mod manager;
pub mod upsert;
pub mod vault;

// Re-export error types from core
pub use frontdate_core::{Error, Result};

// Re-export commonly used types
pub use blacklist::{IgnoreReason, Verdict};
pub use datefmt::{DateFormat, DateFormatter};
pub use frontmatter::FrontMatterStore;
pub use manager::{CREATE_SETTLE_DELAY, CommandOutcome, DateManager, Processed};
pub use upsert::UpsertOutcome;
pub use vault::Vault;
