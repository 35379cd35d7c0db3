//! Settings management for frontdate
//!
//! This crate handles:
//! - The settings model and its built-in defaults
//! - Merging persisted settings over the defaults
//! - The settings mutations performed by a settings form
//! - JSON persistence of settings
//! - Logging initialization

pub mod logging;
pub mod settings;
pub mod store;

// Re-export error types from core
pub use frontdate_core::{Error, Result};

// Re-export main types
pub use settings::{
    BlacklistList, BlacklistRules, DEFAULT_CREATED_FIELD, DEFAULT_DATE_FORMAT,
    DEFAULT_MODIFIED_FIELD, MetadataFields, SettingKey, Settings, UnknownSettingKey,
};
pub use store::JsonFileStore;
