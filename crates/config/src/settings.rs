//! Settings model
//!
//! Settings are persisted as a flat JSON object with camelCase keys:
//!
//! ```json
//! {
//!   "dateFormat": "YYYY-MM-DD[T]HH:mm",
//!   "createdField": "created",
//!   "modifiedField": "updated",
//!   "blacklist": {
//!     "folders": ["_templates", ".obsidian", ".trash"],
//!     "filenames": ["README.md", "LICENSE", "LICENSE.md", "CHANGELOG.md"],
//!     "extensions": [".js", ".ts", ".json", ".css", ".html", ".sql", ".py"],
//!     "patterns": []
//!   }
//! }
//! ```
//!
//! Loading merges whatever was persisted over the built-in defaults, one
//! top-level key at a time. The `blacklist` object is merged per list: once a
//! persisted blacklist exists, each list comes from it and a list it omits is
//! empty rather than missing.

use crate::{Error, Result};
use frontdate_core::ConfigStore;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default moment-style date template
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD[T]HH:mm";

/// Default name of the set-once creation field
pub const DEFAULT_CREATED_FIELD: &str = "created";

/// Default name of the always-refreshed modification field
pub const DEFAULT_MODIFIED_FIELD: &str = "updated";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_created_field() -> String {
    DEFAULT_CREATED_FIELD.to_string()
}

fn default_modified_field() -> String {
    DEFAULT_MODIFIED_FIELD.to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Rules that exclude files from automatic processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlacklistRules {
    /// Folder names; match at the top level or at any depth
    pub folders: Vec<String>,

    /// Exact, case-sensitive file names
    pub filenames: Vec<String>,

    /// Dot-prefixed extensions such as `.json`
    pub extensions: Vec<String>,

    /// Case-insensitive regular expressions tested against name and path
    pub patterns: Vec<String>,
}

impl BlacklistRules {
    /// Rules with every list empty
    pub fn empty() -> Self {
        Self {
            folders: Vec::new(),
            filenames: Vec::new(),
            extensions: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Borrow one of the four lists
    pub fn list(&self, list: BlacklistList) -> &[String] {
        match list {
            BlacklistList::Folders => &self.folders,
            BlacklistList::Filenames => &self.filenames,
            BlacklistList::Extensions => &self.extensions,
            BlacklistList::Patterns => &self.patterns,
        }
    }

    /// Mutably borrow one of the four lists
    pub fn list_mut(&mut self, list: BlacklistList) -> &mut Vec<String> {
        match list {
            BlacklistList::Folders => &mut self.folders,
            BlacklistList::Filenames => &mut self.filenames,
            BlacklistList::Extensions => &mut self.extensions,
            BlacklistList::Patterns => &mut self.patterns,
        }
    }
}

impl Default for BlacklistRules {
    fn default() -> Self {
        Self {
            folders: strings(&["_templates", ".obsidian", ".trash"]),
            filenames: strings(&["README.md", "LICENSE", "LICENSE.md", "CHANGELOG.md"]),
            extensions: strings(&[".js", ".ts", ".json", ".css", ".html", ".sql", ".py"]),
            patterns: Vec::new(),
        }
    }
}

/// One of the four blacklist lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistList {
    /// Folder names
    Folders,
    /// File names
    Filenames,
    /// Extensions
    Extensions,
    /// Regular expressions
    Patterns,
}

impl BlacklistList {
    /// All lists in evaluation order
    pub const ALL: [Self; 4] = [
        Self::Folders,
        Self::Filenames,
        Self::Extensions,
        Self::Patterns,
    ];

    /// Key used in the persisted JSON object
    pub fn key(self) -> &'static str {
        match self {
            Self::Folders => "folders",
            Self::Filenames => "filenames",
            Self::Extensions => "extensions",
            Self::Patterns => "patterns",
        }
    }
}

/// The two front-matter keys the engine writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataFields<'a> {
    /// Set-once creation field
    pub created: &'a str,
    /// Always-refreshed modification field
    pub modified: &'a str,
}

impl Default for MetadataFields<'static> {
    fn default() -> Self {
        Self {
            created: DEFAULT_CREATED_FIELD,
            modified: DEFAULT_MODIFIED_FIELD,
        }
    }
}

/// frontdate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Moment-style template used to render timestamps
    pub date_format: String,

    /// Name of the set-once creation field
    pub created_field: String,

    /// Name of the always-refreshed modification field
    pub modified_field: String,

    /// Files excluded from processing
    pub blacklist: BlacklistRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            created_field: default_created_field(),
            modified_field: default_modified_field(),
            blacklist: BlacklistRules::default(),
        }
    }
}

impl Settings {
    /// Merge persisted settings over the built-in defaults
    ///
    /// Top-level keys are taken from `persisted` when present and well-typed,
    /// otherwise the default is kept. A persisted `blacklist` object replaces
    /// the default blacklist list by list, with omitted lists becoming empty.
    /// Anything that is not a JSON object yields the defaults.
    pub fn merged(persisted: Option<&Value>) -> Self {
        let mut settings = Self::default();

        let Some(persisted) = persisted else {
            return settings;
        };

        let Some(object) = persisted.as_object() else {
            tracing::warn!("Persisted settings are not an object, using defaults");
            return settings;
        };

        if let Some(value) = string_entry(object, "dateFormat") {
            settings.date_format = value;
        }
        if let Some(value) = string_entry(object, "createdField") {
            settings.created_field = value;
        }
        if let Some(value) = string_entry(object, "modifiedField") {
            settings.modified_field = value;
        }

        match object.get("blacklist") {
            None | Some(Value::Null) => {}
            Some(Value::Object(blacklist)) => {
                for list in BlacklistList::ALL {
                    *settings.blacklist.list_mut(list) =
                        list_entry(blacklist, list.key()).unwrap_or_default();
                }
            }
            Some(other) => {
                tracing::warn!("Ignoring persisted blacklist of unexpected type: {}", other);
            }
        }

        settings.normalize();
        settings
    }

    /// Load settings from a store and merge them over the defaults
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read
    pub fn load(store: &impl ConfigStore) -> Result<Self> {
        let persisted = store.load()?;
        let settings = Self::merged(persisted.as_ref());
        tracing::debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Persist settings to a store
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the store write fails
    pub fn save(&self, store: &impl ConfigStore) -> Result<()> {
        store.save(&self.to_json()?)
    }

    /// Serialize to the persisted JSON shape
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| Error::Settings(format!("Failed to serialize settings: {e}")))
    }

    /// The configured field names
    pub fn fields(&self) -> MetadataFields<'_> {
        MetadataFields {
            created: &self.created_field,
            modified: &self.modified_field,
        }
    }

    /// Set the date template; an empty value restores the default
    pub fn set_date_format(&mut self, value: &str) {
        self.date_format = non_empty_or(value, DEFAULT_DATE_FORMAT);
    }

    /// Set the creation field name; an empty value restores the default
    pub fn set_created_field(&mut self, value: &str) {
        self.created_field = non_empty_or(value, DEFAULT_CREATED_FIELD);
    }

    /// Set the modification field name; an empty value restores the default
    pub fn set_modified_field(&mut self, value: &str) {
        self.modified_field = non_empty_or(value, DEFAULT_MODIFIED_FIELD);
    }

    /// Replace a blacklist list from multi-line text, one entry per line
    ///
    /// Blank lines are dropped. Entries are otherwise kept as typed.
    pub fn set_list_from_text(&mut self, list: BlacklistList, text: &str) {
        *self.blacklist.list_mut(list) = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(ToString::to_string)
            .collect();
    }

    /// Apply a setting by key
    pub fn set(&mut self, key: SettingKey, value: &str) {
        match key {
            SettingKey::DateFormat => self.set_date_format(value),
            SettingKey::CreatedField => self.set_created_field(value),
            SettingKey::ModifiedField => self.set_modified_field(value),
            SettingKey::List(list) => self.set_list_from_text(list, value),
        }
    }

    fn normalize(&mut self) {
        if self.date_format.is_empty() {
            self.date_format = default_date_format();
        }
        if self.created_field.is_empty() {
            self.created_field = default_created_field();
        }
        if self.modified_field.is_empty() {
            self.modified_field = default_modified_field();
        }
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn string_entry(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => {
            tracing::warn!("Ignoring persisted {} of unexpected type: {}", key, other);
            None
        }
    }
}

fn list_entry(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match object.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => {
                        tracing::warn!("Dropping non-string {} entry: {}", key, other);
                        None
                    }
                })
                .collect(),
        ),
        Value::Null => None,
        other => {
            tracing::warn!("Ignoring persisted {} of unexpected type: {}", key, other);
            None
        }
    }
}

/// A setting that can be changed by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// `date-format`
    DateFormat,
    /// `created-field`
    CreatedField,
    /// `modified-field`
    ModifiedField,
    /// `folders`, `filenames`, `extensions` or `patterns`
    List(BlacklistList),
}

/// Returned when parsing an unknown setting name
#[derive(Debug, Error)]
#[error(
    "Unknown setting '{0}'. Expected one of: date-format, created-field, modified-field, \
     folders, filenames, extensions, patterns"
)]
pub struct UnknownSettingKey(pub String);

impl FromStr for SettingKey {
    type Err = UnknownSettingKey;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "date-format" | "dateFormat" => Ok(Self::DateFormat),
            "created-field" | "createdField" => Ok(Self::CreatedField),
            "modified-field" | "modifiedField" => Ok(Self::ModifiedField),
            "folders" => Ok(Self::List(BlacklistList::Folders)),
            "filenames" => Ok(Self::List(BlacklistList::Filenames)),
            "extensions" => Ok(Self::List(BlacklistList::Extensions)),
            "patterns" => Ok(Self::List(BlacklistList::Patterns)),
            other => Err(UnknownSettingKey(other.to_string())),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateFormat => f.write_str("date-format"),
            Self::CreatedField => f.write_str("created-field"),
            Self::ModifiedField => f.write_str("modified-field"),
            Self::List(list) => f.write_str(list.key()),
        }
    }
}
