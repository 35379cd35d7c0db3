//! Timestamp upsert
//!
//! Two front-matter fields are maintained:
//!
//! - the creation field is **set once**: written only while it is absent or
//!   falsy, then never touched again
//! - the modification field is **always refreshed**: overwritten on every pass
//!
//! The rule is a small decision table over the field's policy and its current
//! state, kept separate from any document parsing so it can be tested alone.

use crate::datefmt::DateFormatter;
use frontdate_config::MetadataFields;
use frontdate_core::{Instant, Metadata, is_truthy};
use serde_yaml::Value;

/// How a field is maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Written only while unset
    SetOnce,
    /// Written on every pass
    AlwaysRefresh,
}

/// Current state of a field in the metadata map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Absent or holding a falsy value
    Unset,
    /// Holding a truthy value
    Set,
}

/// What to do with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    /// Write the formatted timestamp
    Write,
    /// Leave the existing value alone
    Keep,
}

impl FieldState {
    /// State of `key` in `metadata`
    pub fn of(metadata: &Metadata, key: &str) -> Self {
        match metadata.get(key) {
            Some(value) if is_truthy(value) => Self::Set,
            _ => Self::Unset,
        }
    }
}

impl FieldPolicy {
    /// The decision table
    ///
    /// | policy        | Unset | Set   |
    /// |---------------|-------|-------|
    /// | SetOnce       | Write | Keep  |
    /// | AlwaysRefresh | Write | Write |
    pub const fn decide(self, state: FieldState) -> FieldAction {
        match (self, state) {
            (Self::SetOnce, FieldState::Set) => FieldAction::Keep,
            (Self::SetOnce, FieldState::Unset) | (Self::AlwaysRefresh, _) => FieldAction::Write,
        }
    }
}

/// What [`apply`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The creation field was written on this pass
    pub created_written: bool,
    /// Any value in the map differs from before
    pub changed: bool,
}

fn upsert(
    metadata: &mut Metadata,
    key: &str,
    policy: FieldPolicy,
    instant: &Instant,
    formatter: &impl DateFormatter,
) -> (FieldAction, bool) {
    let action = policy.decide(FieldState::of(metadata, key));
    if action == FieldAction::Keep {
        return (action, false);
    }

    let value = Value::String(formatter.format(instant));
    // Existing keys keep their position; new keys are appended
    let previous = metadata.insert(key.to_string(), value.clone());
    (action, previous.as_ref() != Some(&value))
}

/// Apply the timestamp policy to a metadata map
///
/// Keys other than the two configured fields are never touched and keep
/// their order.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use frontdate_config::MetadataFields;
/// use frontdate_core::Metadata;
/// use frontdate_engine::datefmt::DateFormat;
/// use frontdate_engine::upsert::apply;
///
/// let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// let modified = DateTime::parse_from_rfc3339("2024-01-02T10:30:00Z").unwrap();
///
/// let mut metadata = Metadata::new();
/// apply(&mut metadata, &created, &modified, MetadataFields::default(), &DateFormat::default());
///
/// assert_eq!(metadata["created"], "2024-01-01T00:00");
/// assert_eq!(metadata["updated"], "2024-01-02T10:30");
/// ```
pub fn apply(
    metadata: &mut Metadata,
    created_at: &Instant,
    modified_at: &Instant,
    fields: MetadataFields<'_>,
    formatter: &impl DateFormatter,
) -> UpsertOutcome {
    let (created_action, created_changed) = upsert(
        metadata,
        fields.created,
        FieldPolicy::SetOnce,
        created_at,
        formatter,
    );
    let (_, modified_changed) = upsert(
        metadata,
        fields.modified,
        FieldPolicy::AlwaysRefresh,
        modified_at,
        formatter,
    );

    UpsertOutcome {
        created_written: created_action == FieldAction::Write,
        changed: created_changed || modified_changed,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::datefmt::DateFormat;
    use chrono::DateTime;

    fn at(s: &str) -> Instant {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn yaml(s: &str) -> Metadata {
        serde_yaml::from_str(s).unwrap()
    }

    fn keys(metadata: &Metadata) -> Vec<&str> {
        metadata.keys().map(String::as_str).collect()
    }

    fn run(metadata: &mut Metadata, created: &str, modified: &str) -> UpsertOutcome {
        apply(
            metadata,
            &at(created),
            &at(modified),
            MetadataFields::default(),
            &DateFormat::default(),
        )
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(FieldPolicy::SetOnce.decide(FieldState::Unset), FieldAction::Write);
        assert_eq!(FieldPolicy::SetOnce.decide(FieldState::Set), FieldAction::Keep);
        assert_eq!(FieldPolicy::AlwaysRefresh.decide(FieldState::Unset), FieldAction::Write);
        assert_eq!(FieldPolicy::AlwaysRefresh.decide(FieldState::Set), FieldAction::Write);
    }

    #[test]
    fn test_field_state() {
        let metadata = yaml("a: x\nb: ''\nc: null\nd: false\ne: 0\nf: []");

        assert_eq!(FieldState::of(&metadata, "a"), FieldState::Set);
        assert_eq!(FieldState::of(&metadata, "b"), FieldState::Unset);
        assert_eq!(FieldState::of(&metadata, "c"), FieldState::Unset);
        assert_eq!(FieldState::of(&metadata, "d"), FieldState::Unset);
        assert_eq!(FieldState::of(&metadata, "e"), FieldState::Unset);
        assert_eq!(FieldState::of(&metadata, "f"), FieldState::Set);
        assert_eq!(FieldState::of(&metadata, "missing"), FieldState::Unset);
    }

    #[test]
    fn test_empty_map_scenario() {
        let mut metadata = Metadata::new();
        let outcome = run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-02T10:30:00Z");

        assert_eq!(metadata, yaml("created: 2024-01-01T00:00\nupdated: 2024-01-02T10:30"));
        assert_eq!(keys(&metadata), vec!["created", "updated"]);
        assert!(outcome.created_written);
        assert!(outcome.changed);
    }

    #[test]
    fn test_existing_created_scenario() {
        let mut metadata = yaml("created: 2020-01-01T00:00\ntitle: X");
        let outcome = run(&mut metadata, "2024-05-01T00:00:00Z", "2024-06-01T09:00:00Z");

        assert_eq!(keys(&metadata), vec!["created", "title", "updated"]);
        assert_eq!(metadata["created"], "2020-01-01T00:00");
        assert_eq!(metadata["title"], "X");
        assert_eq!(metadata["updated"], "2024-06-01T09:00");
        assert!(!outcome.created_written);
    }

    #[test]
    fn test_created_is_set_once() {
        let mut metadata = Metadata::new();
        run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        run(&mut metadata, "2025-01-01T00:00:00Z", "2025-01-01T00:00:00Z");

        assert_eq!(metadata["created"], "2024-01-01T00:00");
        assert_eq!(metadata["updated"], "2025-01-01T00:00");
    }

    #[test]
    fn test_falsy_created_is_replaced() {
        for existing in ["created: ''", "created: null", "created: false", "created: 0"] {
            let mut metadata = yaml(existing);
            let outcome = run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");

            assert_eq!(metadata["created"], "2024-01-01T00:00", "for {existing}");
            assert!(outcome.created_written);
        }
    }

    #[test]
    fn test_updated_always_overwritten_in_place() {
        let mut metadata = yaml("updated: 1999-01-01T00:00\ntitle: X\ncreated: 2020-01-01T00:00");
        run(&mut metadata, "2024-01-01T00:00:00Z", "2024-03-04T05:06:00Z");

        assert_eq!(keys(&metadata), vec!["updated", "title", "created"]);
        assert_eq!(metadata["updated"], "2024-03-04T05:06");
    }

    #[test]
    fn test_second_call_with_same_instant_is_unchanged() {
        let mut metadata = Metadata::new();
        run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-02T10:30:00Z");
        let snapshot = metadata.clone();

        let outcome = run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-02T10:30:59Z");

        assert_eq!(metadata, snapshot);
        assert!(!outcome.changed);
        assert!(!outcome.created_written);
    }

    #[test]
    fn test_unrelated_values_of_any_type_preserved() {
        let source = "\
tags: [a, b]
nested:
  deep: {x: 1}
count: 3
ratio: 0.5
flag: true
empty: null
aliases: !custom value
";
        let mut metadata = yaml(source);
        let before = metadata.clone();

        run(&mut metadata, "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");

        for (key, value) in &before {
            assert_eq!(metadata.get(key), Some(value), "{key} changed");
        }
        assert_eq!(
            keys(&metadata),
            vec!["tags", "nested", "count", "ratio", "flag", "empty", "aliases", "created", "updated"]
        );
    }

    #[test]
    fn test_custom_fields_and_formatter() {
        let mut metadata = Metadata::new();
        let fields = MetadataFields {
            created: "born",
            modified: "touched",
        };

        apply(
            &mut metadata,
            &at("2024-01-01T00:00:00Z"),
            &at("2024-01-02T00:00:00Z"),
            fields,
            &DateFormat::parse("DD.MM.YYYY"),
        );

        assert_eq!(keys(&metadata), vec!["born", "touched"]);
        assert_eq!(metadata["born"], "01.01.2024");
        assert_eq!(metadata["touched"], "02.01.2024");
    }

    #[test]
    fn test_same_name_for_both_fields() {
        let mut metadata = Metadata::new();
        let fields = MetadataFields {
            created: "date",
            modified: "date",
        };

        apply(
            &mut metadata,
            &at("2024-01-01T00:00:00Z"),
            &at("2024-01-02T00:00:00Z"),
            fields,
            &DateFormat::default(),
        );

        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["date"], "2024-01-02T00:00");
    }
}
