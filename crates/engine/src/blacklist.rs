//! Blacklist evaluation
//!
//! Decides whether a document is excluded from automatic processing. Rules are
//! checked in a fixed order and the first match is reported:
//!
//! 0. Anything that is not a Markdown document (not configurable)
//! 1. `folders`: path starts with `folder/` or contains `/folder/`
//! 2. `filenames`: exact, case-sensitive name match
//! 3. `extensions`: `"." + extension` equals the entry exactly
//! 4. `patterns`: case-insensitive regex matching the name or the path
//!
//! Blank entries are never rules. A pattern that fails to compile is logged
//! and skipped; it never blacklists a file by itself.

use frontdate_config::BlacklistRules;
use frontdate_core::{DOCUMENT_EXTENSION, FileDescriptor};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Why a file was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not a Markdown document
    NotADocument {
        /// The file's extension
        extension: String,
    },
    /// Matched a folder entry
    Folder(String),
    /// Matched a filename entry
    Filename(String),
    /// Matched an extension entry
    Extension(String),
    /// Matched a regex pattern
    Pattern(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADocument { extension } if extension.is_empty() => {
                write!(f, "not a .{DOCUMENT_EXTENSION} document")
            }
            Self::NotADocument { extension } => {
                write!(f, "not a .{DOCUMENT_EXTENSION} document (.{extension})")
            }
            Self::Folder(folder) => write!(f, "folder \"{folder}\""),
            Self::Filename(name) => write!(f, "filename \"{name}\""),
            Self::Extension(extension) => write!(f, "extension \"{extension}\""),
            Self::Pattern(pattern) => write!(f, "pattern \"{pattern}\""),
        }
    }
}

/// Outcome of evaluating a file against the blacklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The file may be processed
    Accepted,
    /// The file must be left alone
    Ignored(IgnoreReason),
}

impl Verdict {
    /// Whether the file is ignored
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// The reason, if ignored
    pub fn reason(&self) -> Option<&IgnoreReason> {
        match self {
            Self::Accepted => None,
            Self::Ignored(reason) => Some(reason),
        }
    }
}

fn rules(list: &[String]) -> impl Iterator<Item = &str> {
    list.iter()
        .map(String::as_str)
        .filter(|entry| !entry.trim().is_empty())
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Evaluate `file` against `blacklist`
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use frontdate_config::BlacklistRules;
/// use frontdate_core::FileDescriptor;
/// use frontdate_engine::blacklist::{IgnoreReason, Verdict, evaluate};
///
/// let at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// let file = FileDescriptor::new("_templates/note.md", at, at);
///
/// assert_eq!(
///     evaluate(&file, &BlacklistRules::default()),
///     Verdict::Ignored(IgnoreReason::Folder("_templates".into()))
/// );
/// ```
pub fn evaluate(file: &FileDescriptor, blacklist: &BlacklistRules) -> Verdict {
    if !file.is_document() {
        return Verdict::Ignored(IgnoreReason::NotADocument {
            extension: file.extension().to_string(),
        });
    }

    let path = file.path();
    let name = file.name();

    for folder in rules(&blacklist.folders) {
        if path.starts_with(&format!("{folder}/")) || path.contains(&format!("/{folder}/")) {
            tracing::debug!(path, folder, "Blacklisted by folder");
            return Verdict::Ignored(IgnoreReason::Folder(folder.to_string()));
        }
    }

    if let Some(filename) = rules(&blacklist.filenames).find(|entry| *entry == name) {
        tracing::debug!(path, filename, "Blacklisted by filename");
        return Verdict::Ignored(IgnoreReason::Filename(filename.to_string()));
    }

    let extension = format!(".{}", file.extension());
    if let Some(entry) = rules(&blacklist.extensions).find(|entry| *entry == extension) {
        tracing::debug!(path, extension = entry, "Blacklisted by extension");
        return Verdict::Ignored(IgnoreReason::Extension(entry.to_string()));
    }

    for pattern in rules(&blacklist.patterns) {
        match compile(pattern) {
            Ok(regex) => {
                if regex.is_match(name) || regex.is_match(path) {
                    tracing::debug!(path, pattern, "Blacklisted by pattern");
                    return Verdict::Ignored(IgnoreReason::Pattern(pattern.to_string()));
                }
            }
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Skipping invalid blacklist pattern");
            }
        }
    }

    Verdict::Accepted
}

/// Whether `file` is excluded by `blacklist`
pub fn is_ignored(file: &FileDescriptor, blacklist: &BlacklistRules) -> bool {
    evaluate(file, blacklist).is_ignored()
}

/// Patterns that do not compile, with the compiler's message
pub fn invalid_patterns(blacklist: &BlacklistRules) -> Vec<(String, String)> {
    rules(&blacklist.patterns)
        .filter_map(|pattern| {
            compile(pattern)
                .err()
                .map(|e| (pattern.to_string(), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use chrono::DateTime;

    fn file(path: &str) -> FileDescriptor {
        let at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        FileDescriptor::new(path, at, at)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn only_patterns(patterns: &[&str]) -> BlacklistRules {
        BlacklistRules {
            patterns: strings(patterns),
            ..BlacklistRules::empty()
        }
    }

    #[test]
    fn test_non_documents_always_ignored() {
        let empty = BlacklistRules::empty();

        for path in ["script.js", "data.json", "LICENSE", "image.png", "notes/md"] {
            let verdict = evaluate(&file(path), &empty);
            assert!(verdict.is_ignored(), "{path} should be ignored");
            assert!(matches!(verdict.reason(), Some(IgnoreReason::NotADocument { .. })));
        }
    }

    #[test]
    fn test_document_with_empty_rules_accepted() {
        assert_eq!(evaluate(&file("notes/today.md"), &BlacklistRules::empty()), Verdict::Accepted);
    }

    #[test]
    fn test_uppercase_extension_is_a_document() {
        assert!(!is_ignored(&file("notes/Today.MD"), &BlacklistRules::empty()));
    }

    #[test]
    fn test_templates_folder_scenario() {
        let verdict = evaluate(&file("_templates/note.md"), &BlacklistRules::default());
        assert_eq!(verdict, Verdict::Ignored(IgnoreReason::Folder("_templates".into())));
    }

    #[test]
    fn test_license_filename_scenario() {
        let verdict = evaluate(&file("notes/LICENSE.md"), &BlacklistRules::default());
        assert_eq!(verdict, Verdict::Ignored(IgnoreReason::Filename("LICENSE.md".into())));
    }

    #[test]
    fn test_folder_matches_top_level_and_nested() {
        let rules = BlacklistRules {
            folders: strings(&["archive"]),
            ..BlacklistRules::empty()
        };

        assert!(is_ignored(&file("archive/old.md"), &rules));
        assert!(is_ignored(&file("projects/archive/old.md"), &rules));
        assert!(is_ignored(&file("a/b/archive/c/old.md"), &rules));
    }

    #[test]
    fn test_folder_does_not_match_partial_segment_or_filename() {
        let rules = BlacklistRules {
            folders: strings(&["archive"]),
            ..BlacklistRules::empty()
        };

        assert!(!is_ignored(&file("archives/old.md"), &rules));
        assert!(!is_ignored(&file("my-archive/old.md"), &rules));
        assert!(!is_ignored(&file("notes/archive.md"), &rules));
        assert!(!is_ignored(&file("archive.md"), &rules));
    }

    #[test]
    fn test_nested_folder_entry() {
        let rules = BlacklistRules {
            folders: strings(&["daily/private"]),
            ..BlacklistRules::empty()
        };

        assert!(is_ignored(&file("daily/private/x.md"), &rules));
        assert!(is_ignored(&file("journal/daily/private/x.md"), &rules));
        assert!(!is_ignored(&file("daily/public/x.md"), &rules));
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let rules = BlacklistRules {
            folders: strings(&["", "   "]),
            filenames: strings(&["", " "]),
            extensions: strings(&["", "\t"]),
            patterns: strings(&["", "  "]),
        };

        // A blank folder would otherwise match every path containing "//" or "/ /"
        assert!(!is_ignored(&file("notes/today.md"), &rules));
        assert!(!is_ignored(&file(" /today.md"), &rules));
    }

    #[test]
    fn test_filename_is_exact_and_case_sensitive() {
        let rules = BlacklistRules {
            filenames: strings(&["README.md"]),
            ..BlacklistRules::empty()
        };

        assert!(is_ignored(&file("README.md"), &rules));
        assert!(is_ignored(&file("docs/README.md"), &rules));
        assert!(!is_ignored(&file("readme.md"), &rules));
        assert!(!is_ignored(&file("README.md.md"), &rules));
        assert!(!is_ignored(&file("OLD-README.md"), &rules));
    }

    #[test]
    fn test_extension_requires_leading_dot() {
        let with_dot = BlacklistRules {
            extensions: strings(&[".md"]),
            ..BlacklistRules::empty()
        };
        let without_dot = BlacklistRules {
            extensions: strings(&["md"]),
            ..BlacklistRules::empty()
        };

        assert_eq!(
            evaluate(&file("x.md"), &with_dot),
            Verdict::Ignored(IgnoreReason::Extension(".md".into()))
        );
        assert!(!is_ignored(&file("x.md"), &without_dot));
    }

    #[test]
    fn test_pattern_matches_name_or_path_case_insensitively() {
        let rules = only_patterns(&["^draft-", "/scratch/"]);

        assert!(is_ignored(&file("notes/Draft-ideas.md"), &rules));
        assert!(is_ignored(&file("work/SCRATCH/ideas.md"), &rules));
        assert!(!is_ignored(&file("notes/final-draft-ideas.md"), &rules));
    }

    #[test]
    fn test_pattern_can_match_whole_path() {
        let rules = only_patterns(&[r"^journal/\d{4}/"]);

        assert!(is_ignored(&file("journal/2024/01.md"), &rules));
        assert!(!is_ignored(&file("journal/misc/01.md"), &rules));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = only_patterns(&["([unclosed", "secret"]);

        assert!(!is_ignored(&file("notes/today.md"), &rules));
        assert_eq!(
            evaluate(&file("notes/secret.md"), &rules),
            Verdict::Ignored(IgnoreReason::Pattern("secret".into()))
        );
    }

    #[test]
    fn test_only_invalid_patterns_never_blacklist() {
        let rules = only_patterns(&["(", "[", "*"]);
        assert!(!is_ignored(&file("(.md"), &rules));
    }

    #[test]
    fn test_first_match_wins_in_fixed_order() {
        let rules = BlacklistRules {
            folders: strings(&["private"]),
            filenames: strings(&["secret.md"]),
            extensions: strings(&[".md"]),
            patterns: strings(&["secret"]),
        };

        assert_eq!(
            evaluate(&file("private/secret.md"), &rules),
            Verdict::Ignored(IgnoreReason::Folder("private".into()))
        );
        assert_eq!(
            evaluate(&file("public/secret.md"), &rules),
            Verdict::Ignored(IgnoreReason::Filename("secret.md".into()))
        );
        assert_eq!(
            evaluate(&file("public/other.md"), &rules),
            Verdict::Ignored(IgnoreReason::Extension(".md".into()))
        );
    }

    #[test]
    fn test_first_matching_folder_is_reported() {
        let rules = BlacklistRules {
            folders: strings(&["b", "a"]),
            ..BlacklistRules::empty()
        };

        assert_eq!(
            evaluate(&file("a/b/c.md"), &rules),
            Verdict::Ignored(IgnoreReason::Folder("b".into()))
        );
    }

    #[test]
    fn test_invalid_patterns_listing() {
        let rules = only_patterns(&["ok", "(", " ", "[z-a]"]);
        let invalid: Vec<_> = invalid_patterns(&rules).into_iter().map(|(p, _)| p).collect();

        assert_eq!(invalid, vec!["(", "[z-a]"]);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(IgnoreReason::Folder("_templates".into()).to_string(), "folder \"_templates\"");
        assert_eq!(
            IgnoreReason::NotADocument { extension: "js".into() }.to_string(),
            "not a .md document (.js)"
        );
        assert_eq!(
            IgnoreReason::NotADocument { extension: String::new() }.to_string(),
            "not a .md document"
        );
    }
}
