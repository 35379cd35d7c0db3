//! On-disk front matter
//!
//! Markdown documents carry their metadata in a YAML block delimited by `---`
//! lines at the very top of the file:
//!
//! ```text
//! ---
//! title: Groceries
//! created: 2024-01-01T00:00
//! ---
//! Body text is never parsed.
//! ```
//!
//! Updates are written back line by line where possible: only the lines of
//! keys whose values changed are replaced and new keys are appended, so
//! comments, quoting and layout of everything else survive untouched. If a
//! patch cannot be applied safely the block is re-serialized as a whole.

use crate::vault::to_instant;
use crate::{Error, Result};
use frontdate_core::{FileDescriptor, Metadata, MetadataStore};
use serde_yaml::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DELIMITER: &str = "---";
const BOM: char = '\u{feff}';

/// A document split around its front-matter block
struct Split<'a> {
    newline: &'static str,
    /// YAML between the delimiters, `None` if the document has no block
    yaml: Option<&'a str>,
    /// Everything after the closing delimiter line (the whole text if no block)
    body: &'a str,
}

fn split(content: &str) -> Split<'_> {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let no_block = Split {
        newline,
        yaml: None,
        body: content,
    };

    let Some(after_open) = content
        .strip_prefix(DELIMITER)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
    else {
        return no_block;
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Split {
                newline,
                yaml: Some(&after_open[..offset]),
                body: &after_open[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    no_block
}

fn parse_error(path: &str, message: impl ToString) -> Error {
    Error::FrontMatterParse {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn serialize_error(path: &str, message: impl ToString) -> Error {
    Error::FrontMatterSerialize {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// Parse a front-matter block into an ordered map
///
/// A block with nothing but blank lines and comments is an empty map.
pub fn parse_metadata(yaml: &str, path: &str) -> Result<Metadata> {
    let has_content = yaml.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(Metadata::new());
    }

    match serde_yaml::from_str::<Value>(yaml).map_err(|e| parse_error(path, e))? {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| Ok((key_text(key, path)?, value)))
            .collect(),
        other => Err(parse_error(
            path,
            format!("expected a mapping, found {}", kind(&other)),
        )),
    }
}

/// Scalar keys are read as their plain text, like `2024` or `true`
fn key_text(key: Value, path: &str) -> Result<String> {
    match key {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(parse_error(
            path,
            format!("unsupported key, found {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn with_newline(text: String, newline: &str) -> String {
    if newline == "\n" {
        text
    } else {
        text.replace('\n', newline)
    }
}

fn render_full(metadata: &Metadata, newline: &str, path: &str) -> Result<String> {
    if metadata.is_empty() {
        return Ok(String::new());
    }
    let yaml = serde_yaml::to_string(metadata).map_err(|e| serialize_error(path, e))?;
    Ok(with_newline(yaml, newline))
}

fn render_entry(key: &str, value: &Value, newline: &str) -> Option<String> {
    let mut single = Metadata::new();
    single.insert(key.to_string(), value.clone());
    serde_yaml::to_string(&single)
        .ok()
        .map(|yaml| with_newline(yaml, newline))
}

fn is_key_line(line: &str, key: &str) -> bool {
    [key.to_string(), format!("\"{key}\""), format!("'{key}'")]
        .iter()
        .any(|candidate| {
            line.strip_prefix(candidate.as_str())
                .and_then(|rest| rest.trim_start_matches([' ', '\t']).strip_prefix(':'))
                .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '\r', '\n']))
        })
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
        || line.trim().is_empty()
        || line.starts_with("- ")
        || line.trim_end() == "-"
}

/// Line range `[start, end)` holding a top-level key and its value
fn find_entry(lines: &[String], key: &str) -> Option<(usize, usize)> {
    let start = lines.iter().position(|line| is_key_line(line, key))?;

    let mut end = start + 1;
    while end < lines.len() && is_continuation(&lines[end]) {
        end += 1;
    }
    // Trailing blank lines and comments belong to whatever follows
    while end > start + 1 && {
        let line = lines[end - 1].trim();
        line.is_empty() || line.starts_with('#')
    } {
        end -= 1;
    }

    Some((start, end))
}

/// Rewrite only what changed between `before` and `after`
///
/// Returns `None` when keys were removed or reordered, when a key cannot be
/// located, or when the patched text does not parse back to `after`.
fn patch(original: &str, before: &Metadata, after: &Metadata, newline: &str) -> Option<String> {
    if before.keys().any(|key| !after.contains_key(key))
        || !after.keys().take(before.len()).eq(before.keys())
    {
        return None;
    }

    let mut lines: Vec<String> = original.split_inclusive('\n').map(str::to_string).collect();
    if let Some(last) = lines.last_mut()
        && !last.ends_with('\n')
    {
        last.push_str(newline);
    }

    for (key, value) in after.iter().take(before.len()) {
        if before.get(key) == Some(value) {
            continue;
        }
        let (start, end) = find_entry(&lines, key)?;
        let entry = render_entry(key, value, newline)?;
        lines.splice(start..end, std::iter::once(entry));
    }

    for (key, value) in after.iter().skip(before.len()) {
        lines.push(render_entry(key, value, newline)?);
    }

    let patched = lines.concat();
    let reparsed = parse_metadata(&patched, "").ok()?;
    (reparsed == *after).then_some(patched)
}

/// Run `mutator` against a document's front matter and render the result
///
/// Returns `Ok(None)` when the mutation left the metadata unchanged, so the
/// caller can skip writing. A document without a block gets one prepended.
///
/// # Errors
///
/// Returns error if the existing block is not a valid YAML mapping or the
/// result cannot be serialized. The mutator is not called on parse failure.
pub fn update_document<F>(content: &str, path: &str, mutator: F) -> Result<Option<String>>
where
    F: FnOnce(&mut Metadata),
{
    let (bom, content) = match content.strip_prefix(BOM) {
        Some(rest) => (BOM.to_string(), rest),
        None => (String::new(), content),
    };

    let split = split(content);
    let before = match split.yaml {
        Some(yaml) => parse_metadata(yaml, path)?,
        None => Metadata::new(),
    };

    let mut after = before.clone();
    mutator(&mut after);

    if after == before {
        return Ok(None);
    }

    let newline = split.newline;
    let yaml = match split.yaml {
        Some(original) => match patch(original, &before, &after, newline) {
            Some(patched) => patched,
            None => {
                tracing::debug!(path, "Re-serializing front matter");
                render_full(&after, newline, path)?
            }
        },
        None => render_full(&after, newline, path)?,
    };

    Ok(Some(format!(
        "{bom}{DELIMITER}{newline}{yaml}{DELIMITER}{newline}{}",
        split.body
    )))
}

/// Replace `path` with `contents` via a temp file in the same directory
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_error = |source: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(contents).map_err(write_error)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}

/// [`MetadataStore`] over Markdown files on disk
///
/// Reads the whole file, applies the mutation to the parsed front matter and
/// commits with an atomic rename. A parse failure or a mutation that changes
/// nothing leaves the file untouched.
#[derive(Debug, Clone)]
pub struct FrontMatterStore {
    root: PathBuf,
}

impl FrontMatterStore {
    /// Store for documents under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of a document
    pub fn resolve(&self, file: &FileDescriptor) -> PathBuf {
        self.root.join(file.path())
    }
}

impl MetadataStore for FrontMatterStore {
    async fn with_metadata<F>(&self, file: &FileDescriptor, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Metadata),
    {
        let path = self.resolve(file);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::FileRead {
                path: path.clone(),
                source,
            })?;

        let Some(updated) = update_document(&content, file.path(), mutator)? else {
            tracing::debug!(path = file.path(), "Front matter unchanged, skipping write");
            return Ok(());
        };

        tokio::task::spawn_blocking(move || write_atomic(&path, updated.as_bytes()))
            .await
            .map_err(|e| Error::Message(format!("Write task failed: {e}")))?
    }

    async fn refresh(&self, file: &FileDescriptor) -> Result<FileDescriptor> {
        let path = self.resolve(file);
        let read_error = |source| Error::FileRead {
            path: path.clone(),
            source,
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(read_error)?;
        let modified = metadata.modified().map_err(read_error)?;
        let created = metadata.created().unwrap_or(modified);

        Ok(FileDescriptor::new(
            file.path(),
            to_instant(modified),
            to_instant(created),
        ))
    }
}
