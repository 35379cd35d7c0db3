//! Ordered front-matter map

use indexmap::IndexMap;
use serde_yaml::Value;

/// A document's front-matter block as an ordered key/value map
///
/// Insertion order is the order keys appear in the document. Re-inserting an
/// existing key keeps its position; new keys are appended.
pub type Metadata = IndexMap<String, Value>;

/// Whether a front-matter value counts as "set"
///
/// Null, `false`, the empty string and numeric zero (or NaN) are falsy.
/// Everything else is truthy, including empty sequences and mappings.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}
