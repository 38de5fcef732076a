//! Dotted-path resolution over nested values.

use serde_json::Value;
use thiserror::Error;

/// Why a path could not be walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    /// No segments were given.
    #[error("empty path")]
    EmptyPath,
    /// The current mapping has no such key.
    #[error("key '{0}' not found")]
    MissingKey(String),
    /// The segment is a valid index but the sequence is too short.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Sequence length
        len: usize,
    },
    /// The current value is a sequence but the segment is not a non-negative integer.
    #[error("'{0}' is not a valid sequence index")]
    NotAnIndex(String),
    /// The current value is a scalar or null and cannot be descended into.
    #[error("cannot look up '{segment}' in a {kind}")]
    NotTraversable {
        /// The segment we tried to apply
        segment: String,
        /// Kind of the value found
        kind: &'static str,
    },
}

/// A failed lookup together with the portion of the path that did resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at {}", display_path(.path_so_far))]
pub struct ResolutionError {
    /// What went wrong
    pub reason: ResolutionFailure,
    /// Dotted path walked successfully before the failure (empty = root)
    pub path_so_far: String,
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        format!("'{}'", path)
    }
}

/// Name of a value's kind, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Walk `root` one segment at a time.
///
/// Mappings are descended by key, sequences by non-negative integer index.
/// Any other combination fails with the path walked so far.
pub fn resolve<'v, S: AsRef<str>>(
    root: &'v Value,
    path: &[S],
) -> Result<&'v Value, ResolutionError> {
    if path.is_empty() {
        return Err(ResolutionError {
            reason: ResolutionFailure::EmptyPath,
            path_so_far: String::new(),
        });
    }

    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        let segment = segment.as_ref();
        let fail = |reason| ResolutionError {
            reason,
            path_so_far: join(&path[..depth]),
        };

        current = match current {
            Value::Object(map) => map
                .get(segment)
                .ok_or_else(|| fail(ResolutionFailure::MissingKey(segment.to_string())))?,
            Value::Array(items) => {
                let index = parse_index(segment)
                    .ok_or_else(|| fail(ResolutionFailure::NotAnIndex(segment.to_string())))?;
                items.get(index).ok_or_else(|| {
                    fail(ResolutionFailure::IndexOutOfRange {
                        index,
                        len: items.len(),
                    })
                })?
            }
            other => {
                return Err(fail(ResolutionFailure::NotTraversable {
                    segment: segment.to_string(),
                    kind: value_kind(other),
                }))
            }
        };
    }

    Ok(current)
}

/// Parse a strictly non-negative decimal index ("+1" and "-0" are rejected).
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "recipient": {"title_and_name": "Mr J Smith"},
            "funds": [
                {"name": "Global Equity", "value": 1200.5},
                {"name": "Cash", "value": 0}
            ],
            "flag": true
        })
    }

    #[test]
    fn test_resolve_mapping_key() {
        let root = sample();
        let value = resolve(&root, &["recipient", "title_and_name"]).unwrap();
        assert_eq!(value, &json!("Mr J Smith"));
    }

    #[test]
    fn test_resolve_sequence_index() {
        let root = sample();
        let value = resolve(&root, &["funds", "1", "name"]).unwrap();
        assert_eq!(value, &json!("Cash"));
    }

    #[test]
    fn test_empty_path() {
        let root = sample();
        let empty: [&str; 0] = [];
        let err = resolve(&root, &empty).unwrap_err();
        assert_eq!(err.reason, ResolutionFailure::EmptyPath);
    }

    #[test]
    fn test_missing_key_reports_path_so_far() {
        let root = sample();
        let err = resolve(&root, &["recipient", "address"]).unwrap_err();
        assert_eq!(
            err.reason,
            ResolutionFailure::MissingKey("address".to_string())
        );
        assert_eq!(err.path_so_far, "recipient");
    }

    #[test]
    fn test_index_out_of_range() {
        let root = sample();
        let err = resolve(&root, &["funds", "5"]).unwrap_err();
        assert_eq!(
            err.reason,
            ResolutionFailure::IndexOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_non_integer_segment_on_sequence() {
        let root = sample();
        for bad in ["name", "-1", "+1", "1.0", ""] {
            let err = resolve(&root, &["funds", bad]).unwrap_err();
            assert!(
                matches!(err.reason, ResolutionFailure::NotAnIndex(_)),
                "segment {:?} should not be an index",
                bad
            );
        }
    }

    #[test]
    fn test_descend_into_scalar() {
        let root = sample();
        let err = resolve(&root, &["flag", "x"]).unwrap_err();
        assert_eq!(
            err.reason,
            ResolutionFailure::NotTraversable {
                segment: "x".to_string(),
                kind: "boolean"
            }
        );
        assert_eq!(err.to_string(), "cannot look up 'x' in a boolean at 'flag'");
    }

    #[test]
    fn test_resolve_does_not_mutate() {
        let root = sample();
        let before = root.clone();
        let _ = resolve(&root, &["funds", "0", "missing"]);
        assert_eq!(root, before);
    }
}
