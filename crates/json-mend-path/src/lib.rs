//! Simplified JSONPath-style addressing.
//!
//! Paths are strings with an optional leading `$` (root marker) followed by
//! `.name` (object property) and `[n]` (array index) segments. A bare `$` or
//! the empty string denotes the root value itself.
//!
//! Unlike full JSONPath there are no wildcards, filters, unions, or recursive
//! descent. Array-vs-object disambiguation is structural, not syntactic: a
//! numeric segment is treated as an index only when the value it is applied
//! to is an array, so `$.a[0]` and `$.a.0` are equivalent when `a` is an
//! array, while `0` names a literal property when `a` is an object.
//!
//! # Example
//!
//! ```
//! use json_mend_path::{parse_path, get, resolve};
//! use serde_json::json;
//!
//! let steps = parse_path("$.items[0].name");
//! assert_eq!(steps, vec!["items".to_string(), "0".to_string(), "name".to_string()]);
//!
//! let doc = json!({"items": [{"name": "first"}]});
//! assert_eq!(get(&doc, &steps), Some(&json!("first")));
//!
//! let r = resolve(&doc, "$.items[1]");
//! assert!(!r.exists);
//! ```

use serde_json::Value;

pub mod types;
pub use types::{Path, PathStep, Resolved};

pub mod validate;
pub use validate::{validate_path, ValidationError};

/// Parse a path expression into its ordered segments.
///
/// Strips a leading `$`, then splits on `.`, `[`, and `]`, discarding empty
/// tokens. The root path (`"$"` or `""`) yields an empty vector.
///
/// # Example
///
/// ```
/// use json_mend_path::parse_path;
///
/// assert_eq!(parse_path("$"), Vec::<String>::new());
/// assert_eq!(parse_path("$.a[0].b"), vec!["a", "0", "b"]);
/// assert_eq!(parse_path("a.b"), vec!["a", "b"]);
/// ```
pub fn parse_path(path: &str) -> Path {
    let trimmed = path.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
    rest.split(['.', '[', ']'])
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Format path segments back into a path expression.
///
/// Numeric segments are rendered in bracket form; the root renders as `$`.
///
/// # Example
///
/// ```
/// use json_mend_path::format_path;
///
/// assert_eq!(format_path(&[]), "$");
/// assert_eq!(format_path(&["a".to_string(), "0".to_string()]), "$.a[0]");
/// ```
pub fn format_path(steps: &[String]) -> String {
    let mut out = String::from("$");
    for step in steps {
        if is_valid_index(step) {
            out.push('[');
            out.push_str(step);
            out.push(']');
        } else {
            out.push('.');
            out.push_str(step);
        }
    }
    out
}

/// Check if a path denotes the root value.
pub fn is_root(steps: &[String]) -> bool {
    steps.is_empty()
}

/// Check if a segment is a valid non-negative array index.
///
/// # Example
///
/// ```
/// use json_mend_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("name"));
/// ```
pub fn is_valid_index(step: &str) -> bool {
    if step.is_empty() {
        return false;
    }
    let bytes = step.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Parse a segment as an array index, if it is one.
pub fn array_index(step: &str) -> Option<usize> {
    if is_valid_index(step) {
        step.parse().ok()
    } else {
        None
    }
}

/// Walk segments through a value, returning the addressed value if the whole
/// path exists.
///
/// # Example
///
/// ```
/// use json_mend_path::{get, parse_path};
/// use serde_json::json;
///
/// let doc = json!({"a": [10, 20]});
/// assert_eq!(get(&doc, &parse_path("$.a[1]")), Some(&json!(20)));
/// assert_eq!(get(&doc, &parse_path("$.a[2]")), None);
/// ```
pub fn get<'a>(val: &'a Value, steps: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for step in steps {
        current = match current {
            Value::Array(arr) => arr.get(array_index(step)?)?,
            Value::Object(map) => map.get(step)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable variant of [`get`].
pub fn get_mut<'a>(val: &'a mut Value, steps: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in steps {
        current = match current {
            Value::Array(arr) => arr.get_mut(array_index(step)?)?,
            Value::Object(map) => map.get_mut(step)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a path expression against a document.
///
/// Returns the parent container, the final key, an existence flag, and the
/// resolved value when it exists. The root path resolves to the document
/// itself with no parent. A missing or null intermediate ancestor
/// short-circuits resolution: the result reports non-existence with the
/// parent and key reached so far, and no ancestors are synthesized.
///
/// A final object property whose stored value is `null` still exists; array
/// index existence is `0 <= index < len`.
///
/// # Example
///
/// ```
/// use json_mend_path::resolve;
/// use serde_json::json;
///
/// let doc = json!({"items": ["x", "y"]});
/// let r = resolve(&doc, "$.items[0]");
/// assert!(r.exists);
/// assert_eq!(r.value, Some(json!("x")));
///
/// let r = resolve(&doc, "$.missing.deep");
/// assert!(!r.exists);
/// ```
pub fn resolve(doc: &Value, path: &str) -> Resolved {
    let steps = parse_path(path);
    if steps.is_empty() {
        return Resolved::root(doc.clone());
    }

    let mut current = doc;
    let last = steps.len() - 1;
    for step in &steps[..last] {
        let next = match current {
            Value::Array(arr) => array_index(step).and_then(|idx| arr.get(idx)),
            Value::Object(map) => map.get(step),
            _ => None,
        };
        match next {
            Some(v) if !v.is_null() => current = v,
            _ => {
                return Resolved {
                    parent: Some(current.clone()),
                    key: Some(step.clone()),
                    exists: false,
                    value: None,
                }
            }
        }
    }

    let step = &steps[last];
    let (exists, value) = match current {
        Value::Array(arr) => match array_index(step) {
            Some(idx) => (idx < arr.len(), arr.get(idx).cloned()),
            None => (false, None),
        },
        Value::Object(map) => (map.contains_key(step), map.get(step).cloned()),
        _ => (false, None),
    };
    Resolved {
        parent: Some(current.clone()),
        key: Some(step.clone()),
        exists,
        value,
    }
}
