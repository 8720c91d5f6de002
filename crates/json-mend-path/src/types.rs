//! Type definitions for path resolution.

use serde_json::Value;

/// A single path segment.
pub type PathStep = String;

/// An ordered list of path segments.
pub type Path = Vec<PathStep>;

/// The result of resolving a path against a document.
///
/// `parent` is the container holding the addressed value (`None` only for
/// the root path), `key` the final segment, `exists` whether the addressed
/// value is present, and `value` the resolved value when it exists. When
/// resolution short-circuits on a missing intermediate ancestor, `parent`
/// and `key` identify the last location reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub parent: Option<Value>,
    pub key: Option<String>,
    pub exists: bool,
    pub value: Option<Value>,
}

impl Resolved {
    /// The root resolution: the document itself, with no parent.
    pub fn root(value: Value) -> Self {
        Resolved {
            parent: None,
            key: None,
            exists: true,
            value: Some(value),
        }
    }

    /// Check if this resolution denotes the document root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if the addressed location sits inside an array.
    pub fn in_array(&self) -> bool {
        matches!(&self.parent, Some(Value::Array(_)))
    }

    /// Check if the addressed location sits inside an object.
    pub fn in_object(&self) -> bool {
        matches!(&self.parent, Some(Value::Object(_)))
    }

    /// The numeric index, when the location sits inside an array.
    pub fn index(&self) -> Option<usize> {
        if !self.in_array() {
            return None;
        }
        self.key.as_ref().and_then(|k| k.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_resolution() {
        let r = Resolved::root(json!({"a": 1}));
        assert!(r.is_root());
        assert!(r.exists);
        assert!(!r.in_array());
        assert!(!r.in_object());
    }

    #[test]
    fn array_index_accessor() {
        let r = Resolved {
            parent: Some(json!([1, 2, 3])),
            key: Some("1".to_string()),
            exists: true,
            value: Some(json!(2)),
        };
        assert!(r.in_array());
        assert_eq!(r.index(), Some(1));
    }

    #[test]
    fn object_key_has_no_index() {
        let r = Resolved {
            parent: Some(json!({"0": "zero"})),
            key: Some("0".to_string()),
            exists: true,
            value: Some(json!("zero")),
        };
        assert!(r.in_object());
        assert_eq!(r.index(), None);
    }
}
