//! Pure document mutators.
//!
//! Every mutator clones the document first and returns a new value; caller
//! state is never touched. `set_at` and `remove_at` are deliberately
//! permissive about unreachable locations (they no-op) so that move and
//! batch execution can reuse them after validating existence themselves;
//! user-facing verbs that must surface path-not-found check existence with
//! [`json_mend_path::resolve`] before calling in here.

use serde_json::Value;

use json_mend_path::{array_index, get_mut, parse_path, resolve};

/// Set the value at a path, creating the final key if absent.
///
/// The root path replaces the whole document. Missing intermediate ancestors
/// are never created: when the parent of the final segment cannot be
/// reached, the clone is returned unchanged. An in-range array index
/// overwrites; past the end the array is null-padded up to the index and the
/// value appended.
pub fn set_at(doc: &Value, path: &str, value: Value) -> Value {
    let steps = parse_path(path);
    if steps.is_empty() {
        return value;
    }
    let mut out = doc.clone();
    let (parent_steps, last) = steps.split_at(steps.len() - 1);
    let key = &last[0];
    if let Some(parent) = get_mut(&mut out, parent_steps) {
        match parent {
            Value::Object(map) => {
                map.insert(key.clone(), value);
            }
            Value::Array(arr) => {
                if let Some(idx) = array_index(key) {
                    if idx < arr.len() {
                        arr[idx] = value;
                    } else {
                        while arr.len() < idx {
                            arr.push(Value::Null);
                        }
                        arr.push(value);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Remove the value at a path.
///
/// A missing path is a no-op, not an error. Array parents splice the element
/// out (no gap); object parents delete the key entirely.
pub fn remove_at(doc: &Value, path: &str) -> Value {
    let steps = parse_path(path);
    let mut out = doc.clone();
    if steps.is_empty() {
        return out;
    }
    let (parent_steps, last) = steps.split_at(steps.len() - 1);
    let key = &last[0];
    if let Some(parent) = get_mut(&mut out, parent_steps) {
        match parent {
            Value::Object(map) => {
                map.remove(key);
            }
            Value::Array(arr) => {
                if let Some(idx) = array_index(key) {
                    if idx < arr.len() {
                        arr.remove(idx);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// The value at a path, when it exists.
pub fn get_at(doc: &Value, path: &str) -> Option<Value> {
    let r = resolve(doc, path);
    if r.exists {
        r.value
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_replaces_root() {
        let doc = json!({"a": 1});
        assert_eq!(set_at(&doc, "$", json!([1, 2])), json!([1, 2]));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn set_creates_missing_final_key() {
        let doc = json!({"a": {}});
        assert_eq!(set_at(&doc, "$.a.b", json!(1)), json!({"a": {"b": 1}}));
    }

    #[test]
    fn set_does_not_create_intermediate_ancestors() {
        let doc = json!({"a": 1});
        assert_eq!(set_at(&doc, "$.x.y", json!(1)), doc);
    }

    #[test]
    fn set_overwrites_array_index_in_range() {
        let doc = json!({"a": [1, 2, 3]});
        assert_eq!(set_at(&doc, "$.a[1]", json!(9)), json!({"a": [1, 9, 3]}));
    }

    #[test]
    fn set_pads_array_past_the_end() {
        let doc = json!({"a": [1]});
        assert_eq!(set_at(&doc, "$.a[3]", json!(9)), json!({"a": [1, null, null, 9]}));
    }

    #[test]
    fn remove_splices_array_elements() {
        let doc = json!({"a": [1, 2, 3]});
        assert_eq!(remove_at(&doc, "$.a[1]"), json!({"a": [1, 3]}));
    }

    #[test]
    fn remove_deletes_object_keys() {
        let doc = json!({"a": 1, "b": 2});
        assert_eq!(remove_at(&doc, "$.a"), json!({"b": 2}));
    }

    #[test]
    fn remove_missing_path_is_a_noop() {
        let doc = json!({"a": 1});
        assert_eq!(remove_at(&doc, "$.b"), doc);
    }

    #[test]
    fn mutators_never_touch_the_input() {
        let doc = json!({"a": {"b": [1, 2]}});
        let _ = set_at(&doc, "$.a.b[0]", json!(9));
        let _ = remove_at(&doc, "$.a.b");
        assert_eq!(doc, json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn get_at_missing_is_none() {
        let doc = json!({"a": null});
        assert_eq!(get_at(&doc, "$.a"), Some(json!(null)));
        assert_eq!(get_at(&doc, "$.b"), None);
    }
}
