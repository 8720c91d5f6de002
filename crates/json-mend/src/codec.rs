//! JSON codec for operation descriptors and result records.
//!
//! Descriptors are objects tagged with an `"op"` field; per-verb fields are
//! validated at decode time so handlers only ever see well-formed
//! operations. Result records use camelCase keys and omit absent fields.

use serde_json::{json, Map, Value};

use crate::batch::{BatchResponse, StepOutcome};
use crate::ops::{EngineError, Op, OpOutcome, OpResponse, TestCond, Transform};

// ── Decoding ──────────────────────────────────────────────────────────────

fn require_str(obj: &Map<String, Value>, key: &str, op: &str) -> Result<String, EngineError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| EngineError::InvalidOp(format!("{op} requires '{key}'")))
}

fn require_value(obj: &Map<String, Value>, op: &str) -> Result<Value, EngineError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| EngineError::InvalidOp(format!("{op} requires 'value'")))
}

fn decode_test(obj: &Map<String, Value>, path: String) -> Result<Op, EngineError> {
    let condition = obj
        .get("condition")
        .and_then(Value::as_str)
        .unwrap_or("exists");
    let number = || {
        obj.get("value")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                EngineError::InvalidOp(format!("test condition '{condition}' requires a number 'value'"))
            })
    };
    let cond = match condition {
        "exists" => TestCond::Exists,
        "equals" => TestCond::Equals(require_value(obj, "test 'equals'")?),
        "type" => TestCond::Type(require_str(obj, "value", "test 'type'")?),
        "greater" => TestCond::Greater(number()?),
        "less" => TestCond::Less(number()?),
        "contains" => TestCond::Contains(require_value(obj, "test 'contains'")?),
        other => {
            return Err(EngineError::InvalidOp(format!(
                "unknown test condition: {other}"
            )))
        }
    };
    Ok(Op::Test { path, cond })
}

fn decode_transform(obj: &Map<String, Value>, path: String) -> Result<Op, EngineError> {
    let name = require_str(obj, "transform", "transform")?;
    // Omitted numeric parameter defaults to 1; only an explicit 0 divisor
    // can trip the divide-by-zero failure downstream.
    let number = |default: f64| obj.get("value").and_then(Value::as_f64).unwrap_or(default);
    let transform = match name.as_str() {
        "uppercase" => Transform::Uppercase,
        "lowercase" => Transform::Lowercase,
        "increment" => Transform::Increment(number(1.0)),
        "decrement" => Transform::Decrement(number(1.0)),
        "multiply" => Transform::Multiply(number(1.0)),
        "divide" => Transform::Divide(number(1.0)),
        "sort" => Transform::Sort,
        "reverse" => Transform::Reverse,
        "unique" => Transform::Unique,
        "flatten" => {
            let depth = obj.get("value").and_then(Value::as_u64).unwrap_or(1) as usize;
            Transform::Flatten(depth)
        }
        other => {
            return Err(EngineError::InvalidOp(format!(
                "unknown transform operation: {other}"
            )))
        }
    };
    Ok(Op::Transform { path, transform })
}

/// Decode an operation descriptor from its JSON form.
pub fn from_json(v: &Value) -> Result<Op, EngineError> {
    let obj = v
        .as_object()
        .ok_or_else(|| EngineError::InvalidOp("operation must be an object".into()))?;
    let op = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidOp("missing 'op' field".into()))?;

    match op {
        "read" => Ok(Op::Read),
        "get" => Ok(Op::Get {
            path: require_str(obj, "path", "get")?,
        }),
        "set" => Ok(Op::Set {
            path: require_str(obj, "path", "set")?,
            value: require_value(obj, "set")?,
        }),
        "remove" => Ok(Op::Remove {
            path: require_str(obj, "path", "remove")?,
        }),
        "add" => Ok(Op::Add {
            path: require_str(obj, "path", "add")?,
            value: require_value(obj, "add")?,
            index: obj
                .get("index")
                .and_then(Value::as_i64)
                .map(|i| i.max(0) as usize),
            key: obj.get("key").and_then(Value::as_str).map(str::to_string),
        }),
        "replace" => Ok(Op::Replace {
            path: require_str(obj, "path", "replace")?,
            value: require_value(obj, "replace")?,
            old_value: obj
                .get("oldValue")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        "move" => Ok(Op::Move {
            from: require_str(obj, "from", "move")?,
            to: require_str(obj, "to", "move")?,
        }),
        "copy" => Ok(Op::Copy {
            from: require_str(obj, "from", "copy")?,
            to: require_str(obj, "to", "copy")?,
        }),
        "test" => decode_test(obj, require_str(obj, "path", "test")?),
        "transform" => decode_transform(obj, require_str(obj, "path", "transform")?),
        other => Err(EngineError::InvalidOp(format!("unknown op: {other}"))),
    }
}

/// Decode an ordered batch of operation descriptors.
pub fn from_json_batch(v: &Value) -> Result<Vec<Op>, EngineError> {
    let arr = v
        .as_array()
        .ok_or_else(|| EngineError::InvalidOp("batch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

// ── Encoding ──────────────────────────────────────────────────────────────

/// Encode an operation descriptor back to its JSON form.
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Read => json!({"op": "read"}),
        Op::Get { path } => json!({"op": "get", "path": path}),
        Op::Set { path, value } => json!({"op": "set", "path": path, "value": value}),
        Op::Remove { path } => json!({"op": "remove", "path": path}),
        Op::Add {
            path,
            value,
            index,
            key,
        } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("add"));
            m.insert("path".into(), json!(path));
            m.insert("value".into(), value.clone());
            if let Some(i) = index {
                m.insert("index".into(), json!(i));
            }
            if let Some(k) = key {
                m.insert("key".into(), json!(k));
            }
            Value::Object(m)
        }
        Op::Replace {
            path,
            value,
            old_value,
        } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("replace"));
            m.insert("path".into(), json!(path));
            m.insert("value".into(), value.clone());
            if let Some(ov) = old_value {
                m.insert("oldValue".into(), json!(ov));
            }
            Value::Object(m)
        }
        Op::Move { from, to } => json!({"op": "move", "from": from, "to": to}),
        Op::Copy { from, to } => json!({"op": "copy", "from": from, "to": to}),
        Op::Test { path, cond } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("test"));
            m.insert("path".into(), json!(path));
            m.insert("condition".into(), json!(cond.name()));
            match cond {
                TestCond::Exists => {}
                TestCond::Equals(v) | TestCond::Contains(v) => {
                    m.insert("value".into(), v.clone());
                }
                TestCond::Type(t) => {
                    m.insert("value".into(), json!(t));
                }
                TestCond::Greater(n) | TestCond::Less(n) => {
                    m.insert("value".into(), json!(n));
                }
            }
            Value::Object(m)
        }
        Op::Transform { path, transform } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("transform"));
            m.insert("path".into(), json!(path));
            m.insert("transform".into(), json!(transform.name()));
            match transform {
                Transform::Increment(n)
                | Transform::Decrement(n)
                | Transform::Multiply(n)
                | Transform::Divide(n) => {
                    m.insert("value".into(), json!(n));
                }
                Transform::Flatten(depth) => {
                    m.insert("value".into(), json!(depth));
                }
                _ => {}
            }
            Value::Object(m)
        }
    }
}

/// Encode a per-call result record. Optional fields are omitted when absent.
pub fn outcome_to_json(out: &OpOutcome) -> Value {
    let mut m = Map::new();
    m.insert("success".into(), json!(out.success));
    m.insert("op".into(), json!(out.op));
    if let Some(p) = &out.path {
        m.insert("path".into(), json!(p));
    }
    if let Some(f) = &out.from {
        m.insert("from".into(), json!(f));
    }
    if let Some(msg) = &out.message {
        m.insert("message".into(), json!(msg));
    }
    if let Some(err) = &out.error {
        m.insert("error".into(), json!(err));
    }
    if let Some(v) = &out.value {
        m.insert("value".into(), v.clone());
    }
    if let Some(ov) = &out.old_value {
        m.insert("oldValue".into(), ov.clone());
    }
    if let Some(e) = out.exists {
        m.insert("exists".into(), json!(e));
    }
    if let Some(t) = out.test_result {
        m.insert("testResult".into(), json!(t));
    }
    Value::Object(m)
}

/// Encode a full single-call response, including the new document text for
/// mutating calls.
pub fn response_to_json(resp: &OpResponse) -> Value {
    let mut v = outcome_to_json(&resp.outcome);
    if let (Value::Object(m), Some(text)) = (&mut v, &resp.doc) {
        m.insert("doc".into(), json!(text));
    }
    v
}

fn step_to_json(step: &StepOutcome) -> Value {
    let mut m = Map::new();
    m.insert("success".into(), json!(step.success));
    m.insert("op".into(), json!(step.op));
    if let Some(p) = &step.path {
        m.insert("path".into(), json!(p));
    }
    if let Some(f) = &step.from {
        m.insert("from".into(), json!(f));
    }
    if let Some(msg) = &step.message {
        m.insert("message".into(), json!(msg));
    }
    if let Some(err) = &step.error {
        m.insert("error".into(), json!(err));
    }
    Value::Object(m)
}

/// Encode a batch response with its ordered per-step records.
pub fn batch_to_json(resp: &BatchResponse) -> Value {
    let mut m = Map::new();
    m.insert("success".into(), json!(resp.success));
    if let Some(err) = &resp.error {
        m.insert("error".into(), json!(err));
    }
    m.insert(
        "steps".into(),
        Value::Array(resp.steps.iter().map(step_to_json).collect()),
    );
    if let Some(text) = &resp.doc {
        m.insert("doc".into(), json!(text));
    }
    Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(op: Op) -> Op {
        from_json(&to_json(&op)).expect("roundtrip failed")
    }

    #[test]
    fn decode_set() {
        let op = from_json(&json!({"op": "set", "path": "$.a", "value": 1})).unwrap();
        assert_eq!(op, Op::Set { path: "$.a".into(), value: json!(1) });
    }

    #[test]
    fn decode_rejects_missing_fields() {
        assert!(from_json(&json!({"op": "set", "path": "$.a"})).is_err());
        assert!(from_json(&json!({"op": "move", "from": "$.a"})).is_err());
        assert!(from_json(&json!({"path": "$.a"})).is_err());
        assert!(from_json(&json!({"op": "launch"})).is_err());
    }

    #[test]
    fn decode_test_defaults_to_exists() {
        let op = from_json(&json!({"op": "test", "path": "$.a"})).unwrap();
        assert_eq!(op, Op::Test { path: "$.a".into(), cond: TestCond::Exists });
    }

    #[test]
    fn decode_test_conditions() {
        let op = from_json(
            &json!({"op": "test", "path": "$.n", "condition": "greater", "value": 100}),
        )
        .unwrap();
        assert_eq!(op, Op::Test { path: "$.n".into(), cond: TestCond::Greater(100.0) });

        let err = from_json(&json!({"op": "test", "path": "$.n", "condition": "between"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown test condition"));
    }

    #[test]
    fn decode_transform_defaults() {
        let op = from_json(&json!({"op": "transform", "path": "$.n", "transform": "increment"}))
            .unwrap();
        assert_eq!(
            op,
            Op::Transform { path: "$.n".into(), transform: Transform::Increment(1.0) }
        );

        // An omitted divisor defaults to 1; an explicit 0 is preserved so
        // the handler can reject it.
        let op = from_json(&json!({"op": "transform", "path": "$.n", "transform": "divide"}))
            .unwrap();
        assert_eq!(op, Op::Transform { path: "$.n".into(), transform: Transform::Divide(1.0) });
        let op = from_json(
            &json!({"op": "transform", "path": "$.n", "transform": "divide", "value": 0}),
        )
        .unwrap();
        assert_eq!(op, Op::Transform { path: "$.n".into(), transform: Transform::Divide(0.0) });
    }

    #[test]
    fn decode_unknown_transform() {
        let err = from_json(&json!({"op": "transform", "path": "$.s", "transform": "rot13"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid operation: unknown transform operation: rot13"
        );
    }

    #[test]
    fn roundtrip_every_verb() {
        let ops = vec![
            Op::Read,
            Op::Get { path: "$.a".into() },
            Op::Set { path: "$.a".into(), value: json!({"x": 1}) },
            Op::Remove { path: "$.a[0]".into() },
            Op::Add { path: "$.a".into(), value: json!(1), index: Some(2), key: None },
            Op::Add { path: "$.o".into(), value: json!(1), index: None, key: Some("k".into()) },
            Op::Replace { path: "$.s".into(), value: json!("new"), old_value: Some("old".into()) },
            Op::Move { from: "$.a".into(), to: "$.b".into() },
            Op::Copy { from: "$.a".into(), to: "$.b".into() },
            Op::Test { path: "$.a".into(), cond: TestCond::Contains(json!("x")) },
            Op::Transform { path: "$.a".into(), transform: Transform::Flatten(2) },
        ];
        for op in ops {
            assert_eq!(roundtrip(op.clone()), op);
        }
    }

    #[test]
    fn decode_batch() {
        let ops = from_json_batch(&json!([
            {"op": "set", "path": "$.a", "value": 1},
            {"op": "remove", "path": "$.b"},
        ]))
        .unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op_name(), "set");
        assert_eq!(ops[1].op_name(), "remove");

        assert!(from_json_batch(&json!({"op": "set"})).is_err());
    }

    #[test]
    fn outcome_encoding_omits_absent_fields() {
        let mut out = OpOutcome::ok("get");
        out.path = Some("$.a".into());
        out.exists = Some(false);
        let v = outcome_to_json(&out);
        assert_eq!(v, json!({"success": true, "op": "get", "path": "$.a", "exists": false}));
    }

    #[test]
    fn test_condition_roundtrip() {
        for cond in [
            TestCond::Exists,
            TestCond::Equals(json!({"a": 1})),
            TestCond::Type("number".into()),
            TestCond::Greater(1.5),
            TestCond::Less(2.0),
            TestCond::Contains(json!("x")),
        ] {
            let op = Op::Test { path: "$.a".into(), cond };
            assert_eq!(roundtrip(op.clone()), op);
        }
    }
}
