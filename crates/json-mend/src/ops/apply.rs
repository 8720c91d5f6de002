//! Per-verb operation handlers.

use serde_json::Value;

use json_mend_path::{get_mut, parse_path, resolve};

use super::types::{EngineError, Op, OpOutcome, OpResponse, TestCond, Transform};
use crate::{doc, mutate};

/// The JSON type tag of a value.
pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Execute one operation against document text.
///
/// Parses the text, dispatches on the verb, and returns the result record;
/// `doc` carries the re-serialized text when the document changed. Any
/// failure (parse included) yields a failure record and no text, so no
/// partial mutation can reach the caller.
pub fn execute(text: &str, op: &Op) -> OpResponse {
    let parsed = match doc::parse(text) {
        Ok(v) => v,
        Err(e) => {
            return OpResponse {
                outcome: OpOutcome::fail(op, &e),
                doc: None,
            }
        }
    };
    match run(&parsed, op) {
        Ok((outcome, mutated)) => OpResponse {
            doc: mutated.as_ref().map(doc::stringify),
            outcome,
        },
        Err(e) => OpResponse {
            outcome: OpOutcome::fail(op, &e),
            doc: None,
        },
    }
}

fn run(d: &Value, op: &Op) -> Result<(OpOutcome, Option<Value>), EngineError> {
    match op {
        Op::Read => {
            let mut out = OpOutcome::ok("read");
            out.value = Some(d.clone());
            Ok((out, None))
        }
        Op::Get { path } => {
            let r = resolve(d, path);
            let mut out = OpOutcome::ok("get");
            out.path = Some(path.clone());
            out.exists = Some(r.exists);
            out.value = if r.exists { r.value } else { None };
            Ok((out, None))
        }
        Op::Set { path, value } => {
            let prior = mutate::get_at(d, path);
            let next = mutate::set_at(d, path, value.clone());
            let mut out = OpOutcome::ok("set");
            out.path = Some(path.clone());
            out.value = Some(value.clone());
            out.old_value = prior;
            out.message = Some(format!("value set at {path}"));
            Ok((out, Some(next)))
        }
        Op::Remove { path } => {
            let r = resolve(d, path);
            if !r.exists {
                return Err(EngineError::PathNotFound(path.clone()));
            }
            let next = mutate::remove_at(d, path);
            let mut out = OpOutcome::ok("remove");
            out.path = Some(path.clone());
            out.old_value = r.value;
            out.message = Some(format!("value removed at {path}"));
            Ok((out, Some(next)))
        }
        Op::Add {
            path,
            value,
            index,
            key,
        } => apply_add(d, path, value, *index, key.as_deref()),
        Op::Replace {
            path,
            value,
            old_value,
        } => apply_replace(d, path, value, old_value.as_deref()),
        Op::Move { from, to } => {
            let r = resolve(d, from);
            if !r.exists {
                return Err(EngineError::PathNotFound(from.clone()));
            }
            let value = r.value.unwrap_or(Value::Null);
            let removed = mutate::remove_at(d, from);
            let next = mutate::set_at(&removed, to, value.clone());
            let mut out = OpOutcome::ok("move");
            out.path = Some(to.clone());
            out.from = Some(from.clone());
            out.value = Some(value);
            out.message = Some(format!("moved {from} to {to}"));
            Ok((out, Some(next)))
        }
        Op::Copy { from, to } => {
            let r = resolve(d, from);
            if !r.exists {
                return Err(EngineError::PathNotFound(from.clone()));
            }
            let value = r.value.unwrap_or(Value::Null);
            let next = mutate::set_at(d, to, value.clone());
            let mut out = OpOutcome::ok("copy");
            out.path = Some(to.clone());
            out.from = Some(from.clone());
            out.value = Some(value);
            out.message = Some(format!("copied {from} to {to}"));
            Ok((out, Some(next)))
        }
        Op::Test { path, cond } => Ok((apply_test(d, path, cond), None)),
        Op::Transform { path, transform } => apply_transform(d, path, transform),
    }
}

// ── add ───────────────────────────────────────────────────────────────────

fn apply_add(
    d: &Value,
    path: &str,
    value: &Value,
    index: Option<usize>,
    key: Option<&str>,
) -> Result<(OpOutcome, Option<Value>), EngineError> {
    let r = resolve(d, path);
    if !r.exists {
        return Err(EngineError::PathNotFound(path.to_string()));
    }
    let mut next = d.clone();
    let steps = parse_path(path);
    let target = get_mut(&mut next, &steps)
        .ok_or_else(|| EngineError::PathNotFound(path.to_string()))?;
    let message = match target {
        Value::Array(arr) => {
            let at = index.map(|i| i.min(arr.len())).unwrap_or(arr.len());
            arr.insert(at, value.clone());
            format!("inserted element at index {at} of {path}")
        }
        Value::Object(map) => {
            let key = key.ok_or_else(|| EngineError::MissingKey(path.to_string()))?;
            map.insert(key.to_string(), value.clone());
            format!("added key '{key}' at {path}")
        }
        other => {
            return Err(EngineError::TypeMismatch {
                path: path.to_string(),
                expected: "array or object",
                found: json_type_name(other),
            })
        }
    };
    let mut out = OpOutcome::ok("add");
    out.path = Some(path.to_string());
    out.value = Some(value.clone());
    out.message = Some(message);
    Ok((out, Some(next)))
}

// ── replace ───────────────────────────────────────────────────────────────

/// The replacement value: first-occurrence substring replacement when the
/// current and new values are both strings and a source substring was
/// supplied; direct overwrite otherwise.
pub(crate) fn replaced_value(current: &Value, old_value: Option<&str>, value: &Value) -> Value {
    match (current, old_value, value) {
        (Value::String(s), Some(old), Value::String(new)) => {
            Value::String(s.replacen(old, new, 1))
        }
        _ => value.clone(),
    }
}

fn apply_replace(
    d: &Value,
    path: &str,
    value: &Value,
    old_value: Option<&str>,
) -> Result<(OpOutcome, Option<Value>), EngineError> {
    let r = resolve(d, path);
    if !r.exists {
        return Err(EngineError::PathNotFound(path.to_string()));
    }
    let current = r.value.unwrap_or(Value::Null);
    let new_value = replaced_value(&current, old_value, value);
    let next = mutate::set_at(d, path, new_value.clone());
    let mut out = OpOutcome::ok("replace");
    out.path = Some(path.to_string());
    out.value = Some(new_value);
    out.old_value = Some(current);
    out.message = Some(format!("value replaced at {path}"));
    Ok((out, Some(next)))
}

// ── test ──────────────────────────────────────────────────────────────────

fn apply_test(d: &Value, path: &str, cond: &TestCond) -> OpOutcome {
    let r = resolve(d, path);
    let result = match cond {
        TestCond::Exists => r.exists,
        TestCond::Equals(expected) => r.exists && r.value.as_ref() == Some(expected),
        TestCond::Type(tag) => {
            r.exists
                && r.value
                    .as_ref()
                    .map(|v| json_type_name(v) == tag)
                    .unwrap_or(false)
        }
        TestCond::Greater(n) => r
            .value
            .as_ref()
            .and_then(Value::as_f64)
            .map(|v| v > *n)
            .unwrap_or(false),
        TestCond::Less(n) => r
            .value
            .as_ref()
            .and_then(Value::as_f64)
            .map(|v| v < *n)
            .unwrap_or(false),
        TestCond::Contains(needle) => match r.value.as_ref() {
            Some(Value::Array(arr)) => arr.iter().any(|v| v == needle),
            Some(Value::String(s)) => needle.as_str().map(|sub| s.contains(sub)).unwrap_or(false),
            Some(Value::Object(map)) => needle
                .as_str()
                .map(|k| map.contains_key(k))
                .unwrap_or(false),
            _ => false,
        },
    };
    let mut out = OpOutcome::ok("test");
    out.path = Some(path.to_string());
    out.test_result = Some(result);
    out.value = if r.exists { r.value } else { None };
    out.message = Some(format!(
        "condition '{}' {} at {path}",
        cond.name(),
        if result { "passed" } else { "failed" }
    ));
    out
}

// ── transform ─────────────────────────────────────────────────────────────

/// Re-wrap an arithmetic result, keeping integral values as integers.
fn number_value(n: f64, path: &str) -> Result<Value, EngineError> {
    if !n.is_finite() {
        return Err(EngineError::InvalidOp(format!(
            "transform produced a non-finite number at {path}"
        )));
    }
    const SAFE: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.fract() == 0.0 && n.abs() < SAFE {
        return Ok(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| {
            EngineError::InvalidOp(format!("transform produced a non-finite number at {path}"))
        })
}

/// Lexicographic sort key: strings by their contents, everything else by
/// compact JSON text, mirroring a default (comparator-free) sort.
fn sort_key(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn flatten(arr: &[Value], depth: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(arr.len());
    for v in arr {
        match v {
            Value::Array(inner) if depth > 0 => out.extend(flatten(inner, depth - 1)),
            other => out.push(other.clone()),
        }
    }
    out
}

fn transform_value(current: &Value, t: &Transform, path: &str) -> Result<Value, EngineError> {
    let mismatch = || EngineError::TypeMismatch {
        path: path.to_string(),
        expected: t.expects(),
        found: json_type_name(current),
    };
    match t {
        Transform::Uppercase => {
            let s = current.as_str().ok_or_else(mismatch)?;
            Ok(Value::String(s.to_uppercase()))
        }
        Transform::Lowercase => {
            let s = current.as_str().ok_or_else(mismatch)?;
            Ok(Value::String(s.to_lowercase()))
        }
        Transform::Increment(delta) => {
            let n = current.as_f64().ok_or_else(mismatch)?;
            number_value(n + delta, path)
        }
        Transform::Decrement(delta) => {
            let n = current.as_f64().ok_or_else(mismatch)?;
            number_value(n - delta, path)
        }
        Transform::Multiply(factor) => {
            let n = current.as_f64().ok_or_else(mismatch)?;
            number_value(n * factor, path)
        }
        Transform::Divide(divisor) => {
            let n = current.as_f64().ok_or_else(mismatch)?;
            if *divisor == 0.0 {
                return Err(EngineError::DivideByZero(path.to_string()));
            }
            number_value(n / divisor, path)
        }
        Transform::Sort => {
            let arr = current.as_array().ok_or_else(mismatch)?;
            let mut sorted = arr.clone();
            sorted.sort_by_key(sort_key);
            Ok(Value::Array(sorted))
        }
        Transform::Reverse => {
            let arr = current.as_array().ok_or_else(mismatch)?;
            let mut reversed = arr.clone();
            reversed.reverse();
            Ok(Value::Array(reversed))
        }
        Transform::Unique => {
            let arr = current.as_array().ok_or_else(mismatch)?;
            let mut out: Vec<Value> = Vec::with_capacity(arr.len());
            for v in arr {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Ok(Value::Array(out))
        }
        Transform::Flatten(depth) => {
            let arr = current.as_array().ok_or_else(mismatch)?;
            Ok(Value::Array(flatten(arr, *depth)))
        }
    }
}

fn apply_transform(
    d: &Value,
    path: &str,
    t: &Transform,
) -> Result<(OpOutcome, Option<Value>), EngineError> {
    let r = resolve(d, path);
    if !r.exists {
        return Err(EngineError::PathNotFound(path.to_string()));
    }
    let current = r.value.unwrap_or(Value::Null);
    let transformed = transform_value(&current, t, path)?;
    let next = mutate::set_at(d, path, transformed.clone());
    let mut out = OpOutcome::ok("transform");
    out.path = Some(path.to_string());
    out.value = Some(transformed);
    out.old_value = Some(current);
    out.message = Some(format!("applied '{}' at {path}", t.name()));
    Ok((out, Some(next)))
}
