//! Batch execution: ordered mutating operations with per-step isolation.
//!
//! A batch parses the document once, applies each step against the evolving
//! in-memory value, and serializes once at the end. A failing step records a
//! failure outcome and the batch continues; prior steps are never rolled
//! back. Only the six mutating verbs are allowed; anything else records a
//! failed step. Two verbs relax inside a batch: `add` falls back to `set`
//! semantics when the target is not an array (there is no key-based object
//! insert here), and `replace` substring-replaces only for string current
//! values with a supplied source substring.

use serde_json::Value;

use json_mend_path::{get_mut, parse_path, resolve};

use crate::ops::apply::replaced_value;
use crate::ops::{EngineError, Op};
use crate::{doc, mutate};

/// Outcome of one batch step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub success: bool,
    pub op: &'static str,
    pub path: Option<String>,
    pub from: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl StepOutcome {
    fn ok(op: &Op, message: String) -> Self {
        StepOutcome {
            success: true,
            op: op.op_name(),
            path: op.target_path().map(str::to_string),
            from: op.source_path().map(str::to_string),
            message: Some(message),
            error: None,
        }
    }

    fn fail(op: &Op, err: &EngineError) -> Self {
        StepOutcome {
            success: false,
            op: op.op_name(),
            path: op.target_path().map(str::to_string),
            from: op.source_path().map(str::to_string),
            message: None,
            error: Some(err.to_string()),
        }
    }
}

/// The batch response. `success` is the container-level flag: it is `false`
/// only when the document text itself failed to parse; individual step
/// outcomes carry the real per-operation signal.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResponse {
    pub success: bool,
    pub error: Option<String>,
    pub steps: Vec<StepOutcome>,
    pub doc: Option<String>,
}

/// Execute an ordered batch of mutating operations against document text.
pub fn execute_batch(text: &str, ops: &[Op]) -> BatchResponse {
    let mut current = match doc::parse(text) {
        Ok(v) => v,
        Err(e) => {
            return BatchResponse {
                success: false,
                error: Some(e.to_string()),
                steps: Vec::new(),
                doc: None,
            }
        }
    };

    let mut steps = Vec::with_capacity(ops.len());
    for op in ops {
        match apply_step(&current, op) {
            Ok((next, step)) => {
                current = next;
                steps.push(step);
            }
            Err(e) => steps.push(StepOutcome::fail(op, &e)),
        }
    }

    BatchResponse {
        success: true,
        error: None,
        steps,
        doc: Some(doc::stringify(&current)),
    }
}

fn apply_step(d: &Value, op: &Op) -> Result<(Value, StepOutcome), EngineError> {
    match op {
        Op::Set { path, value } => {
            let next = mutate::set_at(d, path, value.clone());
            Ok((next, StepOutcome::ok(op, format!("value set at {path}"))))
        }
        Op::Remove { path } => {
            if !resolve(d, path).exists {
                return Err(EngineError::PathNotFound(path.clone()));
            }
            let next = mutate::remove_at(d, path);
            Ok((next, StepOutcome::ok(op, format!("value removed at {path}"))))
        }
        Op::Add {
            path, value, index, ..
        } => {
            let r = resolve(d, path);
            if r.exists && matches!(r.value, Some(Value::Array(_))) {
                let mut next = d.clone();
                let steps = parse_path(path);
                if let Some(Value::Array(arr)) = get_mut(&mut next, &steps) {
                    let at = index.map(|i| i.min(arr.len())).unwrap_or(arr.len());
                    arr.insert(at, value.clone());
                    return Ok((
                        next,
                        StepOutcome::ok(op, format!("inserted element at index {at} of {path}")),
                    ));
                }
            }
            // Non-array target: fall back to set semantics.
            let next = mutate::set_at(d, path, value.clone());
            Ok((next, StepOutcome::ok(op, format!("value set at {path}"))))
        }
        Op::Replace {
            path,
            value,
            old_value,
        } => {
            let r = resolve(d, path);
            if !r.exists {
                return Err(EngineError::PathNotFound(path.clone()));
            }
            let current = r.value.unwrap_or(Value::Null);
            let new_value = replaced_value(&current, old_value.as_deref(), value);
            let next = mutate::set_at(d, path, new_value);
            Ok((next, StepOutcome::ok(op, format!("value replaced at {path}"))))
        }
        Op::Move { from, to } => {
            let r = resolve(d, from);
            if !r.exists {
                return Err(EngineError::PathNotFound(from.clone()));
            }
            let value = r.value.unwrap_or(Value::Null);
            let removed = mutate::remove_at(d, from);
            let next = mutate::set_at(&removed, to, value);
            Ok((next, StepOutcome::ok(op, format!("moved {from} to {to}"))))
        }
        Op::Copy { from, to } => {
            let r = resolve(d, from);
            if !r.exists {
                return Err(EngineError::PathNotFound(from.clone()));
            }
            let value = r.value.unwrap_or(Value::Null);
            let next = mutate::set_at(d, to, value);
            Ok((next, StepOutcome::ok(op, format!("copied {from} to {to}"))))
        }
        other => Err(EngineError::InvalidOp(format!(
            "operation '{}' is not allowed in a batch",
            other.op_name()
        ))),
    }
}
