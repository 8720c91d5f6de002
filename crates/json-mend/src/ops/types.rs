//! Core types for the operation engine.

use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Engine error taxonomy.
///
/// `InvalidDocument` aborts a whole call (batch included) before any
/// mutation; the rest surface per the verb contracts. Inside a batch every
/// error is caught and recorded as a failed step.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid JSON document: {0}")]
    InvalidDocument(String),
    #[error("path not found: {0}")]
    PathNotFound(String),
    #[error("expected {expected} at {path}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("add to an object requires a key ({0})")]
    MissingKey(String),
    #[error("cannot divide by zero ({0})")]
    DivideByZero(String),
    #[error("invalid operation: {0}")]
    InvalidOp(String),
}

// ── Test conditions ───────────────────────────────────────────────────────

/// A condition checked by the `test` verb.
#[derive(Debug, Clone, PartialEq)]
pub enum TestCond {
    /// The path resolves to an existing value.
    Exists,
    /// Structural deep equality with the supplied value.
    Equals(Value),
    /// The value's JSON type tag matches (`"array"`, `"object"`, `"string"`,
    /// `"number"`, `"boolean"`, `"null"`).
    Type(String),
    /// Strict numeric greater-than against the supplied number.
    Greater(f64),
    /// Strict numeric less-than against the supplied number.
    Less(f64),
    /// Array element membership, string substring, or object own-key
    /// membership, depending on the value's type.
    Contains(Value),
}

impl TestCond {
    pub fn name(&self) -> &'static str {
        match self {
            TestCond::Exists => "exists",
            TestCond::Equals(_) => "equals",
            TestCond::Type(_) => "type",
            TestCond::Greater(_) => "greater",
            TestCond::Less(_) => "less",
            TestCond::Contains(_) => "contains",
        }
    }
}

// ── Transforms ────────────────────────────────────────────────────────────

/// A value transformation applied in place by the `transform` verb.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Uppercase,
    Lowercase,
    Increment(f64),
    Decrement(f64),
    Multiply(f64),
    Divide(f64),
    Sort,
    Reverse,
    Unique,
    Flatten(usize),
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Uppercase => "uppercase",
            Transform::Lowercase => "lowercase",
            Transform::Increment(_) => "increment",
            Transform::Decrement(_) => "decrement",
            Transform::Multiply(_) => "multiply",
            Transform::Divide(_) => "divide",
            Transform::Sort => "sort",
            Transform::Reverse => "reverse",
            Transform::Unique => "unique",
            Transform::Flatten(_) => "flatten",
        }
    }

    /// The JSON type the current value must have.
    pub fn expects(&self) -> &'static str {
        match self {
            Transform::Uppercase | Transform::Lowercase => "string",
            Transform::Increment(_)
            | Transform::Decrement(_)
            | Transform::Multiply(_)
            | Transform::Divide(_) => "number",
            Transform::Sort | Transform::Reverse | Transform::Unique | Transform::Flatten(_) => {
                "array"
            }
        }
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// An operation descriptor: one of the ten single-call verbs with its
/// verb-specific parameters. Constructed per call (usually through
/// [`crate::codec::from_json`]) and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Return the whole parsed document.
    Read,
    /// Return `(exists, value)` for a path.
    Get { path: String },
    /// Create or overwrite the value at a path.
    Set { path: String, value: Value },
    /// Delete the value at a path; the path must exist.
    Remove { path: String },
    /// Insert into an existing array (at `index`, clamped, else append) or
    /// set `key` on an existing object.
    Add {
        path: String,
        value: Value,
        index: Option<usize>,
        key: Option<String>,
    },
    /// Overwrite the value at an existing path; when the current value and
    /// `value` are strings and `old_value` is supplied, replace only the
    /// first occurrence of that substring instead.
    Replace {
        path: String,
        value: Value,
        old_value: Option<String>,
    },
    /// Remove at `from`, then write at `to`.
    Move { from: String, to: String },
    /// Deep-clone the value at `from` and write it at `to`.
    Copy { from: String, to: String },
    /// Evaluate a condition; never fails the call, the verdict travels in
    /// the result's `testResult`.
    Test { path: String, cond: TestCond },
    /// Transform the value at an existing path in place.
    Transform { path: String, transform: Transform },
}

impl Op {
    /// The operation-kind tag used in result records.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Read => "read",
            Op::Get { .. } => "get",
            Op::Set { .. } => "set",
            Op::Remove { .. } => "remove",
            Op::Add { .. } => "add",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
            Op::Transform { .. } => "transform",
        }
    }

    /// The path the operation writes to or reads from (`to` for move/copy).
    pub fn target_path(&self) -> Option<&str> {
        match self {
            Op::Read => None,
            Op::Get { path }
            | Op::Set { path, .. }
            | Op::Remove { path }
            | Op::Add { path, .. }
            | Op::Replace { path, .. }
            | Op::Test { path, .. }
            | Op::Transform { path, .. } => Some(path),
            Op::Move { to, .. } | Op::Copy { to, .. } => Some(to),
        }
    }

    /// The source path, for move and copy.
    pub fn source_path(&self) -> Option<&str> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// True for the six verbs that may change the document. Only these are
    /// allowed inside a batch.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Op::Set { .. }
                | Op::Remove { .. }
                | Op::Add { .. }
                | Op::Replace { .. }
                | Op::Move { .. }
                | Op::Copy { .. }
        )
    }
}

// ── Result records ────────────────────────────────────────────────────────

/// Per-call result record. `success` is always present; the optional fields
/// are filled per verb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpOutcome {
    pub success: bool,
    pub op: &'static str,
    pub path: Option<String>,
    pub from: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub value: Option<Value>,
    pub old_value: Option<Value>,
    pub exists: Option<bool>,
    pub test_result: Option<bool>,
}

impl OpOutcome {
    pub fn ok(op: &'static str) -> Self {
        OpOutcome {
            success: true,
            op,
            ..OpOutcome::default()
        }
    }

    pub fn fail(op: &Op, err: &EngineError) -> Self {
        OpOutcome {
            success: false,
            op: op.op_name(),
            path: op.target_path().map(str::to_string),
            from: op.source_path().map(str::to_string),
            error: Some(err.to_string()),
            ..OpOutcome::default()
        }
    }
}

/// The full response to a single call: the result record plus, for
/// successful mutating verbs, the re-serialized document text.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResponse {
    pub outcome: OpOutcome,
    pub doc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutating_verbs() {
        assert!(Op::Set { path: "$.a".into(), value: json!(1) }.is_mutating());
        assert!(Op::Move { from: "$.a".into(), to: "$.b".into() }.is_mutating());
        assert!(!Op::Read.is_mutating());
        assert!(!Op::Get { path: "$.a".into() }.is_mutating());
        assert!(!Op::Test { path: "$.a".into(), cond: TestCond::Exists }.is_mutating());
    }

    #[test]
    fn move_paths() {
        let op = Op::Move { from: "$.a".into(), to: "$.b".into() };
        assert_eq!(op.target_path(), Some("$.b"));
        assert_eq!(op.source_path(), Some("$.a"));
    }

    #[test]
    fn failure_outcome_carries_paths_and_reason() {
        let op = Op::Remove { path: "$.gone".into() };
        let out = OpOutcome::fail(&op, &EngineError::PathNotFound("$.gone".into()));
        assert!(!out.success);
        assert_eq!(out.op, "remove");
        assert_eq!(out.path.as_deref(), Some("$.gone"));
        assert_eq!(out.error.as_deref(), Some("path not found: $.gone"));
    }
}
