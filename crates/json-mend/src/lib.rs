//! json-mend — path-addressable JSON document mutation engine.
//!
//! Given a JSON document as text and an operation descriptor, the engine
//! resolves a simplified path expression (`$.a[0].b`), applies one of the
//! supported verbs (read, get, set, remove, add, replace, move, copy, test,
//! transform), and hands back the re-serialized document alongside a result
//! record. Ordered batches of mutating operations run against one evolving
//! document with per-step failure isolation.
//!
//! Every call is a pure function of (text, descriptor) → (text, result):
//! the document is parsed fresh, mutated on a clone, and re-serialized; no
//! state is retained between calls.

pub mod doc;
pub mod mutate;
pub mod ops;
pub mod batch;
pub mod codec;

pub use ops::{execute, EngineError, Op, OpOutcome, OpResponse, TestCond, Transform};
pub use batch::{execute_batch, BatchResponse, StepOutcome};
pub use codec::{
    batch_to_json, from_json, from_json_batch, outcome_to_json, response_to_json, to_json,
};
