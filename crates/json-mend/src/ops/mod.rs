//! Operation descriptors and their handlers.
//!
//! The ten single-call verbs are a closed sum type ([`Op`]); [`execute`]
//! parses the caller's document text, dispatches, and returns a result
//! record plus the re-serialized text for mutating verbs. The batch verb
//! lives in [`crate::batch`].

pub mod types;
pub mod apply;

pub use types::{EngineError, Op, OpOutcome, OpResponse, TestCond, Transform};
pub use apply::{execute, json_type_name};
