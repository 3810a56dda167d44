//! Flows: named compositions of requests and other flows.
//!
//! A flow script is plain data. It can invoke targets from the catalog by
//! name, bind their results, and hand back a `complete` value; nothing else
//! is reachable from inside a script. See [`script`] for the file format.

pub mod error;
pub mod expr;
pub mod orchestrator;
pub mod script;

pub use error::RunError;
pub use expr::{ReferenceError, Scope};
pub use orchestrator::{Exchange, Orchestrator, Outcome, MAX_NESTING_DEPTH};
pub use script::{FlowScript, InvokeStep, ParallelStep, ScriptError, Step};
