//! req: define HTTP requests in plain text and replay them from the terminal.
//!
//! Requests live in `.req/<name>.http` as request documents; flows in
//! `.req/<name>.flow` chain them together.
//!
//! # Architecture
//!
//! - **models**: request documents and normalized step results
//! - **parser**: turns `.http` text into a [`models::RequestDocument`]
//! - **variables**: layered variables and `{name|default}` substitution
//! - **config**: the `.reqrc` file
//! - **executor**: the [`executor::Transport`] seam and its reqwest implementation
//! - **workspace**: finds targets by name under `.req/`
//! - **flow**: flow scripts and the [`flow::Orchestrator`]
//! - **output**: terminal rendering of responses
//! - **cli**: the `req` command
//!
//! # Request documents
//!
//! ```http
//! # Sample req file
//! POST https://reqres.in/api/users?page={page|1} HTTP/1.1
//! Content-Type: application/json
//!
//! {"name": "{name}", "job": "mentor"}
//! ```
//!
//! The first non-blank, non-comment line is the request line. Lines indented
//! with whitespace continue the previous line. Headers follow until a blank
//! line; everything after it is the body, read as JSON (comments and
//! trailing commas allowed) when it parses, raw text otherwise.
//!
//! # Variables
//!
//! `{name}` and `{name|default}` tokens are filled from three layers, later
//! ones winning: `.reqrc` `[variables]`, `--name=value` flags, and the
//! overlay a flow passes when it invokes a target.

pub mod cli;
pub mod config;
pub mod executor;
pub mod flow;
pub mod models;
pub mod output;
pub mod parser;
pub mod variables;
pub mod workspace;

pub use flow::{Orchestrator, Outcome, RunError};
pub use models::{Body, HttpMethod, HttpVersion, RequestDocument, StepResult};
pub use parser::{parse_document, ParseError};
