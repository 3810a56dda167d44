//! Errors raised while running a target.

use super::expr::ReferenceError;
use super::script::ScriptError;
use crate::executor::TransportError;
use crate::parser::ParseError;
use crate::workspace::LookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to parse {target}: {source}")]
    Parse {
        target: String,
        #[source]
        source: ParseError,
    },

    #[error("Request {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: TransportError,
    },

    #[error("Invalid flow {flow}: {source}")]
    Script {
        flow: String,
        #[source]
        source: ScriptError,
    },

    #[error("Flow {flow}: {source}")]
    Reference {
        flow: String,
        #[source]
        source: ReferenceError,
    },

    #[error("Flow {flow} nests deeper than {limit} levels")]
    NestingTooDeep { flow: String, limit: usize },

    /// A failure inside a flow, wrapped once at each flow boundary it
    /// crosses.
    #[error("Flow {flow} aborted: {source}")]
    FlowAborted {
        flow: String,
        #[source]
        source: Box<RunError>,
    },
}

impl RunError {
    /// Follows `FlowAborted` wrappers down to the failure that started it.
    pub fn root_cause(&self) -> &RunError {
        match self {
            RunError::FlowAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Names of the flows the failure passed through, outermost first.
    pub fn flow_trace(&self) -> Vec<&str> {
        let mut trace = Vec::new();
        let mut current = self;
        while let RunError::FlowAborted { flow, source } = current {
            trace.push(flow.as_str());
            current = source;
        }
        trace
    }
}
