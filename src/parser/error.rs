//! Error types for request document parsing.
//!
//! Every variant carries the 1-based line where the offending logical line
//! starts, so users can jump straight to the problem in their `.http` file.

use thiserror::Error;

/// Errors that can occur while parsing a request document.
///
/// Parsing is all-or-nothing: when one of these is returned no partial
/// document exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The document has no request line at all (empty or only comments).
    #[error("Expected a request line but the document is empty (line {line})")]
    EmptyDocument {
        /// Last line of the document (1-based)
        line: usize,
    },

    /// The first logical line is not `METHOD TARGET HTTP/MAJOR.MINOR`.
    #[error("Expected request line at line {line}, found '{found}'. Expected format: 'METHOD URL HTTP/1.1'")]
    ExpectedRequestLine {
        /// The text of the offending logical line
        found: String,
        /// Line number in the source file (1-based)
        line: usize,
    },

    /// The method token is outside the accepted verb set.
    #[error("Invalid HTTP method '{method}' at line {line}")]
    UnknownMethod {
        /// The rejected method token
        method: String,
        /// Line number in the source file (1-based)
        line: usize,
    },

    /// The version is not one of 0.9, 1.0, 1.1 or 2.0.
    #[error("Invalid HTTP version '{version}' at line {line}. Expected one of: 0.9, 1.0, 1.1, 2.0")]
    UnsupportedVersion {
        /// The rejected `major.minor` string
        version: String,
        /// Line number in the source file (1-based)
        line: usize,
    },

    /// A header line does not match `Name: value`.
    #[error("Invalid header format '{header}' at line {line}. Expected format: 'Header-Name: value'")]
    InvalidHeader {
        /// The offending logical line
        header: String,
        /// Line number in the source file (1-based)
        line: usize,
    },
}

impl ParseError {
    /// Returns the line number associated with this error.
    pub fn line(&self) -> usize {
        match self {
            ParseError::EmptyDocument { line }
            | ParseError::ExpectedRequestLine { line, .. }
            | ParseError::UnknownMethod { line, .. }
            | ParseError::UnsupportedVersion { line, .. }
            | ParseError::InvalidHeader { line, .. } => *line,
        }
    }
}
