//! Request document parser.
//!
//! This module turns the text of one `.http` file into a [`RequestDocument`].
//! The grammar is line oriented:
//!
//! ```http
//! # comments start with '#' or '//'
//! POST https://reqres.in/api/users
//!     ?source=cli HTTP/1.1
//! Content-Type: application/json
//! X-Note: folded header values are
//!   concatenated as-is
//!
//! {
//!   "name": "morpheus", // bodies may carry comments
//! }
//! ```
//!
//! - The first non-blank logical line is `METHOD TARGET HTTP/MAJOR.MINOR`.
//! - A physical line starting with a space or tab continues the previous
//!   logical line. On the request line a fragment carrying an `HTTP/x.y`
//!   token is joined with one space; every other fragment is joined with no
//!   separator.
//! - Header lines follow until the first blank logical line, which is
//!   consumed.
//! - Whatever follows that blank line is the body. Bodies that parse as
//!   JSON are canonicalized and force `Content-Type: application/json`.

pub mod error;
pub mod jsonc;

use crate::models::{Body, HttpMethod, HttpVersion, RequestDocument};
pub use error::ParseError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static REQUEST_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+) (\S+) HTTP/(\d+)\.(\d+)$").expect("Failed to compile request line regex")
});

static VERSION_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"HTTP/\d+\.\d+").expect("Failed to compile version regex"));

static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^: \t]+):[ \t]*(.*?)[ \t]*$").expect("Failed to compile header regex")
});

/// Parses the text of a request document.
///
/// # Arguments
///
/// * `text` - Full content of one `.http` file
///
/// # Returns
///
/// The parsed document, or the first `ParseError` encountered. No partial
/// document is ever returned.
///
/// # Examples
///
/// ```
/// use req::parser::parse_document;
/// use req::models::{Body, HttpMethod};
///
/// let doc = parse_document("POST https://example.com/users HTTP/1.1\n\n{\"name\": \"neo\"}\n").unwrap();
/// assert_eq!(doc.method, HttpMethod::POST);
/// assert_eq!(doc.headers["Content-Type"], "application/json");
/// assert!(matches!(doc.body, Some(Body::Json(_))));
/// ```
pub fn parse_document(text: &str) -> Result<RequestDocument, ParseError> {
    // Normalize line endings (handle both \r\n and \n)
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut pos = lines
        .iter()
        .position(|line| !is_blank(line))
        .ok_or(ParseError::EmptyDocument { line: lines.len() })?;

    let request_line_num = pos + 1;
    let (request_line, next) = fold_logical_line(&lines, pos, true);
    let (method, url, version) = parse_request_line(&request_line, request_line_num)?;
    pos = next;

    let mut document = RequestDocument::new(method, url, version);
    let mut terminated = false;

    while pos < lines.len() {
        if is_blank(lines[pos]) {
            terminated = true;
            pos += 1;
            break;
        }

        let header_line_num = pos + 1;
        let (header_line, next) = fold_logical_line(&lines, pos, false);
        let (name, value) = parse_header_line(&header_line, header_line_num)?;
        document.headers.insert(name, value);
        pos = next;
    }

    if terminated && pos < lines.len() {
        document.body = extract_body(&lines[pos..], &mut document.headers);
    }

    log::debug!(
        "Parsed {} {} ({} headers, body: {})",
        document.method,
        document.url,
        document.headers.len(),
        match &document.body {
            Some(Body::Json(_)) => "json",
            Some(Body::Raw(_)) => "raw",
            None => "none",
        }
    );

    Ok(document)
}

/// Whether a physical line counts as blank: empty, whitespace only, or a
/// `#` / `//` comment.
pub fn is_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Returns the trimmed fragment of a continuation line, or `None` if `line`
/// does not continue the previous logical line.
fn continuation_fragment(line: &str) -> Option<&str> {
    if !line.starts_with([' ', '\t']) || is_blank(line) {
        return None;
    }
    Some(line.trim_matches([' ', '\t']))
}

/// Joins the physical line at `start` with every continuation line after it.
///
/// Returns the logical line and the index of the first physical line after it.
fn fold_logical_line(lines: &[&str], start: usize, request_line: bool) -> (String, usize) {
    let mut logical = lines[start].to_string();
    let mut next = start + 1;

    while let Some(fragment) = lines.get(next).and_then(|line| continuation_fragment(line)) {
        if request_line && VERSION_TOKEN_REGEX.is_match(fragment) {
            logical.push(' ');
        }
        logical.push_str(fragment);
        next += 1;
    }

    (logical, next)
}

/// Parses the request line `METHOD TARGET HTTP/MAJOR.MINOR`.
///
/// # Arguments
///
/// * `line` - The logical request line (already folded)
/// * `line_num` - Line number for error reporting
pub fn parse_request_line(
    line: &str,
    line_num: usize,
) -> Result<(HttpMethod, String, HttpVersion), ParseError> {
    let trimmed = line.trim();
    let captures =
        REQUEST_LINE_REGEX
            .captures(trimmed)
            .ok_or_else(|| ParseError::ExpectedRequestLine {
                found: trimmed.to_string(),
                line: line_num,
            })?;

    let method_str = &captures[1];
    let method = HttpMethod::parse(method_str).ok_or_else(|| ParseError::UnknownMethod {
        method: method_str.to_string(),
        line: line_num,
    })?;

    let (major, minor) = (&captures[3], &captures[4]);
    let version =
        HttpVersion::from_parts(major, minor).ok_or_else(|| ParseError::UnsupportedVersion {
            version: format!("{}.{}", major, minor),
            line: line_num,
        })?;

    Ok((method, captures[2].to_string(), version))
}

/// Parses one logical header line into its name and trimmed value.
pub fn parse_header_line(line: &str, line_num: usize) -> Result<(String, String), ParseError> {
    HEADER_REGEX
        .captures(line)
        .map(|captures| (captures[1].to_string(), captures[2].to_string()))
        .ok_or_else(|| ParseError::InvalidHeader {
            header: line.trim().to_string(),
            line: line_num,
        })
}

/// Builds the body from every line after the header terminator.
///
/// A body that reads as JSON is canonicalized, and `Content-Type` is forced
/// to `application/json`, replacing whatever content type the document
/// declared. A whitespace-only remainder yields no body.
fn extract_body(lines: &[&str], headers: &mut IndexMap<String, String>) -> Option<Body> {
    let source = lines.join("\n");
    if source.trim().is_empty() {
        return None;
    }

    match jsonc::parse(&source) {
        Some(value) => {
            headers.retain(|name, _| name == "Content-Type" || !name.eq_ignore_ascii_case("content-type"));
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            Some(Body::Json(value))
        }
        None => Some(Body::Raw(source)),
    }
}
