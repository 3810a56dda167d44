//! Request document data models.
//!
//! This module defines the in-memory form of one `.http` file: the request
//! method, target URL, protocol version, ordered headers and optional body.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

macro_rules! http_methods {
    ($($variant:ident => $token:literal),+ $(,)?) => {
        /// HTTP request method.
        ///
        /// The accepted set covers RFC 7231 plus the WebDAV, CalDAV, UPnP and
        /// cache-control extensions. Tokens are case-sensitive.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum HttpMethod {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl HttpMethod {
            /// Every accepted method, in declaration order.
            pub const ALL: &'static [HttpMethod] = &[$(HttpMethod::$variant),+];

            /// Returns the wire token of the method.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(HttpMethod::$variant => $token,)+
                }
            }

            /// Parses a method token.
            ///
            /// Returns `None` for anything outside the accepted set, including
            /// lower-case spellings of accepted methods.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($token => Some(HttpMethod::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

http_methods! {
    DELETE => "DELETE",
    GET => "GET",
    HEAD => "HEAD",
    POST => "POST",
    PUT => "PUT",
    CONNECT => "CONNECT",
    OPTIONS => "OPTIONS",
    TRACE => "TRACE",
    COPY => "COPY",
    LOCK => "LOCK",
    MKCOL => "MKCOL",
    MOVE => "MOVE",
    PROPFIND => "PROPFIND",
    PROPPATCH => "PROPPATCH",
    SEARCH => "SEARCH",
    UNLOCK => "UNLOCK",
    BIND => "BIND",
    REBIND => "REBIND",
    UNBIND => "UNBIND",
    ACL => "ACL",
    REPORT => "REPORT",
    MKACTIVITY => "MKACTIVITY",
    CHECKOUT => "CHECKOUT",
    MERGE => "MERGE",
    MSEARCH => "M-SEARCH",
    NOTIFY => "NOTIFY",
    SUBSCRIBE => "SUBSCRIBE",
    UNSUBSCRIBE => "UNSUBSCRIBE",
    PATCH => "PATCH",
    PURGE => "PURGE",
    MKCALENDAR => "MKCALENDAR",
    LINK => "LINK",
    UNLINK => "UNLINK",
}

impl HttpMethod {
    /// Whether a body sent with this method is discarded before sending.
    pub fn forbids_body(&self) -> bool {
        matches!(self, HttpMethod::GET | HttpMethod::HEAD)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP protocol version named on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpVersion {
    #[serde(rename = "0.9")]
    Http09,
    #[serde(rename = "1.0")]
    Http10,
    #[serde(rename = "1.1")]
    Http11,
    #[serde(rename = "2.0")]
    Http20,
}

impl HttpVersion {
    /// Returns the `major.minor` form, e.g. `"1.1"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http09 => "0.9",
            HttpVersion::Http10 => "1.0",
            HttpVersion::Http11 => "1.1",
            HttpVersion::Http20 => "2.0",
        }
    }

    /// Looks up a version from its major and minor digits.
    pub fn from_parts(major: &str, minor: &str) -> Option<Self> {
        match (major, minor) {
            ("0", "9") => Some(HttpVersion::Http09),
            ("1", "0") => Some(HttpVersion::Http10),
            ("1", "1") => Some(HttpVersion::Http11),
            ("2", "0") => Some(HttpVersion::Http20),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}", self.as_str())
    }
}

/// Request or response payload.
///
/// A body is `Json` when its text parsed as a (comment-tolerant) JSON
/// document, and `Raw` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Body {
    Raw(String),
    Json(Value),
}

impl Body {
    /// Renders the body as the bytes that go on the wire.
    ///
    /// JSON bodies are rendered compactly. Object keys come out sorted, which
    /// makes the rendering canonical.
    pub fn to_wire(&self) -> String {
        match self {
            Body::Raw(text) => text.clone(),
            Body::Json(value) => value.to_string(),
        }
    }

    /// Converts the body to a JSON value: raw text becomes a JSON string.
    pub fn to_value(&self) -> Value {
        match self {
            Body::Raw(text) => Value::String(text.clone()),
            Body::Json(value) => value.clone(),
        }
    }
}

/// A request parsed from one `.http` document.
///
/// Documents are never mutated by variable resolution; resolving returns a
/// fresh document so the parsed form can be reused with other variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    /// HTTP method from the request line.
    pub method: HttpMethod,

    /// Target URL. May still contain `{name}` or `{name|default}` tokens.
    pub url: String,

    /// Protocol version from the request line.
    pub version: HttpVersion,

    /// Request headers in the order they were written.
    ///
    /// Names are unique; a repeated name keeps its first position and takes
    /// the last value written.
    pub headers: IndexMap<String, String>,

    /// Optional request body.
    pub body: Option<Body>,
}

impl RequestDocument {
    /// Creates a document with no headers and no body.
    pub fn new(method: HttpMethod, url: impl Into<String>, version: HttpVersion) -> Self {
        Self {
            method,
            url: url.into(),
            version,
            headers: IndexMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing the value of an existing header of the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Gets the Content-Type header value, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Serializes the document back into `.http` text.
    ///
    /// Parsing the output yields an equivalent document. JSON bodies are
    /// pretty-printed, so only their value (not their bytes) survives.
    pub fn to_http_string(&self) -> String {
        let mut out = format!("{} {} {}\n", self.method, self.url, self.version);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        match &self.body {
            Some(Body::Raw(text)) => {
                out.push('\n');
                out.push_str(text);
            }
            Some(Body::Json(value)) => {
                out.push('\n');
                out.push_str(
                    &serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
                );
                out.push('\n');
            }
            None => {}
        }
        out
    }
}

impl fmt::Display for RequestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_http_string())
    }
}
