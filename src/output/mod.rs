//! Response presentation.
//!
//! Everything here returns strings; the binary decides where they go.
//! Presentation choices arrive in an explicit [`OutputOptions`].

use colored::{ColoredString, Colorize};
use serde_json::Value;

use crate::flow::Exchange;
use crate::models::{Body, HttpMethod, StepResult};
use crate::variables::Notice;

/// Default number of body lines shown before truncating.
pub const DEFAULT_MAX_BODY_LINES: usize = 40;

/// Headers hidden from the human view unless `--all-headers` is given.
const HIDDEN_HEADERS: &[&str] = &[
    "nel",
    "server",
    "via",
    "x-powered-by",
    "alt-svc",
    "connection",
    "content-length",
    "etag",
    "report-to",
    "expect-ct",
    "content-type",
    "set-cookie",
    "expires",
    "p3p",
    "cache-control",
];

const HIDDEN_PREFIXES: &[&str] = &["access-control", "cf-"];

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Show the whole body instead of the first `max_body_lines`.
    pub full_response: bool,
    /// Show headers that are hidden by default.
    pub all_headers: bool,
    /// Print the normalized result as one JSON line.
    pub json: bool,
    /// Emit ANSI colours.
    pub color: bool,
    pub max_body_lines: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            full_response: false,
            all_headers: false,
            json: false,
            color: true,
            max_body_lines: DEFAULT_MAX_BODY_LINES,
        }
    }
}

impl OutputOptions {
    /// Options for output that is not going to a terminal.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Whether `name` is hidden from the default header listing.
pub fn is_hidden_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    HIDDEN_HEADERS.contains(&name.as_str())
        || HIDDEN_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Renders a sent request and its response.
pub fn render_exchange(exchange: &Exchange, options: &OutputOptions) -> String {
    if options.json {
        return render_json(&exchange.result);
    }

    let request = &exchange.request;
    let result = &exchange.result;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        paint_method(request.method, options),
        options.paint(&request.url, |s| s.bold())
    ));

    out.push_str(&format!(
        "  {} {}\n",
        options.paint("Status:", |s| s.bold()),
        paint_status(result, options)
    ));

    let shown: Vec<(&String, &String)> = result
        .headers
        .iter()
        .filter(|(name, _)| options.all_headers || !is_hidden_header(name))
        .collect();
    let hidden = result.headers.len() - shown.len();

    out.push_str(&format!(
        "  {} {}{}\n",
        options.paint("Headers", |s| s.bold()),
        options.paint(&format!("({} hidden)", hidden), |s| s.dimmed()),
        options.paint(":", |s| s.bold())
    ));
    for (name, value) in shown {
        out.push_str(&format!("{}{}: {}\n", INDENT, name, value));
    }

    let media_type = result
        .content_type()
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty());
    out.push_str(&format!(
        "  {}{}{}\n",
        options.paint("Body", |s| s.bold()),
        media_type
            .map(|ct| options.paint(&format!(" ({})", ct), |s| s.dimmed()))
            .unwrap_or_default(),
        options.paint(":", |s| s.bold())
    ));

    out.push_str(&render_body(&result.body, options));
    out
}

/// Renders the normalized `{status, headers, body}` as one JSON line.
pub fn render_json(result: &StepResult) -> String {
    format!("{}\n", result.to_value())
}

/// Renders a flow's `complete` value. `null` renders as nothing.
pub fn render_completion(value: &Value, options: &OutputOptions) -> String {
    match value {
        Value::Null => String::new(),
        _ if options.json => format!("{}\n", value),
        Value::String(text) => format!("{}\n", text),
        other => format!("{}\n", pretty(other)),
    }
}

/// Renders a non-fatal notice raised while resolving a request.
pub fn render_notice(notice: &Notice, options: &OutputOptions) -> String {
    format!("{}\n", options.paint(&notice.to_string(), |s| s.cyan()))
}

/// Renders the report for an unknown target: close matches when there are
/// any, otherwise everything available.
pub fn render_not_found(
    name: &str,
    suggestions: &[String],
    available: &[String],
    options: &OutputOptions,
) -> String {
    let mut out = format!(
        "{}\n\n",
        options.paint(&format!("Request {} not found!", name), |s| s.red())
    );
    let (heading, names) = if suggestions.is_empty() {
        ("Available requests:", available)
    } else {
        ("Did you mean:", suggestions)
    };
    out.push_str(heading);
    out.push('\n');
    for name in names {
        out.push_str(&format!("\t{}\n", name));
    }
    out
}

/// Renders a fatal error line.
pub fn render_error(message: &str, options: &OutputOptions) -> String {
    format!("{} {}\n", options.paint("error:", |s| s.red().bold()), message)
}

fn render_body(body: &Body, options: &OutputOptions) -> String {
    let text = match body {
        Body::Json(value) => pretty(value),
        Body::Raw(text) => text.trim_end().to_string(),
    };
    if text.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = text.lines().collect();
    let limit = if options.full_response {
        lines.len()
    } else {
        options.max_body_lines.min(lines.len())
    };

    let mut out = String::new();
    for line in &lines[..limit] {
        out.push_str(INDENT);
        out.push_str(line);
        out.push('\n');
    }

    let remaining = lines.len() - limit;
    if remaining > 0 {
        out.push_str(&format!(
            "{} {} {}\n",
            options.paint(&format!("{}...{} more lines (use", INDENT, remaining), |s| s.dimmed()),
            options.paint("--full-response", |s| s.yellow()),
            options.paint("to see the whole response)", |s| s.dimmed())
        ));
    }
    out
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn paint_method(method: HttpMethod, options: &OutputOptions) -> String {
    let token = method.as_str();
    match method {
        HttpMethod::GET => options.paint(token, |s| s.green()),
        HttpMethod::POST => options.paint(token, |s| s.yellow()),
        HttpMethod::PUT => options.paint(token, |s| s.cyan()),
        HttpMethod::DELETE => options.paint(token, |s| s.red()),
        _ => options.paint(token, |s| s.bold()),
    }
}

fn paint_status(result: &StepResult, options: &OutputOptions) -> String {
    let status = format!("{} {}", result.status, result.status_text());
    match result.status / 100 {
        2 => options.paint(&status, |s| s.green()),
        3 => options.paint(&status, |s| s.yellow()),
        4 | 5 => options.paint(&status, |s| s.red()),
        _ => status,
    }
}
