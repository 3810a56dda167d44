//! Comment-tolerant JSON reading for request bodies.
//!
//! Bodies may carry `// line` and `/* block */` comments as well as trailing
//! commas before `}` or `]`. Both are removed outside of string literals and
//! the remainder is handed to `serde_json`.

use serde_json::Value;

/// Parses `source` as JSON after stripping comments and trailing commas.
///
/// Returns `None` when the text is not a JSON document, in which case the
/// caller keeps the body as raw text.
pub fn parse(source: &str) -> Option<Value> {
    let cleaned = strip_trailing_commas(&strip_comments(source)?);
    serde_json::from_str(&cleaned).ok()
}

/// Removes comments outside string literals.
///
/// Returns `None` for an unterminated block comment.
fn strip_comments(source: &str) -> Option<String> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        closed = true;
                        break;
                    }
                    prev = skipped;
                }
                if !closed {
                    return None;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    Some(out)
}

/// Drops commas that are followed only by whitespace and a closing bracket.
fn strip_trailing_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}
