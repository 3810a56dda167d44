//! Minimal sectioned key/value reader for `.reqrc`.
//!
//! ```ini
//! ; comments start with ';' or '#'
//! [variables]
//! host = reqres.in
//! token = "abc 123"
//!
//! [settings]
//! timeout = 10
//! ```
//!
//! Keys that appear before any section header belong to the root section,
//! named `""`. Malformed lines are skipped with a warning.

use std::collections::HashMap;

/// Sections keyed by name, each a flat key/value mapping.
pub type Sections = HashMap<String, HashMap<String, String>>;

/// Reads sectioned key/value text.
pub fn parse_sections(content: &str) -> Sections {
    let mut sections: Sections = HashMap::new();
    let mut current = String::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current = line[1..line.len() - 1].trim().to_string();
            sections.entry(current.clone()).or_default();
            continue;
        }

        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            if key.is_empty() {
                log::warn!("Ignoring .reqrc line {} with empty key: {}", line_num + 1, line);
                continue;
            }
            let value = unquote(strip_inline_comment(line[eq_pos + 1..].trim()));

            sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        } else {
            log::warn!("Ignoring invalid .reqrc line {}: {}", line_num + 1, line);
        }
    }

    sections
}

/// Cuts a trailing `; comment` or `# comment` off an unquoted value. The
/// marker must follow whitespace so URLs with fragments survive.
fn strip_inline_comment(value: &str) -> &str {
    if value.starts_with(['"', '\'']) {
        return value;
    }
    let cut = value
        .char_indices()
        .zip(value.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && matches!(next, ';' | '#'))
        .map(|((pos, _), _)| pos);
    match cut {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    }
}

/// Removes one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
