//! Template token substitution.
//!
//! Replaces `{name}` and `{name|default}` tokens in text. Each token is looked
//! up once in the combined variable mapping; when the name is missing the
//! default is used, and when there is no default the token becomes empty.
//! Substituted text is never scanned again, so a value that itself looks
//! like a token is inserted literally.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Cached regex for `{name}` / `{name|default}` with optional blanks around
/// the pipe. The default runs up to the closing brace.
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\w+)[ \t]*(?:\|[ \t]*([^}]*))?\}").expect("Failed to compile token regex")
});

/// Characters left untouched when encoding a URI component: alphanumerics
/// and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How substituted values are inserted into the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Insert the value as-is (headers and bodies).
    Verbatim,
    /// Percent-encode the value as a URI component (URLs).
    UriComponent,
}

/// Substitutes every template token in `text`.
///
/// # Examples
///
/// ```
/// use req::variables::substitution::{substitute, Encoding};
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("q".to_string(), "a b".to_string());
///
/// assert_eq!(substitute("/search?q={q}", &vars, Encoding::UriComponent), "/search?q=a%20b");
/// assert_eq!(substitute("page {page|1}", &vars, Encoding::Verbatim), "page 1");
/// ```
pub fn substitute(text: &str, variables: &HashMap<String, String>, encoding: Encoding) -> String {
    // Fast path: nothing that could be a token
    if !text.contains('{') {
        return text.to_string();
    }

    TOKEN_REGEX
        .replace_all(text, |caps: &Captures| {
            let value = lookup(caps, variables);
            match encoding {
                Encoding::Verbatim => value.to_string(),
                Encoding::UriComponent => utf8_percent_encode(value, URI_COMPONENT).to_string(),
            }
        })
        .into_owned()
}

fn lookup<'a>(caps: &'a Captures, variables: &'a HashMap<String, String>) -> &'a str {
    if let Some(value) = variables.get(&caps[1]) {
        return value;
    }
    caps.get(2).map(|m| m.as_str()).unwrap_or("")
}
