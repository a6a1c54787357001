//! Input sanitization.
//!
//! Everything a user types (or an imported file claims a user typed) passes
//! through here before it is stored. The sanitizer never fails: it strips,
//! truncates, and defaults rather than rejecting, because it sits on the
//! hot path of every keystroke and must also survive arbitrary imported
//! documents. Hard validation with user-visible errors lives in
//! [`crate::validate`].
//!
//! Entity-encoded input is decoded *before* the stripping pass, so
//! `&lt;script&gt;` payloads are caught by the same rules as literal ones.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::NodeData;

/// Max length for labels, names, and return types.
pub const LABEL_MAX: usize = 200;
/// Max length for long free-text descriptions.
pub const DESCRIPTION_MAX: usize = 50_000;
/// Max length for one tag-list element.
pub const TAG_MAX: usize = 50;
/// Max number of elements kept in a tag-style list.
pub const TAG_LIST_MAX: usize = 50;
/// Max length for a custom file-type label.
pub const CUSTOM_TYPE_MAX: usize = 30;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));
static HANDLER_QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bon\w+\s*=\s*("[^"]*"|'[^']*')"#).expect("valid regex"));
static HANDLER_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon\w+\s*=\s*[^\s>]*").expect("valid regex"));
static NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));

/// Sanitize a short single-line value: node labels, function names,
/// return types, custom type tags.
pub fn sanitize_label(input: &str) -> String {
    sanitize_text(input, LABEL_MAX, false)
}

/// Sanitize long free text. Newlines survive; everything else follows the
/// label rules.
pub fn sanitize_description(input: &str) -> String {
    sanitize_text(input, DESCRIPTION_MAX, true)
}

/// Sanitize a tag-style list (tags, exports, params, tech stack): each
/// element cleaned as a short label, empties dropped, list capped.
pub fn sanitize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| sanitize_text(t, TAG_MAX, false))
        .filter(|t| !t.is_empty())
        .take(TAG_LIST_MAX)
        .collect()
}

fn sanitize_text(input: &str, max_len: usize, keep_newlines: bool) -> String {
    let mut cleaned = decode_entities(input.trim());

    cleaned = strip_until_stable(&TAG_RE, cleaned);
    // Whatever the tag pass left behind must not contain delimiters at all;
    // a stray `<` could re-form a tag once concatenated downstream.
    cleaned.retain(|c| c != '<' && c != '>');

    cleaned = strip_until_stable(&SCHEME_RE, cleaned);
    cleaned = strip_until_stable(&HANDLER_QUOTED_RE, cleaned);
    cleaned = strip_until_stable(&HANDLER_BARE_RE, cleaned);

    if !keep_newlines {
        cleaned = NEWLINES_RE.replace_all(&cleaned, " ").into_owned();
    }

    cleaned.retain(|c| !is_disallowed_control(c));

    truncate_chars(&mut cleaned, max_len);
    cleaned.trim().to_string()
}

/// Remove every match, repeating until the pattern no longer occurs, so
/// payloads that reassemble after one removal pass are still caught.
fn strip_until_stable(re: &Regex, mut s: String) -> String {
    loop {
        let next = re.replace_all(&s, "").into_owned();
        if next == s {
            return s;
        }
        s = next;
    }
}

// Tabs and newlines are ordinary whitespace (labels have already had their
// newlines collapsed by this point); everything else in the control range
// is noise.
fn is_disallowed_control(c: char) -> bool {
    !matches!(c, '\t' | '\n' | '\r') && c.is_control()
}

fn truncate_chars(s: &mut String, max_len: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_len) {
        s.truncate(idx);
    }
}

/// Decode HTML entities (named subset plus numeric forms). Runs before the
/// stripping pass so encoded payloads don't slip through it.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one_entity(rest) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the entity at the start of `s` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_one_entity(s: &str) -> Option<(char, usize)> {
    let semi = s[1..].find(';').map(|i| i + 1)?;
    let body = &s[1..semi];
    if body.len() > 24 {
        return None;
    }
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, semi + 1))
}

/// Sanitize every text field of a node's annotation bag in place.
///
/// Enum fields are already in their domain by the time they are typed
/// values (lenient deserialization coerces unknowns), so only text and
/// list fields need work here.
pub fn sanitize_node_data(data: &mut NodeData) {
    data.label = sanitize_label(&data.label);
    if let Some(desc) = data.description.take() {
        let cleaned = sanitize_description(&desc);
        if !cleaned.is_empty() {
            data.description = Some(cleaned);
        }
    }
    if let Some(returns) = data.returns.take() {
        let cleaned = sanitize_label(&returns);
        if !cleaned.is_empty() {
            data.returns = Some(cleaned);
        }
    }
    data.tags = sanitize_tags(&data.tags);
    data.exports = sanitize_tags(&data.exports);
    data.params = sanitize_tags(&data.params);
    data.tech_stack = sanitize_tags(&data.tech_stack);
}
