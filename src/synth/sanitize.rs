/// Longest identifier `sanitize` produces.
pub const MAX_IDENTIFIER_LEN: usize = 30;

pub const DEFAULT_IDENTIFIER: &str = "UNKNOWN";

/// Normalize free text into an upper-case identifier fragment.
///
/// Runs of non-alphanumeric characters collapse to one underscore, edges are
/// trimmed and the result is capped at `MAX_IDENTIFIER_LEN`. Blank input
/// yields `"UNKNOWN"`. Distinct labels can map to the same identifier.
pub fn sanitize(text: &str) -> String {
    sanitize_or(text, DEFAULT_IDENTIFIER)
}

/// `sanitize` with a caller-chosen placeholder for blank input.
pub fn sanitize_or(text: &str, default: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_IDENTIFIER_LEN));
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
        if out.len() >= MAX_IDENTIFIER_LEN {
            break;
        }
    }
    out.truncate(MAX_IDENTIFIER_LEN);
    let trimmed = out.trim_end_matches('_');

    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
