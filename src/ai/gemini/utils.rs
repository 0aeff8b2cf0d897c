//! Shared utilities for response handling

/// Upper bound on raw provider text copied into warning and error events
pub const MAX_LOGGED_CHARS: usize = 4000;

/// Unwrap a markdown code fence around a JSON body, if there is one
///
/// Handles:
/// - ```json code blocks
/// - Plain ``` code blocks
///
/// Anything else is returned trimmed but otherwise untouched, so the caller's
/// parser sees exactly what the provider sent.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();

    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };

    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = match body.find('\n') {
        Some(newline) if !body[..newline].trim_start().starts_with('{') => &body[newline + 1..],
        _ => body,
    };

    body.trim()
}

/// Shorten text for log output without splitting a UTF-8 character
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}… ({} bytes total)", &text[..cut], text.len()),
        None => text.to_string(),
    }
}
