//! Quote-aware string helpers shared by the evaluators.

/// Trims whitespace, then removes surrounding double quotes.
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches('"')
}

/// Splits `text` at every separator that sits outside a double-quoted section.
pub(crate) fn split_unquoted(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut from = 0;
    for (at, c) in text.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if !quoted && is_separator(c) {
            parts.push(&text[from..at]);
            from = at + c.len_utf8();
        }
    }
    parts.push(&text[from..]);
    parts
}

/// Splits `text` at the first `separator` outside a double-quoted section.
pub(crate) fn split_once_unquoted(text: &str, separator: char) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (at, c) in text.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if !quoted && c == separator {
            return Some((&text[..at], &text[at + c.len_utf8()..]));
        }
    }
    None
}
