//! Shared string helpers.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// One-line preview of `s` limited to `max_chars` characters.
///
/// Newlines are folded into spaces and an ellipsis marks truncation. Used for
/// trace details and log lines.
pub fn preview(s: &str, max_chars: usize) -> String {
    let folded: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if folded.chars().count() <= max_chars {
        folded
    } else {
        let truncated: String = folded.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
