//! Shared helpers for log lines and CLI output

/// Shorten `s` to at most `max_chars` characters, ending in "..." when cut.
/// Line breaks are flattened to spaces so the result fits on one line.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}
