/// Truncate `s` to at most `max_chars` characters, appending an ellipsis when
/// anything was cut. Counts `char`s, not bytes, so multi-byte input never
/// splits mid-codepoint.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}
