//! Log sanitization utilities
//!
//! Response bodies are whole HTML fragments, often with hidden CSRF tokens in
//! them. Debug logs get a single-line prefix instead.

/// Maximum number of characters kept in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Collapse whitespace runs to single spaces and cut the result to
/// `TRUNCATE_LIMIT` characters, noting the original size.
pub fn truncate_for_log(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(TRUNCATE_LIMIT) {
        None => collapsed,
        Some((cut, _)) => format!(
            "{}... [truncated, total {} bytes]",
            &collapsed[..cut],
            s.len()
        ),
    }
}
