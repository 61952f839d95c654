//! Text normalization and tokenization.
//!
//! Every relevance comparison in the scoring pipeline goes through these
//! functions, so they must be stable: identical input produces identical
//! output across runs. Both are total — there is no failure mode.

/// Lowercase `s`, collapse every run of non-alphanumeric characters into a
/// single space, and trim the ends.
///
/// ```rust
/// use image_scout_core::text::normalize;
///
/// assert_eq!(normalize("  iPhone-15  Pro!! "), "iphone 15 pro");
/// ```
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lc in ch.to_lowercase() {
                out.push(lc);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

/// Normalize `s` and split it into tokens, dropping empties.
pub fn tokenize(s: &str) -> Vec<String> {
    normalize(s)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
