//! Markup stripping
//!
//! A single-pass scanner that removes anything between `<` and `>` while
//! keeping the visible text. No entity decoding, no reparsing; output never
//! contains a `<`.

/// Strip markup from `input`, preserving visible text content
///
/// An unterminated tag swallows the rest of the input, which matches how
/// browsers treat a dangling `<`.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            ch if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
