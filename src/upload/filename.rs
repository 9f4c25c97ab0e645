//! Filename validation and sanitization

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clock::Clock;

/// Longest accepted filename
pub const MAX_FILE_NAME_LEN: usize = 255;
/// Longest stem kept when sanitizing
const MAX_STEM_LEN: usize = 100;
/// Stem used when sanitization strips everything away
const EMPTY_STEM_FALLBACK: &str = "file";

/// Characters never allowed in stored filenames
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static RESERVED_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])(\..*)?$").expect("reserved name regex")
});

static WHITESPACE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static DOT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("dot run regex"));

/// Every problem with `name` as a stored filename; empty means acceptable
pub fn validate_file_name(name: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("File name is empty".to_string());
        return errors;
    }
    if name.chars().count() > MAX_FILE_NAME_LEN {
        errors.push(format!(
            "File name exceeds {MAX_FILE_NAME_LEN} characters"
        ));
    }
    if name.chars().any(char::is_control) {
        errors.push("File name contains control characters".to_string());
    }
    if name.chars().any(|ch| FORBIDDEN_CHARS.contains(&ch)) {
        errors.push("File name contains forbidden characters".to_string());
    }
    if RESERVED_NAME_REGEX.is_match(name) {
        errors.push("File name is a reserved device name".to_string());
    }
    errors
}

/// Rewrite `name` into a safe, collision-resistant stored filename
///
/// Disallowed characters are stripped, whitespace runs become single
/// underscores, dot runs collapse, the stem is truncated, and the current
/// unix-millisecond timestamp is appended before the extension.
pub fn sanitize_file_name(name: &str, clock: &dyn Clock) -> String {
    let (raw_stem, extension) = split_extension(name);

    // whitespace first: control characters like `\t` are whitespace too,
    // and they must become separators before the strip removes them
    let stem = WHITESPACE_RUN_REGEX.replace_all(raw_stem, "_");
    let stem = strip_disallowed(&stem);
    let stem = DOT_RUN_REGEX.replace_all(&stem, ".");
    let stem = stem.trim_matches('.');
    let mut stem: String = stem.chars().take(MAX_STEM_LEN).collect();
    if stem.is_empty() {
        stem = EMPTY_STEM_FALLBACK.to_string();
    }

    let suffix = clock.now_ms();
    match extension {
        Some(extension) => {
            let extension = strip_disallowed(&extension).to_lowercase();
            format!("{stem}_{suffix}.{extension}")
        }
        None => format!("{stem}_{suffix}"),
    }
}

/// Split `name` into a stem and its final extension, if it has one
fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
            (stem, Some(extension.to_string()))
        }
        _ => (name, None),
    }
}

/// Lowercased final extension of `name`, without the dot
pub fn extension_of(name: &str) -> Option<String> {
    split_extension(name).1.map(|ext| ext.to_lowercase())
}

fn strip_disallowed(part: &str) -> String {
    part.chars()
        .filter(|ch| !ch.is_control() && !FORBIDDEN_CHARS.contains(ch))
        .collect()
}
