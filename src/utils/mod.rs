//! Utility functions and helpers.

pub mod http;

/// Extension carried by every catalog key.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Strip a trailing archive extension from a catalog key.
pub fn strip_archive_extension(key: &str) -> &str {
    key.strip_suffix(ARCHIVE_EXTENSION).unwrap_or(key)
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
///
/// `"point-and-click"` becomes `"Point-And-Click"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(ch);
            in_word = false;
        }
    }

    result
}
