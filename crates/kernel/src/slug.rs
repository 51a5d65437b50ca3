//! Hook-name slugification.

/// Separator used between words of a hook name.
pub const HOOK_SEPARATOR: char = '_';

/// Convert a block name into a hook name.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a single
/// `_`, and trims leading/trailing separators. `"offset/My Block"` becomes
/// `"offset_my_block"`.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push(HOOK_SEPARATOR);
            }
            pending_separator = false;
            result.push(c);
        } else {
            pending_separator = true;
        }
    }

    result
}

/// Check whether a string is a usable hook name.
///
/// Manifests whose name slugifies to something else are rejected.
pub fn is_hook_name(text: &str) -> bool {
    !text.is_empty()
        && !text.starts_with(HOOK_SEPARATOR)
        && !text.ends_with(HOOK_SEPARATOR)
        && text
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == HOOK_SEPARATOR)
}
