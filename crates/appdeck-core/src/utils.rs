//! Shared helpers for appdeck crates

use camino::{Utf8Path, Utf8PathBuf};

/// Lowercase `value` and collapse every run of non alphanumeric characters
/// into a single `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Walk up from `start` until `relative` exists as a file below a directory
pub fn find_path_up(start: &Utf8Path, relative: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.is_file())
}

/// Absolute form of a directory, used as a stable cache key.
///
/// Falls back to the input when the directory cannot be resolved.
pub fn normalize_directory(directory: &Utf8Path) -> Utf8PathBuf {
    directory
        .canonicalize_utf8()
        .unwrap_or_else(|_| directory.to_owned())
}
