use std::path::Path;

pub const DIR_SEPARATOR: char = '/';

/// Join two path segments with exactly one separator between them.
pub fn join_paths(base: &str, child: &str) -> String {
    let child = child.trim_start_matches(DIR_SEPARATOR);
    if base.is_empty() {
        return child.to_string();
    }

    let base = base.trim_end_matches(DIR_SEPARATOR);
    let mut joined = String::with_capacity(base.len() + child.len() + 1);
    joined.push_str(base);
    joined.push(DIR_SEPARATOR);
    joined.push_str(child);
    joined
}

/// Compare the trailing bytes of `value` against `suffix`.
pub fn ends_with_suffix(value: &str, suffix: &str) -> bool {
    !suffix.is_empty() && value.len() >= suffix.len() && value.ends_with(suffix)
}

/// True when the last component of `path` ends with `suffix`.
/// Only the trailing segment is inspected, never the full path.
pub fn last_segment_has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| ends_with_suffix(&name.to_string_lossy(), suffix))
        .unwrap_or(false)
}

/// Display name of a directory: its base name, or the whole path for roots.
pub fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned())
}
