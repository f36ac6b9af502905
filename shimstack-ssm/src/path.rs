//! Hierarchical path matching for GetParametersByPath

/// Whether parameter `name` falls under `path`.
///
/// Recursive lookups match any name that starts with `path`. Non-recursive
/// lookups strip `path` and at most one leading `/` from the remainder, then
/// accept the name only if no further `/` is left, so `/a` and `/a/` select
/// the same direct children.
pub fn matches_path(name: &str, path: &str, recursive: bool) -> bool {
    let Some(remainder) = name.strip_prefix(path) else {
        return false;
    };
    if recursive {
        return true;
    }

    let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
    !remainder.contains('/')
}
