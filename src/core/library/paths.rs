//! Translation between locally-addressable paths and the media server's view of them.

use crate::core::config::LibraryEntry;

/// Rewrite a leading `from` prefix to `to`, leaving the remainder untouched.
///
/// Trailing separators on either base are ignored. Returns `None` when `path`
/// does not live under `from`.
pub fn rewrite_prefix(path: &str, from: &str, to: &str) -> Option<String> {
    let from = trim_separators(from);
    let to = trim_separators(to);

    let rest = path.strip_prefix(from)?;
    // "/data" must not match "/database"
    if !rest.is_empty() && !rest.starts_with(['/', '\\']) {
        return None;
    }
    Some(format!("{}{}", to, rest))
}

fn trim_separators(base: &str) -> &str {
    base.trim_end_matches(['/', '\\'])
}

/// Server-visible path -> local path
pub fn to_local_path(server_path: &str, server_base: &str, local_base: &str) -> Option<String> {
    rewrite_prefix(server_path, server_base, local_base)
}

/// Local path -> server-visible path
pub fn to_server_path(local_path: &str, local_base: &str, server_base: &str) -> Option<String> {
    rewrite_prefix(local_path, local_base, server_base)
}

/// First library whose configured path occurs in `media_path`
pub fn select_library(media_path: &str, libraries: &[LibraryEntry]) -> Option<u32> {
    libraries
        .iter()
        .find(|library| !library.path.is_empty() && media_path.contains(&library.path))
        .map(|library| library.id)
}
